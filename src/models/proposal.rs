//! Proposal request models

use crate::analytics::ProposalStatus;
use crate::db::ProposalUpdate;
use crate::error::{validation_error, AppError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

const STATUS_CHOICES: &str = "draft, pending, approved, rejected, completed";

/// Query parameters for listing proposals
#[derive(Debug, Default, Deserialize)]
pub struct ProposalListQuery {
    pub status: Option<String>,
}

impl ProposalListQuery {
    pub fn status_filter(&self) -> Result<Option<ProposalStatus>, AppError> {
        match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => match ProposalStatus::from(raw) {
                ProposalStatus::Unknown => Err(validation_error(format!(
                    "Unknown status '{}' (expected one of: {})",
                    raw, STATUS_CHOICES
                ))),
                status => Ok(Some(status)),
            },
        }
    }
}

/// Request to update a proposal's status and values
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProposalRequest {
    pub status: Option<ProposalStatus>,
    #[validate(range(min = 0.0, message = "Estimated value must not be negative"))]
    pub estimated_value: Option<f64>,
    #[validate(range(min = 0.0, message = "Actual value must not be negative"))]
    pub actual_value: Option<f64>,
    pub completion_date: Option<DateTime<Utc>>,
}

impl UpdateProposalRequest {
    /// Validate and convert into a storable update
    pub fn into_update(self) -> Result<ProposalUpdate, AppError> {
        self.validate().map_err(|e| validation_error(e.to_string()))?;

        if self.status.is_some_and(|status| !status.is_known()) {
            return Err(validation_error(format!(
                "Status must be one of: {}",
                STATUS_CHOICES
            )));
        }

        let update = ProposalUpdate {
            status: self.status,
            estimated_value: self.estimated_value,
            actual_value: self.actual_value,
            completion_date: self.completion_date,
        };

        if update.status.is_none()
            && update.estimated_value.is_none()
            && update.actual_value.is_none()
            && update.completion_date.is_none()
        {
            return Err(validation_error("Nothing to update"));
        }

        Ok(update)
    }
}

/// Request to generate a proposal from a project description
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProposalRequest {
    #[validate(length(min = 1, max = 4000, message = "userPrompt must be between 1 and 4000 characters"))]
    pub user_prompt: String,
}
