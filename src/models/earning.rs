//! Earning request models

use crate::analytics::EarningStatus;
use crate::db::NewEarning;
use crate::error::{validation_error, AppError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Request to record an earning
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEarningRequest {
    #[validate(range(min = 0.0, message = "Amount must not be negative"))]
    pub amount: f64,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    pub proposal_id: Option<Uuid>,
    /// Defaults to pending
    pub status: Option<EarningStatus>,
}

impl CreateEarningRequest {
    /// Validate and convert into a storable record
    pub fn into_new_earning(self) -> Result<NewEarning, AppError> {
        self.validate().map_err(|e| validation_error(e.to_string()))?;

        if !self.amount.is_finite() {
            return Err(validation_error("Amount must be a finite number"));
        }

        let status = self.status.unwrap_or_default();
        if !status.is_known() {
            return Err(validation_error("Status must be one of: pending, paid, cancelled"));
        }

        Ok(NewEarning {
            amount: self.amount,
            description: self.description.filter(|d| !d.trim().is_empty()),
            proposal_id: self.proposal_id,
            status,
        })
    }
}

/// Request to change an earning's status
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEarningStatusRequest {
    pub status: EarningStatus,
    /// Used when marking as paid; defaults to now
    pub payment_date: Option<DateTime<Utc>>,
}

impl UpdateEarningStatusRequest {
    pub fn checked_status(&self) -> Result<EarningStatus, AppError> {
        if self.status.is_known() {
            Ok(self.status)
        } else {
            Err(validation_error("Status must be one of: pending, paid, cancelled"))
        }
    }
}
