//! Proposal and earning records
//!
//! Both record types are owned by the hosted database. The aggregator only
//! ever borrows them; nothing in `analytics` mutates a record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Proposal status as stored in the `proposal_status` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Completed,
    /// Anything outside the known set. Never counted in a distribution.
    #[serde(other)]
    Unknown,
}

impl ProposalStatus {
    /// Known statuses in display order
    pub const ALL: [ProposalStatus; 5] = [
        ProposalStatus::Draft,
        ProposalStatus::Pending,
        ProposalStatus::Approved,
        ProposalStatus::Rejected,
        ProposalStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Pending => "pending",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Rejected => "rejected",
            ProposalStatus::Completed => "completed",
            ProposalStatus::Unknown => "unknown",
        }
    }

    /// Human-readable chart label
    pub fn label(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "Draft",
            ProposalStatus::Pending => "Pending",
            ProposalStatus::Approved => "Approved",
            ProposalStatus::Rejected => "Rejected",
            ProposalStatus::Completed => "Completed",
            ProposalStatus::Unknown => "Unknown",
        }
    }

    /// Chart color (hex)
    pub fn color(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "#6B7280",
            ProposalStatus::Pending => "#F59E0B",
            ProposalStatus::Approved => "#10B981",
            ProposalStatus::Rejected => "#EF4444",
            ProposalStatus::Completed => "#3B82F6",
            ProposalStatus::Unknown => "#9CA3AF",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ProposalStatus::Unknown)
    }
}

impl From<&str> for ProposalStatus {
    fn from(value: &str) -> Self {
        match value {
            "draft" => ProposalStatus::Draft,
            "pending" => ProposalStatus::Pending,
            "approved" => ProposalStatus::Approved,
            "rejected" => ProposalStatus::Rejected,
            "completed" => ProposalStatus::Completed,
            _ => ProposalStatus::Unknown,
        }
    }
}

impl Default for ProposalStatus {
    fn default() -> Self {
        ProposalStatus::Draft
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Earning status as stored in the `earning_status` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningStatus {
    Pending,
    Paid,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl EarningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EarningStatus::Pending => "pending",
            EarningStatus::Paid => "paid",
            EarningStatus::Cancelled => "cancelled",
            EarningStatus::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, EarningStatus::Unknown)
    }
}

impl From<&str> for EarningStatus {
    fn from(value: &str) -> Self {
        match value {
            "pending" => EarningStatus::Pending,
            "paid" => EarningStatus::Paid,
            "cancelled" => EarningStatus::Cancelled,
            _ => EarningStatus::Unknown,
        }
    }
}

impl Default for EarningStatus {
    fn default() -> Self {
        EarningStatus::Pending
    }
}

impl fmt::Display for EarningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A freelance proposal
///
/// Snake-case aliases let rows exported straight from the database be posted
/// to the compute endpoint unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    pub status: ProposalStatus,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    /// Quoted value; `None` means no estimate was given, not zero
    #[serde(default, alias = "estimated_value")]
    #[validate(range(min = 0.0, message = "Estimated value must not be negative"))]
    pub estimated_value: Option<f64>,
    #[serde(default, alias = "actual_value")]
    #[validate(range(min = 0.0, message = "Actual value must not be negative"))]
    pub actual_value: Option<f64>,
    #[serde(default, alias = "completion_date")]
    pub completion_date: Option<DateTime<Utc>>,
}

/// A recorded earning, optionally tied to a proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Earning {
    pub id: Uuid,
    #[validate(range(min = 0.0, message = "Amount must not be negative"))]
    pub amount: f64,
    pub status: EarningStatus,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "proposal_id")]
    pub proposal_id: Option<Uuid>,
    #[serde(default, alias = "payment_date")]
    pub payment_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_proposal_status_does_not_fail() {
        let status: ProposalStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, ProposalStatus::Unknown);
        assert!(!status.is_known());
    }

    #[test]
    fn test_status_from_db_text() {
        assert_eq!(ProposalStatus::from("approved"), ProposalStatus::Approved);
        assert_eq!(ProposalStatus::from("APPROVED"), ProposalStatus::Unknown);
        assert_eq!(EarningStatus::from("paid"), EarningStatus::Paid);
        assert_eq!(EarningStatus::from("refunded"), EarningStatus::Unknown);
    }

    #[test]
    fn test_proposal_accepts_database_row_shape() {
        let json = r#"{
            "id": "6f1c2f0e-2f43-4a59-9a39-5d2f3c7b9b10",
            "title": "Logo design",
            "status": "completed",
            "created_at": "2024-03-02T10:00:00Z",
            "estimated_value": 800,
            "actual_value": null
        }"#;

        let proposal: Proposal = serde_json::from_str(json).unwrap();
        assert_eq!(proposal.status, ProposalStatus::Completed);
        assert_eq!(proposal.estimated_value, Some(800.0));
        assert_eq!(proposal.actual_value, None);
        assert_eq!(proposal.completion_date, None);
    }

    #[test]
    fn test_earning_accepts_camel_case() {
        let json = r#"{
            "id": "0b7a7f3e-1111-4c1e-8d0a-0a0a0a0a0a0a",
            "amount": 125.5,
            "status": "cancelled",
            "createdAt": "2024-05-20T08:30:00Z"
        }"#;

        let earning: Earning = serde_json::from_str(json).unwrap();
        assert_eq!(earning.status, EarningStatus::Cancelled);
        assert_eq!(earning.amount, 125.5);
        assert!(earning.proposal_id.is_none());
    }

    #[test]
    fn test_negative_amounts_fail_validation() {
        let earning: Earning = serde_json::from_str(
            r#"{"id": "0b7a7f3e-1111-4c1e-8d0a-0a0a0a0a0a0a", "amount": -50, "status": "pending", "createdAt": "2024-05-20T08:30:00Z"}"#,
        )
        .unwrap();
        assert!(earning.validate().is_err());

        let proposal: Proposal = serde_json::from_str(
            r#"{"id": "6f1c2f0e-2f43-4a59-9a39-5d2f3c7b9b10", "status": "pending", "createdAt": "2024-03-02T10:00:00Z", "estimatedValue": 0}"#,
        )
        .unwrap();
        assert!(proposal.validate().is_ok());
    }
}
