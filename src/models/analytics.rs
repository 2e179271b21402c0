//! Analytics request models

use crate::analytics::{Earning, Proposal};
use serde::Deserialize;
use validator::Validate;

/// Records supplied by the caller for a one-off report
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComputeReportRequest {
    #[serde(default)]
    #[validate(length(max = 50000, message = "Too many proposals (max 50000)"), nested)]
    pub proposals: Vec<Proposal>,
    #[serde(default)]
    #[validate(length(max = 50000, message = "Too many earnings (max 50000)"), nested)]
    pub earnings: Vec<Earning>,
    /// Drop zero-count status slices
    #[serde(default)]
    pub omit_empty: bool,
}

/// Query parameters for the stored-records dashboard
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    #[serde(default)]
    pub omit_empty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_request_defaults() {
        let request: ComputeReportRequest = serde_json::from_str("{}").unwrap();

        assert!(request.proposals.is_empty());
        assert!(request.earnings.is_empty());
        assert!(!request.omit_empty);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_negative_records_rejected() {
        let request: ComputeReportRequest = serde_json::from_str(
            r#"{
                "proposals": [
                    {"id": "6f1c2f0e-2f43-4a59-9a39-5d2f3c7b9b10", "status": "pending", "createdAt": "2024-03-02T10:00:00Z", "estimatedValue": -900}
                ],
                "earnings": [
                    {"id": "0b7a7f3e-1111-4c1e-8d0a-0a0a0a0a0a0a", "amount": 100, "status": "paid", "createdAt": "2024-03-05T10:00:00Z"}
                ]
            }"#,
        )
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.errors();
        assert!(fields.contains_key("proposals"));
        assert!(!fields.contains_key("earnings"));
    }
}
