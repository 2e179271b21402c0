//! Analytics aggregation for the dashboard
//!
//! Pure transforms from proposal and earning lists to chart-ready data:
//! status distribution, monthly series and summary metrics. Months are
//! bucketed in UTC.

mod distribution;
mod metrics;
mod records;
mod report;
mod series;

pub use records::{Earning, EarningStatus, Proposal, ProposalStatus};
pub use report::{DashboardReport, ReportCache};
pub use series::MonthKey;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    pub fn proposal(status: ProposalStatus, created_at: &str, estimated_value: Option<f64>) -> Proposal {
        Proposal {
            id: Uuid::new_v4(),
            title: format!("{} proposal", status),
            status,
            created_at: created_at.parse::<DateTime<Utc>>().unwrap(),
            estimated_value,
            actual_value: None,
            completion_date: None,
        }
    }

    pub fn earning(amount: f64, status: EarningStatus, created_at: &str) -> Earning {
        Earning {
            id: Uuid::new_v4(),
            amount,
            status,
            created_at: created_at.parse::<DateTime<Utc>>().unwrap(),
            description: None,
            proposal_id: None,
            payment_date: None,
        }
    }
}
