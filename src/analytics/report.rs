//! Dashboard report and its memoizing cache

use crate::analytics::distribution::{status_distribution, StatusDistribution};
use crate::analytics::metrics::{summary_metrics, SummaryMetrics};
use crate::analytics::records::{Earning, Proposal};
use crate::analytics::series::{
    monthly_earnings, monthly_proposals, EarningsTotals, MonthKey, MonthlyPoint, ProposalCount,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Everything the analytics dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub summary: SummaryMetrics,
    pub status_distribution: StatusDistribution,
    pub monthly_proposals: Vec<MonthlyPoint<ProposalCount>>,
    pub monthly_earnings: Vec<MonthlyPoint<EarningsTotals>>,
}

impl DashboardReport {
    /// Build a report; `placeholder` is the month used for empty series.
    pub fn build(proposals: &[Proposal], earnings: &[Earning], placeholder: MonthKey) -> Self {
        Self {
            summary: summary_metrics(proposals, earnings),
            status_distribution: status_distribution(proposals),
            monthly_proposals: monthly_proposals(proposals, placeholder),
            monthly_earnings: monthly_earnings(earnings, placeholder),
        }
    }

    /// Same report with zero-count status slices removed
    pub fn without_empty_statuses(self) -> Self {
        Self {
            status_distribution: self.status_distribution.non_empty(),
            ..self
        }
    }
}

/// Memoized reports keyed by a fingerprint of their inputs.
///
/// Only the fields a report reads take part in the fingerprint. When the
/// cache is full it is cleared before the next insert.
pub struct ReportCache {
    capacity: usize,
    reports: RwLock<HashMap<String, DashboardReport>>,
}

impl ReportCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            reports: RwLock::new(HashMap::new()),
        }
    }

    /// SHA-256 over every field the aggregator reads
    pub fn fingerprint(proposals: &[Proposal], earnings: &[Earning], placeholder: MonthKey) -> String {
        let mut hasher = Sha256::new();

        hasher.update(placeholder.label().as_bytes());

        hasher.update((proposals.len() as u64).to_le_bytes());
        for p in proposals {
            hasher.update(p.status.as_str().as_bytes());
            hasher.update(p.created_at.timestamp_micros().to_le_bytes());
            match p.estimated_value {
                Some(value) => {
                    hasher.update([1u8]);
                    hasher.update(value.to_bits().to_le_bytes());
                }
                None => hasher.update([0u8]),
            }
        }

        hasher.update((earnings.len() as u64).to_le_bytes());
        for e in earnings {
            hasher.update(e.status.as_str().as_bytes());
            hasher.update(e.created_at.timestamp_micros().to_le_bytes());
            hasher.update(e.amount.to_bits().to_le_bytes());
        }

        format!("{:x}", hasher.finalize())
    }

    /// Return the cached report for these inputs, building it on a miss
    pub async fn get_or_build(
        &self,
        proposals: &[Proposal],
        earnings: &[Earning],
        placeholder: MonthKey,
    ) -> DashboardReport {
        if self.capacity == 0 {
            return DashboardReport::build(proposals, earnings, placeholder);
        }

        let key = Self::fingerprint(proposals, earnings, placeholder);

        if let Some(report) = self.reports.read().await.get(&key) {
            debug!("Report cache hit: {}", &key[..12]);
            return report.clone();
        }

        let report = DashboardReport::build(proposals, earnings, placeholder);

        let mut reports = self.reports.write().await;
        if reports.len() >= self.capacity {
            debug!("Report cache full ({} entries), clearing", reports.len());
            reports.clear();
        }
        reports.insert(key, report.clone());

        report
    }

    /// Number of cached reports
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.reports.read().await.len()
    }
}
