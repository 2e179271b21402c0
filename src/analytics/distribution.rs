//! Proposal status distribution
//!
//! Counts proposals per known status for the dashboard pie chart.

use crate::analytics::records::{Proposal, ProposalStatus};
use serde::Serialize;

/// One status entry with its display metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSlice {
    pub status: ProposalStatus,
    pub name: &'static str,
    pub value: usize,
    pub color: &'static str,
}

/// Status counts in the fixed order draft, pending, approved, rejected, completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusDistribution(Vec<StatusSlice>);

impl StatusDistribution {
    #[cfg(test)]
    pub fn slices(&self) -> &[StatusSlice] {
        &self.0
    }

    /// Count for a single status (0 for unknown or omitted entries)
    #[cfg(test)]
    pub fn count(&self, status: ProposalStatus) -> usize {
        self.0
            .iter()
            .find(|slice| slice.status == status)
            .map_or(0, |slice| slice.value)
    }

    /// Sum of all counts
    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.0.iter().map(|slice| slice.value).sum()
    }

    /// Drop zero-count entries; renderers skip empty pie slices.
    pub fn non_empty(self) -> Self {
        Self(self.0.into_iter().filter(|slice| slice.value > 0).collect())
    }
}

/// Count proposals per known status.
///
/// Proposals whose status is outside the known set are ignored.
pub fn status_distribution(proposals: &[Proposal]) -> StatusDistribution {
    let mut counts = [0usize; ProposalStatus::ALL.len()];

    for proposal in proposals {
        if let Some(idx) = ProposalStatus::ALL.iter().position(|s| *s == proposal.status) {
            counts[idx] += 1;
        }
    }

    StatusDistribution(
        ProposalStatus::ALL
            .iter()
            .zip(counts)
            .map(|(status, value)| StatusSlice {
                status: *status,
                name: status.label(),
                value,
                color: status.color(),
            })
            .collect(),
    )
}
