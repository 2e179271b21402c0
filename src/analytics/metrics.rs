//! Dashboard summary metrics

use crate::analytics::records::{Earning, EarningStatus, Proposal, ProposalStatus};
use serde::Serialize;

/// Headline numbers for the analytics cards
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub total_proposals: usize,
    pub approved_proposals: usize,
    pub completed_proposals: usize,
    /// approved / total, percent, one decimal
    pub approval_rate: f64,
    /// completed / approved, percent, one decimal
    pub completion_rate: f64,
    pub total_earnings: f64,
    pub paid_earnings: f64,
    /// paid / total earnings, percent, one decimal
    pub collection_rate: f64,
    /// Mean over proposals that carry an estimate
    pub avg_proposal_value: f64,
}

pub fn summary_metrics(proposals: &[Proposal], earnings: &[Earning]) -> SummaryMetrics {
    let total_proposals = proposals.len();
    let approved_proposals = count_status(proposals, ProposalStatus::Approved);
    let completed_proposals = count_status(proposals, ProposalStatus::Completed);

    let total_earnings: f64 = earnings.iter().map(|e| e.amount).sum();
    let paid_earnings: f64 = earnings
        .iter()
        .filter(|e| e.status == EarningStatus::Paid)
        .map(|e| e.amount)
        .sum();

    SummaryMetrics {
        total_proposals,
        approved_proposals,
        completed_proposals,
        approval_rate: percentage(approved_proposals as f64, total_proposals as f64),
        completion_rate: percentage(completed_proposals as f64, approved_proposals as f64),
        total_earnings,
        paid_earnings,
        collection_rate: percentage(paid_earnings, total_earnings),
        avg_proposal_value: average_estimate(proposals),
    }
}

fn count_status(proposals: &[Proposal], status: ProposalStatus) -> usize {
    proposals.iter().filter(|p| p.status == status).count()
}

/// Mean of the estimates that are present; missing estimates are not zeros.
fn average_estimate(proposals: &[Proposal]) -> f64 {
    let (sum, n) = proposals
        .iter()
        .filter_map(|p| p.estimated_value)
        .fold((0.0_f64, 0usize), |(sum, n), value| (sum + value, n + 1));

    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// `part / whole * 100` rounded to one decimal, 0 when `whole` is not positive
fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 && part.is_finite() && whole.is_finite() {
        round_one_decimal(part / whole * 100.0)
    } else {
        0.0
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
