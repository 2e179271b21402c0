//! Monthly time series
//!
//! Records are grouped by calendar month in UTC and folded into a
//! caller-chosen bucket type. The series keeps the latest `SERIES_WINDOW`
//! months in chronological order and is never empty.

use crate::analytics::records::{Earning, EarningStatus, Proposal};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Number of most recent months kept in a series
pub const SERIES_WINDOW: usize = 6;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar month in UTC; orders chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// `month` is 1-based
    #[cfg(test)]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Month containing the given instant
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    /// Short label such as `Jan 2024`
    pub fn label(&self) -> String {
        format!("{} {:04}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One point of a monthly series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint<B> {
    pub month: String,
    #[serde(flatten)]
    pub values: B,
}

/// Count-only bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProposalCount {
    pub count: u64,
}

/// Earnings bucket: everything recorded vs. what was paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EarningsTotals {
    pub total: f64,
    pub paid: f64,
}

/// Group records by month and fold each into its bucket.
///
/// `timestamp` selects the date field and `accumulate` adds one record to a
/// bucket. When no records exist the result holds a single zeroed bucket for
/// `placeholder`.
pub fn monthly_series<R, B, T, F>(
    records: &[R],
    timestamp: T,
    accumulate: F,
    placeholder: MonthKey,
) -> Vec<MonthlyPoint<B>>
where
    B: Default,
    T: Fn(&R) -> DateTime<Utc>,
    F: Fn(&mut B, &R),
{
    let mut buckets: BTreeMap<MonthKey, B> = BTreeMap::new();

    for record in records {
        let bucket = buckets.entry(MonthKey::of(&timestamp(record))).or_default();
        accumulate(bucket, record);
    }

    if buckets.is_empty() {
        buckets.insert(placeholder, B::default());
    }

    let skip = buckets.len().saturating_sub(SERIES_WINDOW);
    buckets
        .into_iter()
        .skip(skip)
        .map(|(key, values)| MonthlyPoint {
            month: key.label(),
            values,
        })
        .collect()
}

/// Proposals created per month
pub fn monthly_proposals(
    proposals: &[Proposal],
    placeholder: MonthKey,
) -> Vec<MonthlyPoint<ProposalCount>> {
    monthly_series(
        proposals,
        |p| p.created_at,
        |bucket: &mut ProposalCount, _| bucket.count += 1,
        placeholder,
    )
}

/// Total and paid earnings per month
pub fn monthly_earnings(
    earnings: &[Earning],
    placeholder: MonthKey,
) -> Vec<MonthlyPoint<EarningsTotals>> {
    monthly_series(
        earnings,
        |e| e.created_at,
        |bucket: &mut EarningsTotals, e| {
            bucket.total += e.amount;
            if e.status == EarningStatus::Paid {
                bucket.paid += e.amount;
            }
        },
        placeholder,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::{earning, proposal};
    use crate::analytics::records::ProposalStatus;
    use pretty_assertions::assert_eq;

    fn default_month() -> MonthKey {
        MonthKey::new(2024, 6).unwrap()
    }

    fn months<B>(series: &[MonthlyPoint<B>]) -> Vec<&str> {
        series.iter().map(|p| p.month.as_str()).collect()
    }

    #[test]
    fn test_month_key_label() {
        assert_eq!(MonthKey::new(2024, 1).unwrap().label(), "Jan 2024");
        assert_eq!(MonthKey::new(987, 12).unwrap().to_string(), "Dec 0987");
        assert!(MonthKey::new(2024, 0).is_none());
        assert!(MonthKey::new(2024, 13).is_none());
    }

    #[test]
    fn test_month_boundaries_are_utc() {
        let last_instant: DateTime<Utc> = "2024-01-31T23:59:59Z".parse().unwrap();
        let first_instant: DateTime<Utc> = "2024-02-01T00:00:00Z".parse().unwrap();

        assert_eq!(MonthKey::of(&last_instant), MonthKey::new(2024, 1).unwrap());
        assert_eq!(MonthKey::of(&first_instant), MonthKey::new(2024, 2).unwrap());
    }

    #[test]
    fn test_proposals_grouped_by_month() {
        let proposals = vec![
            proposal(ProposalStatus::Draft, "2024-01-15T09:00:00Z", None),
            proposal(ProposalStatus::Draft, "2024-01-28T09:00:00Z", None),
            proposal(ProposalStatus::Draft, "2024-02-05T09:00:00Z", None),
        ];

        let series = monthly_proposals(&proposals, default_month());

        assert_eq!(
            series,
            vec![
                MonthlyPoint { month: "Jan 2024".to_string(), values: ProposalCount { count: 2 } },
                MonthlyPoint { month: "Feb 2024".to_string(), values: ProposalCount { count: 1 } },
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_placeholder() {
        let series = monthly_proposals(&[], default_month());
        assert_eq!(
            series,
            vec![MonthlyPoint { month: "Jun 2024".to_string(), values: ProposalCount::default() }]
        );

        let series = monthly_earnings(&[], default_month());
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].values, EarningsTotals { total: 0.0, paid: 0.0 });
    }

    #[test]
    fn test_keeps_latest_six_months_in_order() {
        // Newest first, as the store returns them, spanning a year boundary.
        let dates = [
            "2024-03-10T00:00:00Z",
            "2024-02-10T00:00:00Z",
            "2024-01-10T00:00:00Z",
            "2023-12-10T00:00:00Z",
            "2023-11-10T00:00:00Z",
            "2023-10-10T00:00:00Z",
            "2023-09-10T00:00:00Z",
            "2023-08-10T00:00:00Z",
        ];
        let proposals: Vec<_> = dates
            .iter()
            .map(|d| proposal(ProposalStatus::Pending, d, None))
            .collect();

        let series = monthly_proposals(&proposals, default_month());

        assert_eq!(
            months(&series),
            vec!["Oct 2023", "Nov 2023", "Dec 2023", "Jan 2024", "Feb 2024", "Mar 2024"]
        );
    }

    #[test]
    fn test_same_month_different_year_are_distinct() {
        let proposals = vec![
            proposal(ProposalStatus::Pending, "2023-05-01T00:00:00Z", None),
            proposal(ProposalStatus::Pending, "2024-05-01T00:00:00Z", None),
        ];

        let series = monthly_proposals(&proposals, default_month());
        assert_eq!(months(&series), vec!["May 2023", "May 2024"]);
    }

    #[test]
    fn test_earnings_total_and_paid() {
        let earnings = vec![
            earning(100.0, EarningStatus::Paid, "2024-04-01T00:00:00Z"),
            earning(50.0, EarningStatus::Pending, "2024-04-12T00:00:00Z"),
            earning(20.0, EarningStatus::Cancelled, "2024-05-03T00:00:00Z"),
            earning(30.0, EarningStatus::Paid, "2024-05-20T00:00:00Z"),
        ];

        let series = monthly_earnings(&earnings, default_month());

        assert_eq!(months(&series), vec!["Apr 2024", "May 2024"]);
        assert_eq!(series[0].values, EarningsTotals { total: 150.0, paid: 100.0 });
        assert_eq!(series[1].values, EarningsTotals { total: 50.0, paid: 30.0 });
    }

    #[test]
    fn test_custom_bucket_fields() {
        #[derive(Default, Debug, PartialEq)]
        struct Quoted {
            estimated: f64,
        }

        let proposals = vec![
            proposal(ProposalStatus::Approved, "2024-07-01T00:00:00Z", Some(200.0)),
            proposal(ProposalStatus::Approved, "2024-07-02T00:00:00Z", None),
            proposal(ProposalStatus::Approved, "2024-07-03T00:00:00Z", Some(50.0)),
        ];

        let series = monthly_series(
            &proposals,
            |p| p.created_at,
            |bucket: &mut Quoted, p| bucket.estimated += p.estimated_value.unwrap_or_default(),
            default_month(),
        );

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].values, Quoted { estimated: 250.0 });
    }

    #[test]
    fn test_series_serializes_flat() {
        let series = monthly_earnings(
            &[earning(10.0, EarningStatus::Paid, "2024-01-01T00:00:00Z")],
            default_month(),
        );

        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "month": "Jan 2024", "total": 10.0, "paid": 10.0 }])
        );
    }

    #[test]
    fn test_series_is_idempotent() {
        let earnings = vec![
            earning(12.5, EarningStatus::Paid, "2024-01-01T00:00:00Z"),
            earning(7.5, EarningStatus::Pending, "2024-03-01T00:00:00Z"),
        ];

        assert_eq!(
            monthly_earnings(&earnings, default_month()),
            monthly_earnings(&earnings, default_month())
        );
    }
}
