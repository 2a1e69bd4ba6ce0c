//! Dashboard KPIs: monthly buckets, totals and growth
//!
//! Buckets are labelled with the English short month name (`Jan`, `Feb`, ...)
//! of each record's UTC creation time and kept in the order months are first
//! seen while scanning the input. That order is what the dashboard has always
//! charted, so it is the default; [`MonthlySeries::calendar_ordered`] is an
//! explicit opt-in alternative.

use chrono::{DateTime, Datelike, Utc};
use indexmap::IndexMap;
use punter_types::{Signal, Transaction, TransactionKind, User};
use serde::{Deserialize, Serialize};

/// Share of subscription volume the platform keeps as revenue
pub const REVENUE_SHARE: f64 = 0.2;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short English month name of a timestamp
pub fn month_label(at: &DateTime<Utc>) -> &'static str {
    MONTHS.get(at.month0() as usize).copied().unwrap_or_default()
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage change between the last two values, rounded to two decimals.
///
/// Zero when there are fewer than two values or when the previous value is
/// zero.
pub fn growth_percentage(values: &[f64]) -> f64 {
    match values {
        [.., prev, last] if *prev != 0.0 => round2((last - prev) / prev * 100.0),
        _ => 0.0,
    }
}

/// Insertion-ordered `month → value` buckets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    buckets: IndexMap<&'static str, f64>,
}

impl MonthlySeries {
    /// Empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the bucket of `at`'s month, creating it at the end if new
    pub fn add(&mut self, at: &DateTime<Utc>, value: f64) {
        *self.buckets.entry(month_label(at)).or_insert(0.0) += value;
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no bucket exists
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Value of one month's bucket
    pub fn get(&self, label: &str) -> Option<f64> {
        self.buckets.get(label).copied()
    }

    /// Bucket labels in series order
    pub fn labels(&self) -> Vec<&'static str> {
        self.buckets.keys().copied().collect()
    }

    /// Bucket values in series order
    pub fn values(&self) -> Vec<f64> {
        self.buckets.values().copied().collect()
    }

    /// Growth between the last two buckets in series order
    pub fn growth(&self) -> f64 {
        growth_percentage(&self.values())
    }

    /// Same buckets, re-ordered January to December
    #[must_use]
    pub fn calendar_ordered(&self) -> Self {
        let mut buckets = self.buckets.clone();
        let position = |label: &str| MONTHS.iter().position(|month| *month == label);
        buckets.sort_by(|a, _, b, _| position(a).cmp(&position(b)));
        Self { buckets }
    }

    /// Chart-ready `(label, value)` points
    pub fn points(&self) -> Vec<SeriesPoint> {
        self.buckets
            .iter()
            .map(|(label, value)| SeriesPoint {
                label: (*label).to_string(),
                value: *value,
            })
            .collect()
    }
}

/// One chart point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Month label
    pub label: String,
    /// Bucket value
    pub value: f64,
}

/// Headline figure, growth and chart series of one KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Count or sum over the whole input
    pub total: f64,
    /// Percentage change between the last two buckets
    pub growth: f64,
    /// Monthly series
    pub series: Vec<SeriesPoint>,
}

impl MetricSummary {
    fn from_series(total: f64, series: &MonthlySeries) -> Self {
        Self {
            total,
            growth: series.growth(),
            series: series.points(),
        }
    }
}

/// Signups per month
pub fn user_series(users: &[User]) -> MonthlySeries {
    count_by_month(users.iter().map(|user| &user.created_at))
}

/// Signals posted per month
pub fn signal_series(signals: &[Signal]) -> MonthlySeries {
    count_by_month(signals.iter().map(|signal| &signal.created_at))
}

/// Platform revenue per month: [`REVENUE_SHARE`] of the absolute amount of
/// every subscription transaction, whatever its sign or status
pub fn revenue_series(transactions: &[Transaction]) -> MonthlySeries {
    let mut series = MonthlySeries::new();
    for tx in subscriptions(transactions) {
        series.add(&tx.created_at, revenue_of(tx));
    }
    series
}

/// Total platform revenue over all subscription transactions
pub fn total_revenue(transactions: &[Transaction]) -> f64 {
    subscriptions(transactions).map(revenue_of).sum()
}

fn subscriptions(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Subscription)
}

fn revenue_of(tx: &Transaction) -> f64 {
    tx.amount.abs() * REVENUE_SHARE
}

fn count_by_month<'a>(timestamps: impl Iterator<Item = &'a DateTime<Utc>>) -> MonthlySeries {
    let mut series = MonthlySeries::new();
    for at in timestamps {
        series.add(at, 1.0);
    }
    series
}

/// The three dashboard KPIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Total users and signups per month
    pub users: MetricSummary,
    /// Total revenue and revenue per month
    pub revenue: MetricSummary,
    /// Total signals and signals per month
    pub signals: MetricSummary,
}

impl DashboardMetrics {
    /// Aggregate freshly fetched lists, keeping first-seen month order
    pub fn from_lists(users: &[User], transactions: &[Transaction], signals: &[Signal]) -> Self {
        Self::build(users, transactions, signals, false)
    }

    /// Aggregate with every series ordered January to December
    pub fn from_lists_calendar_ordered(
        users: &[User],
        transactions: &[Transaction],
        signals: &[Signal],
    ) -> Self {
        Self::build(users, transactions, signals, true)
    }

    fn build(
        users: &[User],
        transactions: &[Transaction],
        signals: &[Signal],
        calendar: bool,
    ) -> Self {
        let order = |series: MonthlySeries| {
            if calendar {
                series.calendar_ordered()
            } else {
                series
            }
        };

        Self {
            users: MetricSummary::from_series(users.len() as f64, &order(user_series(users))),
            revenue: MetricSummary::from_series(
                total_revenue(transactions),
                &order(revenue_series(transactions)),
            ),
            signals: MetricSummary::from_series(
                signals.len() as f64,
                &order(signal_series(signals)),
            ),
        }
    }
}
