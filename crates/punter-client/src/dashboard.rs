//! Dashboard loader

use crate::error::ClientResult;
use crate::source::DataSource;
use punter_protocol::DashboardMetrics;
use punter_types::{Signal, Transaction, User};
use tracing::{info, instrument};

/// Month order of the dashboard series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BucketOrder {
    /// Order in which months are first seen in the data
    #[default]
    FirstSeen,
    /// January to December
    Calendar,
}

/// The three lists the dashboard is computed from
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    /// All users
    pub users: Vec<User>,
    /// All transactions
    pub transactions: Vec<Transaction>,
    /// All signals
    pub signals: Vec<Signal>,
}

impl DashboardData {
    /// Fetch users, transactions and signals concurrently.
    ///
    /// Any failure fails the whole load; no partial data is returned.
    #[instrument(skip(source), fields(source = source.name()))]
    pub async fn load(source: &dyn DataSource) -> ClientResult<Self> {
        let (users, transactions, signals) =
            tokio::try_join!(source.users(), source.transactions(), source.signals())?;
        info!(
            users = users.len(),
            transactions = transactions.len(),
            signals = signals.len(),
            "dashboard data loaded"
        );
        Ok(Self {
            users,
            transactions,
            signals,
        })
    }

    /// Aggregate the KPIs
    pub fn metrics(&self, order: BucketOrder) -> DashboardMetrics {
        match order {
            BucketOrder::FirstSeen => {
                DashboardMetrics::from_lists(&self.users, &self.transactions, &self.signals)
            }
            BucketOrder::Calendar => DashboardMetrics::from_lists_calendar_ordered(
                &self.users,
                &self.transactions,
                &self.signals,
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::fixtures::FixtureDataSource;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_loads_all_three_lists() {
        let source = FixtureDataSource::new();
        let data = DashboardData::load(&source).await.unwrap();
        let metrics = data.metrics(BucketOrder::FirstSeen);

        assert_eq!(metrics.users.total, 8.0);
        assert_eq!(metrics.signals.total, 5.0);
        assert!(metrics.revenue.total > 0.0);
    }

    #[tokio::test]
    async fn test_any_failure_fails_the_load() {
        let source = FixtureDataSource::new().with_failure("timeout");
        let err = DashboardData::load(&source).await.unwrap_err();
        assert!(matches!(err, ClientError::Fixture { .. }));
    }

    #[tokio::test]
    async fn test_calendar_order() {
        let source = FixtureDataSource::new();
        let data = DashboardData::load(&source).await.unwrap();
        let labels: Vec<_> = data
            .metrics(BucketOrder::Calendar)
            .users
            .series
            .into_iter()
            .map(|point| point.label)
            .collect();
        assert_eq!(labels, vec!["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Nov"]);
    }
}
