//! Transaction review rules

use crate::query::{Sort, SortDirection, SortKey};
use crate::review::{Decision, ReviewQuery, Reviewable};
use punter_types::{ParseEnumError, Transaction, TransactionStatus};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::str::FromStr;

/// Sort columns of the transaction list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionSortKey {
    /// Creation time, newest first by default
    Date,
    /// Signed amount, smallest first by default
    Amount,
}

impl SortKey for TransactionSortKey {
    fn default_direction(self) -> SortDirection {
        match self {
            Self::Date => SortDirection::Descending,
            Self::Amount => SortDirection::Ascending,
        }
    }
}

impl FromStr for TransactionSortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            _ => Err(ParseEnumError {
                kind: "transaction sort key",
                value: s.to_string(),
                expected: "date, amount",
            }),
        }
    }
}

/// Query over the transaction list
pub type TransactionQuery = ReviewQuery<TransactionStatus, TransactionSortKey>;

impl TransactionQuery {
    /// The list's initial state: everything, newest first
    pub fn newest_first() -> Self {
        Self::default().with_sort(Sort::by(TransactionSortKey::Date))
    }
}

impl Reviewable for Transaction {
    type Status = TransactionStatus;
    type SortKey = TransactionSortKey;

    const KIND: &'static str = "transaction";

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> TransactionStatus {
        self.status
    }

    fn set_status(&mut self, status: TransactionStatus) {
        self.status = status;
    }

    fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    fn outcome(decision: Decision) -> TransactionStatus {
        match decision {
            Decision::Approve => TransactionStatus::Completed,
            Decision::Reject => TransactionStatus::Failed,
        }
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields: Vec<Cow<'_, str>> = [&self.description, &self.merchant, &self.category]
            .into_iter()
            .filter_map(|field| field.as_deref().map(Cow::Borrowed))
            .collect();
        fields.push(Cow::Owned(self.amount.to_string()));
        fields.push(Cow::Borrowed(self.kind.as_str()));
        fields
    }

    fn compare(&self, other: &Self, key: TransactionSortKey) -> Ordering {
        match key {
            TransactionSortKey::Date => self.created_at.cmp(&other.created_at),
            TransactionSortKey::Amount => self.amount.total_cmp(&other.amount),
        }
    }
}
