//! KYC review rules

use crate::query::{SortKey, cmp_ignore_case};
use crate::review::{Decision, ReviewQuery, Reviewable};
use punter_types::{KycRequest, KycStatus, ParseEnumError};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::str::FromStr;

/// Sort columns of the KYC list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KycSortKey {
    /// Submission time, newest first by default
    Submitted,
    /// Submitter name
    Name,
}

impl SortKey for KycSortKey {
    fn default_direction(self) -> crate::SortDirection {
        match self {
            Self::Submitted => crate::SortDirection::Descending,
            Self::Name => crate::SortDirection::Ascending,
        }
    }
}

impl FromStr for KycSortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submitted" | "date" => Ok(Self::Submitted),
            "name" => Ok(Self::Name),
            _ => Err(ParseEnumError {
                kind: "kyc sort key",
                value: s.to_string(),
                expected: "submitted, name",
            }),
        }
    }
}

/// Query over the KYC list
pub type KycQuery = ReviewQuery<KycStatus, KycSortKey>;

impl Reviewable for KycRequest {
    type Status = KycStatus;
    type SortKey = KycSortKey;

    const KIND: &'static str = "kyc request";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.user_id)
    }

    fn status(&self) -> KycStatus {
        self.status
    }

    fn set_status(&mut self, status: KycStatus) {
        self.status = status;
    }

    fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    fn outcome(decision: Decision) -> KycStatus {
        match decision {
            Decision::Approve => KycStatus::Approved,
            Decision::Reject => KycStatus::Rejected,
        }
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![
            Cow::Owned(self.full_name()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.id_type.as_str()),
        ];
        fields.extend(self.phone.as_deref().map(Cow::Borrowed));
        fields.extend(self.id_number.as_deref().map(Cow::Borrowed));
        fields
    }

    fn compare(&self, other: &Self, key: KycSortKey) -> Ordering {
        match key {
            KycSortKey::Submitted => self.created_at.cmp(&other.created_at),
            KycSortKey::Name => cmp_ignore_case(&self.full_name(), &other.full_name()),
        }
    }
}
