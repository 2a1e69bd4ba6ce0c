//! Records served by the platform backend
//!
//! The backend is document-oriented: identifiers arrive as `_id` and field
//! names are camelCase. Every record also accepts a plain `id` key so that
//! fixtures and older endpoints decode the same way.

use crate::status::{KycStatus, Role, TransactionStatus, UserStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named pricing tier offered by a punter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPlan {
    /// Tier name, e.g. `Gold`
    pub name: String,
    /// Monthly price
    pub price: f64,
    /// Feature bullet points
    #[serde(default)]
    pub features: Vec<String>,
}

/// A platform account (plain user or punter)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Given name
    #[serde(default)]
    pub firstname: String,
    /// Family name
    #[serde(default)]
    pub lastname: String,
    /// Contact email
    pub email: String,
    /// Public handle
    #[serde(default)]
    pub username: String,
    /// Account category
    pub role: Role,
    /// Account standing
    #[serde(default)]
    pub status: UserStatus,
    /// Wallet balance, when the backend exposes it
    #[serde(default)]
    pub balance: Option<f64>,
    /// Whether KYC has been approved for this account
    #[serde(default)]
    pub is_verified: bool,
    /// Free-form profile text
    #[serde(default)]
    pub bio: Option<String>,
    /// Pricing tiers (punters only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pricing_plans: Vec<PricingPlan>,
    /// Signup time
    pub created_at: DateTime<Utc>,
}

impl User {
    /// `firstname lastname`, trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

/// An administrator account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Given name
    pub firstname: String,
    /// Family name
    pub lastname: String,
    /// Login email
    pub email: String,
    /// Generated password, only echoed back on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Signup payload for `POST /admin/Signup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdmin {
    /// Given name
    pub firstname: String,
    /// Family name
    pub lastname: String,
    /// Login email
    pub email: String,
    /// Generated or manually edited password
    pub password: String,
}

/// Category of a transaction
///
/// Unknown categories are preserved verbatim so that listing never fails on
/// a type the console does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionKind {
    /// Purchase of a punter's pricing plan; the platform keeps a commission
    Subscription,
    /// Payout to a bank account
    Withdrawal,
    /// Any other backend category
    Other(String),
}

impl TransactionKind {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Subscription => "subscription",
            Self::Withdrawal => "withdrawal",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for TransactionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "subscription" => Self::Subscription,
            "withdrawal" => Self::Withdrawal,
            _ => Self::Other(value),
        }
    }
}

impl From<TransactionKind> for String {
    fn from(kind: TransactionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination account of a withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    /// Account holder
    pub account_name: String,
    /// Account number
    pub account_number: String,
    /// Bank sort/routing code
    pub bank_code: String,
}

/// A financial movement on the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Signed amount; withdrawals and refunds are negative
    pub amount: f64,
    /// Transaction category
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Settlement state
    pub status: TransactionStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Human readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Counterparty name
    #[serde(default)]
    pub merchant: Option<String>,
    /// Backend category tag
    #[serde(default)]
    pub category: Option<String>,
    /// Owning user id
    #[serde(default)]
    pub user: Option<String>,
    /// Bank account for withdrawals
    #[serde(default)]
    pub details: Option<BankDetails>,
}

/// Front and back scans of an identity document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdPhotos {
    /// Front side image URL
    #[serde(default)]
    pub front: String,
    /// Back side image URL
    #[serde(default)]
    pub back: String,
}

/// Identity verification submitted by a platform user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycRequest {
    /// Backend identifier of the submission
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Account the submission belongs to
    pub user_id: String,
    /// Given name of the submitter
    #[serde(default)]
    pub firstname: String,
    /// Family name of the submitter
    #[serde(default)]
    pub lastname: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address
    #[serde(default)]
    pub address: Option<String>,
    /// Document type, e.g. `Passport`
    #[serde(default)]
    pub id_type: String,
    /// Document number
    #[serde(default)]
    pub id_number: Option<String>,
    /// Document scans
    #[serde(default)]
    pub id_photos: IdPhotos,
    /// Selfie image URL
    #[serde(default)]
    pub selfie: String,
    /// Review state
    pub status: KycStatus,
    /// Submission time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Reviewer-facing notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl KycRequest {
    /// `firstname lastname`, trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

/// A betting signal posted by a punter; only counted by the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Posting time
    pub created_at: DateTime<Utc>,
    /// Headline, if any
    #[serde(default)]
    pub title: Option<String>,
}
