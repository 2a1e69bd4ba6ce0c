//! Role and status enumerations with their lowercase wire names

use crate::error::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Generates `as_str`, `ALL`, `Display` and `FromStr` for a unit-only enum
/// whose wire form is a fixed lowercase string per variant.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, {
        $first:ident => $first_wire:literal $(, $variant:ident => $wire:literal)* $(,)?
    }) => {
        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [Self] = &[Self::$first $(, Self::$variant)*];

            /// Wire representation of the variant
            pub const fn as_str(self) -> &'static str {
                match self {
                    Self::$first => $first_wire,
                    $(Self::$variant => $wire,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $first_wire => Ok(Self::$first),
                    $($wire => Ok(Self::$variant),)*
                    _ => Err(ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: concat!($first_wire $(, ", ", $wire)*),
                    }),
                }
            }
        }
    };
}

/// Platform account category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Plain subscriber
    User,
    /// Tipster account subject to pricing plans
    Punter,
}

wire_enum!(Role, "role", { User => "user", Punter => "punter" });

/// Account standing of a platform user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account in good standing
    #[default]
    Active,
    /// Dormant account
    Inactive,
    /// Account blocked by an administrator
    Suspended,
}

wire_enum!(UserStatus, "user status", {
    Active => "active",
    Inactive => "inactive",
    Suspended => "suspended",
});

/// Lifecycle of a financial transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting an administrator decision
    Pending,
    /// Approved and settled
    Completed,
    /// Rejected
    Failed,
}

wire_enum!(TransactionStatus, "transaction status", {
    Pending => "pending",
    Completed => "completed",
    Failed => "failed",
});

impl TransactionStatus {
    /// Whether the transaction still awaits a decision
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Lifecycle of a KYC submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    /// Awaiting review
    Pending,
    /// Identity verified
    Approved,
    /// Submission refused
    Rejected,
}

wire_enum!(KycStatus, "kyc status", {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

impl KycStatus {
    /// Whether the submission still awaits review
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}
