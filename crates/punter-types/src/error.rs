//! Error types shared by the data model

use thiserror::Error;

/// Returned when a wire string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseEnumError {
    /// Name of the enum being parsed, e.g. `kyc status`
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
    /// Comma separated list of accepted values
    pub expected: &'static str,
}
