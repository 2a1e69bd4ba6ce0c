//! Errors raised by the console's business rules

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Result type alias for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Per-field validation messages, keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field, replacing any earlier one
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Message recorded for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether no field failed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failed fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(field, message)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Errors produced by the protocol layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// No record with this id is loaded
    #[error("{kind} `{id}` not found")]
    NotFound {
        /// Record kind, e.g. `kyc request`
        kind: &'static str,
        /// Requested id
        id: String,
    },

    /// A decision was requested for a record that has already been decided
    #[error("{kind} `{id}` is already {status}; only pending items can be decided")]
    NotPending {
        /// Record kind
        kind: &'static str,
        /// Record id
        id: String,
        /// Current status
        status: String,
    },

    /// Form validation failed
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// A destructive action was attempted without operator confirmation
    #[error("deleting admin `{id}` requires confirmation")]
    Unconfirmed {
        /// Admin id
        id: String,
    },

    /// Email subject or body is blank
    #[error("please fill in both subject and content fields")]
    IncompleteEmail,

    /// A specific recipient was requested but none was chosen
    #[error("please select a recipient")]
    MissingRecipient,

    /// The chosen recipient is not eligible for the selection
    #[error("user `{id}` is not a valid {expected} recipient")]
    InvalidRecipient {
        /// Chosen user id
        id: String,
        /// Role required by the selection
        expected: &'static str,
    },

    /// The selection resolved to nobody
    #[error("no recipients match the selection")]
    NoRecipients,
}

impl ProtocolError {
    /// Create a not found error
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}
