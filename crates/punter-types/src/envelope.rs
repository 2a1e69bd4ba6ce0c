//! Response envelopes returned by the platform backend

use serde::{Deserialize, Serialize};

/// Body of every list endpoint: `{ "data": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    /// Records returned by the endpoint
    pub data: Vec<T>,
}

impl<T> ListEnvelope<T> {
    /// Unwrap the envelope into its records
    pub fn into_inner(self) -> Vec<T> {
        self.data
    }
}

impl<T> From<Vec<T>> for ListEnvelope<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}
