//! Error types for the backend client

use punter_protocol::ProtocolError;
use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Generic text shown to the operator for any failed backend call
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors that can occur while talking to the backend or local stores
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced an HTTP response
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        /// Endpoint path
        endpoint: String,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status
    #[error("{endpoint} returned {status}")]
    Status {
        /// Endpoint path
        endpoint: String,
        /// HTTP status
        status: StatusCode,
    },

    /// The response body did not match the expected schema
    #[error("unexpected response from {endpoint}: {message}")]
    Decode {
        /// Endpoint path
        endpoint: String,
        /// Decoder message
        message: String,
    },

    /// A business rule refused the operation before any request was sent
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session file could not be read or written
    #[error("session store error at {path}: {message}")]
    Session {
        /// Session file path
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Invalid or unreadable configuration
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// A session is required but none is stored
    #[error("not logged in; run `punter-admin login` first")]
    NotAuthenticated,

    /// The fixture data source was told to fail
    #[error("fixture data source failure: {message}")]
    Fixture {
        /// Configured failure message
        message: String,
    },
}

impl ClientError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Create a session store error
    pub fn session(path: impl Into<PathBuf>, err: &io::Error) -> Self {
        Self::Session {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Whether the failure happened on the wire rather than in local rules
    pub const fn is_backend(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Status { .. } | Self::Decode { .. } | Self::Fixture { .. }
        )
    }

    /// Operator-facing message.
    ///
    /// Backend failures of any kind (4xx, 5xx, transport, bad bodies) collapse
    /// to one generic text; local rule violations keep their own message.
    pub fn user_message(&self) -> String {
        if self.is_backend() {
            GENERIC_FAILURE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}
