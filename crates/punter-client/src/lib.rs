//! Backend access for the punter admin console
//!
//! Wraps the protocol layer with everything that touches the outside world:
//! the HTTP client for the admin REST backend, an in-memory fixture source,
//! layered configuration, the session token store, logging setup, and the
//! desks that run each workflow against a [`DataSource`].

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod desks;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod session;
pub mod source;

pub use api::ApiClient;
pub use config::{
    ApiConfig, AuthConfig, Config, LogFormat, LoggingConfig, LoggingOverrides, SourceConfig,
    SourceKind,
};
pub use context::AppContext;
pub use dashboard::{BucketOrder, DashboardData};
pub use desks::{
    AccountDesk, EmailDesk, KycDesk, ReviewDesk, ReviewEndpoint, StatusUpdate, TransactionDesk,
    UserDesk,
};
pub use error::{ClientError, ClientResult, GENERIC_FAILURE};
pub use fixtures::{FixtureDataSource, RecordedWrite};
pub use logging::init_logging;
pub use session::SessionStore;
pub use source::{DataSource, StatusPersistence};
