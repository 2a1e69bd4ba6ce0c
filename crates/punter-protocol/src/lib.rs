//! Business rules of the punter admin console
//!
//! Everything here is synchronous and free of I/O: the client crate feeds
//! records in, asks for derived views, and applies state changes only after
//! the backend has confirmed them.
//!
//! - [`metrics`] buckets users, revenue and signals by month
//! - [`review`] is the shared pending → decided workflow behind KYC and
//!   transaction review
//! - [`directory`] filters, sorts and updates the user list
//! - [`accounts`] validates new admin accounts and generates their passwords
//! - [`email`] resolves bulk email recipients

#![forbid(unsafe_code)]

pub mod accounts;
pub mod directory;
pub mod email;
pub mod error;
pub mod kyc;
pub mod metrics;
pub mod query;
pub mod review;
pub mod transactions;

pub use accounts::{AdminDraft, AdminRoster, Confirmation, DeleteAdmin, generate_password};
pub use directory::{StatusChange, UserDirectory, UserQuery, UserSortKey};
pub use email::{DeliveryReport, EmailDraft, EmailMessage, Recipient, RecipientSelection};
pub use error::{FieldErrors, ProtocolError, ProtocolResult};
pub use kyc::{KycQuery, KycSortKey};
pub use metrics::{DashboardMetrics, MetricSummary, MonthlySeries, SeriesPoint};
pub use query::{Filter, Sort, SortDirection, SortKey};
pub use review::{Decision, ReviewBoard, ReviewCommand, ReviewQuery, Reviewable};
pub use transactions::{TransactionQuery, TransactionSortKey};
