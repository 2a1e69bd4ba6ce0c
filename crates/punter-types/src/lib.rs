//! Data model for the punter platform admin console
//!
//! These types mirror the JSON documents served by the platform backend. They
//! carry no I/O and no async so that the protocol layer and the client can
//! share them freely.

#![forbid(unsafe_code)]

pub mod envelope;
pub mod error;
pub mod models;
pub mod status;

pub use envelope::ListEnvelope;
pub use error::ParseEnumError;
pub use models::{
    Admin, BankDetails, IdPhotos, KycRequest, NewAdmin, PricingPlan, Signal, Transaction,
    TransactionKind, User,
};
pub use status::{KycStatus, Role, TransactionStatus, UserStatus};
