//! Backend abstraction shared by the HTTP client and the fixture data
//!
//! Every workflow talks to a [`DataSource`]; which implementation backs it is
//! decided once, from configuration, when the [`crate::AppContext`] is built.

use crate::error::ClientResult;
use async_trait::async_trait;
use punter_protocol::{DeliveryReport, EmailMessage};
use punter_types::{
    Admin, KycRequest, KycStatus, NewAdmin, Signal, Transaction, TransactionStatus, User,
    UserStatus,
};
use std::fmt;

/// Whether a user status change reached the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPersistence {
    /// The backend acknowledged the change
    Remote,
    /// No status endpoint is known; only the loaded list changed
    LocalOnly,
}

/// Every backend operation the console performs
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Exchange credentials for a session token
    async fn login(&self, email: &str, password: &str) -> ClientResult<String>;

    /// `GET /admin/getAdmins`
    async fn admins(&self) -> ClientResult<Vec<Admin>>;

    /// `POST /admin/Signup`.
    ///
    /// Returns the created admin when the response body describes it, `None`
    /// when the backend accepted the request without a usable body.
    async fn create_admin(&self, admin: &NewAdmin) -> ClientResult<Option<Admin>>;

    /// `POST /admin/deleteAdmin`
    async fn delete_admin(&self, id: &str) -> ClientResult<()>;

    /// `GET /admin/getUsers`
    async fn users(&self) -> ClientResult<Vec<User>>;

    /// Persist a user status change where the backend supports it
    async fn update_user_status(&self, id: &str, status: UserStatus)
    -> ClientResult<StatusPersistence>;

    /// `GET /admin/getTransactions`
    async fn transactions(&self) -> ClientResult<Vec<Transaction>>;

    /// `POST /admin/transactionStatus`
    async fn set_transaction_status(&self, id: &str, status: TransactionStatus)
    -> ClientResult<()>;

    /// `GET /admin/getSignals`
    async fn signals(&self) -> ClientResult<Vec<Signal>>;

    /// `GET /admin/getIdentifications`
    async fn kyc_requests(&self) -> ClientResult<Vec<KycRequest>>;

    /// `POST /admin/verifyAction`
    async fn verify_kyc(&self, id: &str, user_id: &str, status: KycStatus) -> ClientResult<()>;

    /// Hand a composed email to the mailer
    async fn send_email(&self, message: &EmailMessage) -> ClientResult<DeliveryReport>;
}
