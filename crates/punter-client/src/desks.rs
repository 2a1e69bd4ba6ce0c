//! Workflow desks: protocol state plus the backend calls that change it
//!
//! Every write follows the same path. The protocol layer checks the request
//! and builds a command, the data source carries it out, and only then is the
//! command applied to the local list. A failed call leaves the list exactly as
//! it was and surfaces a typed error; nothing is retried.

use crate::api::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::source::{DataSource, StatusPersistence};
use async_trait::async_trait;
use punter_protocol::{
    AdminDraft, AdminRoster, Confirmation, Decision, DeliveryReport, EmailDraft, ProtocolError,
    RecipientSelection, ReviewBoard, ReviewCommand, Reviewable, UserDirectory,
};
use punter_types::{Admin, KycRequest, Transaction, User, UserStatus};
use std::sync::Arc;
use tracing::{info, warn};

/// Backend calls behind a reviewable record type
#[async_trait]
pub trait ReviewEndpoint: Reviewable<Status: Send + Sync> + Send + Sync + Sized {
    /// Fetch the full list
    async fn fetch(source: &dyn DataSource) -> ClientResult<Vec<Self>>;

    /// Send a prepared decision
    async fn submit(source: &dyn DataSource, command: &ReviewCommand<Self::Status>)
    -> ClientResult<()>;
}

#[async_trait]
impl ReviewEndpoint for KycRequest {
    async fn fetch(source: &dyn DataSource) -> ClientResult<Vec<Self>> {
        source.kyc_requests().await
    }

    async fn submit(
        source: &dyn DataSource,
        command: &ReviewCommand<Self::Status>,
    ) -> ClientResult<()> {
        let user_id = command.owner.as_deref().unwrap_or_default();
        source.verify_kyc(&command.id, user_id, command.next).await
    }
}

#[async_trait]
impl ReviewEndpoint for Transaction {
    async fn fetch(source: &dyn DataSource) -> ClientResult<Vec<Self>> {
        source.transactions().await
    }

    async fn submit(
        source: &dyn DataSource,
        command: &ReviewCommand<Self::Status>,
    ) -> ClientResult<()> {
        source.set_transaction_status(&command.id, command.next).await
    }
}

/// Review list wired to its backend
#[derive(Debug)]
pub struct ReviewDesk<T> {
    source: Arc<dyn DataSource>,
    board: ReviewBoard<T>,
}

/// KYC review desk
pub type KycDesk = ReviewDesk<KycRequest>;

/// Transaction review desk
pub type TransactionDesk = ReviewDesk<Transaction>;

impl<T: ReviewEndpoint> ReviewDesk<T> {
    /// Fetch the list and open a desk over it
    pub async fn load(source: Arc<dyn DataSource>) -> ClientResult<Self> {
        let items = T::fetch(source.as_ref()).await?;
        Ok(Self {
            source,
            board: ReviewBoard::new(items),
        })
    }

    /// Re-fetch the list; the detail selection is dropped
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let items = T::fetch(self.source.as_ref()).await?;
        self.board.replace(items);
        Ok(())
    }

    /// Local review state
    pub const fn board(&self) -> &ReviewBoard<T> {
        &self.board
    }

    /// Local review state, for selection changes
    pub const fn board_mut(&mut self) -> &mut ReviewBoard<T> {
        &mut self.board
    }

    /// Decide a pending record and record the outcome once the backend agrees
    pub async fn decide(&mut self, id: &str, decision: Decision) -> ClientResult<&T> {
        let command = self.board.prepare(id, decision)?;
        if let Err(e) = T::submit(self.source.as_ref(), &command).await {
            warn!(kind = T::KIND, id, %decision, error = %e, "decision not recorded");
            return Err(e);
        }
        info!(kind = T::KIND, id, from = %command.previous, to = %command.next, "decision recorded");
        Ok(self.board.apply(&command)?)
    }
}

/// Admin accounts wired to the backend
#[derive(Debug)]
pub struct AccountDesk {
    source: Arc<dyn DataSource>,
    roster: AdminRoster,
}

impl AccountDesk {
    /// Fetch the admin list
    pub async fn load(source: Arc<dyn DataSource>) -> ClientResult<Self> {
        let admins = source.admins().await?;
        Ok(Self {
            source,
            roster: AdminRoster::new(admins),
        })
    }

    /// Loaded admins
    pub const fn roster(&self) -> &AdminRoster {
        &self.roster
    }

    /// Validate the draft and create the account.
    ///
    /// When the signup response does not describe the new admin, the list
    /// is re-fetched instead of guessing its shape.
    pub async fn create(&mut self, draft: &AdminDraft) -> ClientResult<Admin> {
        let payload = draft.validate()?;
        let created = self.source.create_admin(&payload).await?;

        let admin = if let Some(admin) = created {
            self.roster.insert(admin.clone());
            admin
        } else {
            let admins = self.source.admins().await?;
            self.roster.replace(admins);
            self.roster
                .admins()
                .iter()
                .find(|admin| admin.email == payload.email)
                .cloned()
                .ok_or_else(|| {
                    ClientError::decode(
                        endpoints::SIGNUP,
                        format!("created admin {} missing from admin list", payload.email),
                    )
                })?
        };

        info!(id = %admin.id, email = %admin.email, "admin created");
        Ok(admin)
    }

    /// Delete an admin after operator confirmation
    pub async fn delete(&mut self, id: &str, confirmation: Confirmation) -> ClientResult<Admin> {
        let command = self.roster.prepare_delete(id, confirmation)?;
        self.source.delete_admin(&command.id).await?;
        let removed = self
            .roster
            .apply_delete(&command)
            .ok_or_else(|| ProtocolError::not_found("admin", id))?;
        info!(id, "admin deleted");
        Ok(removed)
    }
}

/// Outcome of a user status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The user already had the requested status; nothing was sent
    Unchanged,
    /// The status changed locally, and remotely when supported
    Applied(StatusPersistence),
}

/// User directory wired to the backend
#[derive(Debug)]
pub struct UserDesk {
    source: Arc<dyn DataSource>,
    directory: UserDirectory,
}

impl UserDesk {
    /// Fetch the user list
    pub async fn load(source: Arc<dyn DataSource>) -> ClientResult<Self> {
        let users = source.users().await?;
        Ok(Self {
            source,
            directory: UserDirectory::new(users),
        })
    }

    /// Local directory state
    pub const fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Local directory state, for selection changes
    pub const fn directory_mut(&mut self) -> &mut UserDirectory {
        &mut self.directory
    }

    /// Change a user's status
    pub async fn set_status(&mut self, id: &str, status: UserStatus) -> ClientResult<StatusUpdate> {
        let change = self.directory.prepare_status(id, status)?;
        if change.is_noop() {
            return Ok(StatusUpdate::Unchanged);
        }

        let persistence = self.source.update_user_status(id, status).await?;
        if persistence == StatusPersistence::LocalOnly {
            warn!(id, %status, "user status changed locally only; backend contract unconfirmed");
        }
        self.directory.apply_status(&change)?;
        info!(id, from = %change.previous, to = %change.next, "user status updated");
        Ok(StatusUpdate::Applied(persistence))
    }
}

/// Email composer wired to the user list and mailer
#[derive(Debug)]
pub struct EmailDesk {
    source: Arc<dyn DataSource>,
    users: Vec<User>,
}

impl EmailDesk {
    /// Fetch the users recipients are resolved against
    pub async fn load(source: Arc<dyn DataSource>) -> ClientResult<Self> {
        let users = source.users().await?;
        Ok(Self { source, users })
    }

    /// Accounts selectable for a selection
    pub fn candidates(&self, selection: &RecipientSelection) -> Vec<&User> {
        selection.candidates(&self.users)
    }

    /// Compose and send
    pub async fn send(&self, draft: &EmailDraft) -> ClientResult<DeliveryReport> {
        let message = draft.compose(&self.users)?;
        let report = self.source.send_email(&message).await?;
        info!(
            selection = %report.selection,
            delivered = report.delivered.len(),
            "email sent"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::fixtures::{FixtureDataSource, RecordedWrite};
    use pretty_assertions::assert_eq;
    use punter_types::{KycStatus, TransactionStatus};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn shared(source: &FixtureDataSource) -> Arc<dyn DataSource> {
        Arc::new(source.clone())
    }

    #[tokio::test]
    async fn test_kyc_decision_reaches_backend_then_list() {
        let fixture = FixtureDataSource::new();
        let mut desk = KycDesk::load(shared(&fixture)).await.unwrap();
        desk.board_mut().open("kyc-1").unwrap();

        let decided = desk.decide("kyc-1", Decision::Approve).await.unwrap();
        assert_eq!(decided.status, KycStatus::Approved);
        assert!(desk.board().selected().is_none());
        assert_eq!(
            fixture.writes().await,
            vec![RecordedWrite::KycDecision {
                id: "kyc-1".to_string(),
                user_id: "2".to_string(),
                status: KycStatus::Approved,
            }]
        );
    }

    #[tokio::test]
    async fn test_failed_call_leaves_list_untouched() {
        let fixture = FixtureDataSource::new();
        let mut desk = TransactionDesk::load(shared(&fixture)).await.unwrap();
        let before = desk.board().items().to_vec();

        let failing: Arc<dyn DataSource> = Arc::new(fixture.with_failure("503"));
        desk.source = failing;
        desk.board_mut().open("tx-3").unwrap();

        let err = desk.decide("tx-3", Decision::Approve).await.unwrap_err();
        assert!(matches!(err, ClientError::Fixture { .. }));
        assert_eq!(desk.board().items(), before.as_slice());
        assert_eq!(desk.board().selected().unwrap().id, "tx-3");
    }

    #[tokio::test]
    async fn test_decided_transaction_is_not_resent() {
        let fixture = FixtureDataSource::new();
        let mut desk = TransactionDesk::load(shared(&fixture)).await.unwrap();

        let err = desk.decide("tx-1", Decision::Reject).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::NotPending { .. })
        ));
        assert!(fixture.writes().await.is_empty());
        assert_eq!(
            desk.board().get("tx-1").unwrap().status,
            TransactionStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_create_admin_with_and_without_echo() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut draft = AdminDraft::new();
        draft.set_first_name("Jane", &mut rng);
        draft.set_last_name("Doe", &mut rng);
        draft.set_email("jane@punter.io");

        let fixture = FixtureDataSource::new();
        let mut desk = AccountDesk::load(shared(&fixture)).await.unwrap();
        let admin = desk.create(&draft).await.unwrap();
        assert_eq!(admin.email, "jane@punter.io");
        assert_eq!(desk.roster().admins().len(), 3);

        let quiet = FixtureDataSource::new().without_signup_echo();
        let mut desk = AccountDesk::load(shared(&quiet)).await.unwrap();
        let admin = desk.create(&draft).await.unwrap();
        assert_eq!(admin.email, "jane@punter.io");
        assert_eq!(desk.roster().admins().len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_never_sent() {
        let fixture = FixtureDataSource::new();
        let mut desk = AccountDesk::load(shared(&fixture)).await.unwrap();
        let err = desk.create(&AdminDraft::new()).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::Validation(_))
        ));
        assert!(fixture.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_admin_needs_confirmation() {
        let fixture = FixtureDataSource::new();
        let mut desk = AccountDesk::load(shared(&fixture)).await.unwrap();

        assert!(desk.delete("admin-1", Confirmation::Declined).await.is_err());
        assert!(fixture.writes().await.is_empty());

        let removed = desk.delete("admin-1", Confirmation::Confirmed).await.unwrap();
        assert_eq!(removed.id, "admin-1");
        assert_eq!(desk.roster().admins().len(), 1);
    }

    #[tokio::test]
    async fn test_user_status_update() {
        let fixture = FixtureDataSource::new();
        let mut desk = UserDesk::load(shared(&fixture)).await.unwrap();

        assert_eq!(
            desk.set_status("1", UserStatus::Active).await.unwrap(),
            StatusUpdate::Unchanged
        );
        assert_eq!(
            desk.set_status("1", UserStatus::Suspended).await.unwrap(),
            StatusUpdate::Applied(StatusPersistence::Remote)
        );
        assert_eq!(
            desk.directory().get("1").unwrap().status,
            UserStatus::Suspended
        );
        assert_eq!(fixture.writes().await.len(), 1);
    }

    #[tokio::test]
    async fn test_email_send() {
        let fixture = FixtureDataSource::new();
        let desk = EmailDesk::load(shared(&fixture)).await.unwrap();
        assert_eq!(desk.candidates(&RecipientSelection::AllPunters).len(), 4);

        let report = desk
            .send(&EmailDraft {
                recipients: RecipientSelection::SpecificPunter("2".to_string()),
                subject: "Welcome".to_string(),
                body: "Thanks for joining".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(report.delivered, vec!["bob.s@example.com"]);
    }
}
