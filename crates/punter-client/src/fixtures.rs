//! In-memory data source seeded with sample records
//!
//! Used for demos and tests in place of the live backend. Writes mutate the
//! in-memory records and are also recorded so tests can assert on them.

use crate::error::{ClientError, ClientResult};
use crate::source::{DataSource, StatusPersistence};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use punter_protocol::{DeliveryReport, EmailMessage};
use punter_types::{
    Admin, BankDetails, IdPhotos, KycRequest, KycStatus, NewAdmin, PricingPlan, Role, Signal,
    Transaction, TransactionKind, TransactionStatus, User, UserStatus,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A write the fixture source has accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedWrite {
    /// Admin created
    AdminCreated {
        /// Login email
        email: String,
    },
    /// Admin deleted
    AdminDeleted {
        /// Admin id
        id: String,
    },
    /// User status changed
    UserStatus {
        /// User id
        id: String,
        /// New status
        status: UserStatus,
    },
    /// Transaction decided
    TransactionStatus {
        /// Transaction id
        id: String,
        /// New status
        status: TransactionStatus,
    },
    /// KYC request decided
    KycDecision {
        /// Request id
        id: String,
        /// Owning user id
        user_id: String,
        /// New status
        status: KycStatus,
    },
    /// Email sent
    EmailSent {
        /// Subject line
        subject: String,
        /// Number of recipients
        recipients: usize,
    },
}

#[derive(Debug, Default)]
struct FixtureState {
    admins: Vec<Admin>,
    users: Vec<User>,
    transactions: Vec<Transaction>,
    signals: Vec<Signal>,
    kyc_requests: Vec<KycRequest>,
    writes: Vec<RecordedWrite>,
    next_id: u64,
}

/// Fixture-backed [`DataSource`]
#[derive(Debug, Clone)]
pub struct FixtureDataSource {
    state: Arc<Mutex<FixtureState>>,
    failure: Option<String>,
    echo_signup: bool,
}

impl Default for FixtureDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureDataSource {
    /// Source seeded with the built-in sample records
    pub fn new() -> Self {
        Self::from_state(FixtureState {
            admins: sample_admins(),
            users: sample_users(),
            transactions: sample_transactions(),
            signals: sample_signals(),
            kyc_requests: sample_kyc_requests(),
            writes: Vec::new(),
            next_id: 100,
        })
    }

    /// Source with no records at all
    pub fn empty() -> Self {
        Self::from_state(FixtureState::default())
    }

    fn from_state(state: FixtureState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            failure: None,
            echo_signup: true,
        }
    }

    /// Fail every call with `message`
    #[must_use]
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Accept signups without describing the created admin, like backends
    /// that answer with a bare acknowledgement
    #[must_use]
    pub const fn without_signup_echo(mut self) -> Self {
        self.echo_signup = false;
        self
    }

    /// Replace the user records
    #[must_use]
    pub fn with_users(self, users: Vec<User>) -> Self {
        self.edit(|state| state.users = users)
    }

    /// Replace the transaction records
    #[must_use]
    pub fn with_transactions(self, transactions: Vec<Transaction>) -> Self {
        self.edit(|state| state.transactions = transactions)
    }

    /// Replace the signal records
    #[must_use]
    pub fn with_signals(self, signals: Vec<Signal>) -> Self {
        self.edit(|state| state.signals = signals)
    }

    /// Replace the KYC records
    #[must_use]
    pub fn with_kyc_requests(self, kyc_requests: Vec<KycRequest>) -> Self {
        self.edit(|state| state.kyc_requests = kyc_requests)
    }

    /// Replace the admin records
    #[must_use]
    pub fn with_admins(self, admins: Vec<Admin>) -> Self {
        self.edit(|state| state.admins = admins)
    }

    /// Apply a builder edit. A clone that shares the state edits it for
    /// every holder; an edit that finds the state locked is dropped with a
    /// warning.
    fn edit(mut self, f: impl FnOnce(&mut FixtureState)) -> Self {
        if let Some(state) = Arc::get_mut(&mut self.state) {
            f(state.get_mut());
        } else if let Ok(mut state) = self.state.try_lock() {
            f(&mut state);
        } else {
            warn!("fixture state is locked by another holder; builder edit dropped");
        }
        self
    }

    /// Writes accepted so far, oldest first
    pub async fn writes(&self) -> Vec<RecordedWrite> {
        self.state.lock().await.writes.clone()
    }

    fn check(&self) -> ClientResult<()> {
        match &self.failure {
            Some(message) => Err(ClientError::Fixture {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataSource for FixtureDataSource {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        self.check()?;
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Fixture {
                message: "email and password are required".to_string(),
            });
        }
        Ok(format!("fixture-token-{}", email.trim()))
    }

    async fn admins(&self) -> ClientResult<Vec<Admin>> {
        self.check()?;
        Ok(self.state.lock().await.admins.clone())
    }

    async fn create_admin(&self, admin: &NewAdmin) -> ClientResult<Option<Admin>> {
        self.check()?;
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let created = Admin {
            id: format!("admin-{}", state.next_id),
            firstname: admin.firstname.clone(),
            lastname: admin.lastname.clone(),
            email: admin.email.clone(),
            password: Some(admin.password.clone()),
        };
        state.admins.push(created.clone());
        state.writes.push(RecordedWrite::AdminCreated {
            email: admin.email.clone(),
        });
        debug!(id = %created.id, "fixture admin created");
        Ok(self.echo_signup.then_some(created))
    }

    async fn delete_admin(&self, id: &str) -> ClientResult<()> {
        self.check()?;
        let mut state = self.state.lock().await;
        state.admins.retain(|admin| admin.id != id);
        state
            .writes
            .push(RecordedWrite::AdminDeleted { id: id.to_string() });
        Ok(())
    }

    async fn users(&self) -> ClientResult<Vec<User>> {
        self.check()?;
        Ok(self.state.lock().await.users.clone())
    }

    async fn update_user_status(
        &self,
        id: &str,
        status: UserStatus,
    ) -> ClientResult<StatusPersistence> {
        self.check()?;
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.iter_mut().find(|user| user.id == id) {
            user.status = status;
        }
        state.writes.push(RecordedWrite::UserStatus {
            id: id.to_string(),
            status,
        });
        Ok(StatusPersistence::Remote)
    }

    async fn transactions(&self) -> ClientResult<Vec<Transaction>> {
        self.check()?;
        Ok(self.state.lock().await.transactions.clone())
    }

    async fn set_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
    ) -> ClientResult<()> {
        self.check()?;
        let mut state = self.state.lock().await;
        if let Some(tx) = state.transactions.iter_mut().find(|tx| tx.id == id) {
            tx.status = status;
        }
        state.writes.push(RecordedWrite::TransactionStatus {
            id: id.to_string(),
            status,
        });
        Ok(())
    }

    async fn signals(&self) -> ClientResult<Vec<Signal>> {
        self.check()?;
        Ok(self.state.lock().await.signals.clone())
    }

    async fn kyc_requests(&self) -> ClientResult<Vec<KycRequest>> {
        self.check()?;
        Ok(self.state.lock().await.kyc_requests.clone())
    }

    async fn verify_kyc(&self, id: &str, user_id: &str, status: KycStatus) -> ClientResult<()> {
        self.check()?;
        let mut state = self.state.lock().await;
        if let Some(request) = state.kyc_requests.iter_mut().find(|r| r.id == id) {
            request.status = status;
        }
        if status == KycStatus::Approved {
            if let Some(user) = state.users.iter_mut().find(|user| user.id == user_id) {
                user.is_verified = true;
            }
        }
        state.writes.push(RecordedWrite::KycDecision {
            id: id.to_string(),
            user_id: user_id.to_string(),
            status,
        });
        Ok(())
    }

    async fn send_email(&self, message: &EmailMessage) -> ClientResult<DeliveryReport> {
        self.check()?;
        self.state.lock().await.writes.push(RecordedWrite::EmailSent {
            subject: message.subject.clone(),
            recipients: message.recipients.len(),
        });
        info!(recipients = message.recipients.len(), "fixture email delivered");
        Ok(DeliveryReport::for_message(message))
    }
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 30, 0)
        .single()
        .unwrap_or_default()
}

fn sample_admins() -> Vec<Admin> {
    vec![
        Admin {
            id: "admin-1".to_string(),
            firstname: "Grace".to_string(),
            lastname: "Okafor".to_string(),
            email: "grace@punter.io".to_string(),
            password: None,
        },
        Admin {
            id: "admin-2".to_string(),
            firstname: "Tunde".to_string(),
            lastname: "Bello".to_string(),
            email: "tunde@punter.io".to_string(),
            password: None,
        },
    ]
}

fn initial(name: &str) -> String {
    name.chars().take(1).flat_map(char::to_lowercase).collect()
}

fn sample_users() -> Vec<User> {
    let people = [
        ("1", "Alice", "Johnson", Role::User, UserStatus::Active, at(2023, 1, 15)),
        ("2", "Bob", "Smith", Role::Punter, UserStatus::Active, at(2022, 11, 20)),
        ("3", "Charlie", "Brown", Role::User, UserStatus::Inactive, at(2023, 2, 28)),
        ("4", "Diana", "Prince", Role::Punter, UserStatus::Suspended, at(2023, 3, 10)),
        ("5", "Edward", "Lee", Role::User, UserStatus::Active, at(2023, 4, 5)),
        ("6", "Fiona", "Red", Role::Punter, UserStatus::Active, at(2023, 5, 18)),
        ("7", "George", "White", Role::User, UserStatus::Active, at(2023, 6, 22)),
        ("8", "Hannah", "Green", Role::Punter, UserStatus::Inactive, at(2023, 7, 1)),
    ];

    people
        .into_iter()
        .map(|(id, first, last, role, status, created_at)| {
            let handle = format!("{}.{}", first.to_lowercase(), initial(last));
            let pricing_plans = if role == Role::Punter {
                vec![
                    PricingPlan {
                        name: "Silver".to_string(),
                        price: 9.99,
                        features: vec!["Daily signals".to_string()],
                    },
                    PricingPlan {
                        name: "Gold".to_string(),
                        price: 24.99,
                        features: vec!["Daily signals".to_string(), "VIP chat".to_string()],
                    },
                ]
            } else {
                Vec::new()
            };
            User {
                id: id.to_string(),
                firstname: first.to_string(),
                lastname: last.to_string(),
                email: format!("{handle}@example.com"),
                username: handle,
                role,
                status,
                balance: (role == Role::Punter).then_some(150.0),
                is_verified: status == UserStatus::Active,
                bio: (role == Role::Punter).then(|| format!("{first} posts football signals")),
                pricing_plans,
                created_at,
            }
        })
        .collect()
}

fn sample_transactions() -> Vec<Transaction> {
    let tx = |id: &str, amount: f64, kind: TransactionKind, status, created_at, description: &str| {
        Transaction {
            id: id.to_string(),
            amount,
            kind,
            status,
            created_at,
            description: Some(description.to_string()),
            merchant: Some("Punter Platform".to_string()),
            category: None,
            user: Some("1".to_string()),
            details: None,
        }
    };

    let mut withdrawal = tx(
        "tx-4",
        -120.0,
        TransactionKind::Withdrawal,
        TransactionStatus::Pending,
        at(2024, 3, 2),
        "Payout request",
    );
    withdrawal.user = Some("2".to_string());
    withdrawal.details = Some(BankDetails {
        account_name: "Bob Smith".to_string(),
        account_number: "0123456789".to_string(),
        bank_code: "058".to_string(),
    });

    vec![
        tx(
            "tx-1",
            24.99,
            TransactionKind::Subscription,
            TransactionStatus::Completed,
            at(2024, 1, 12),
            "Gold plan: Bob Smith",
        ),
        tx(
            "tx-2",
            9.99,
            TransactionKind::Subscription,
            TransactionStatus::Completed,
            at(2024, 2, 3),
            "Silver plan: Fiona Red",
        ),
        tx(
            "tx-3",
            24.99,
            TransactionKind::Subscription,
            TransactionStatus::Pending,
            at(2024, 2, 20),
            "Gold plan: Diana Prince",
        ),
        withdrawal,
        tx(
            "tx-5",
            -9.99,
            TransactionKind::Subscription,
            TransactionStatus::Failed,
            at(2024, 3, 9),
            "Refund: Silver plan",
        ),
    ]
}

fn sample_signals() -> Vec<Signal> {
    [
        ("sig-1", at(2024, 1, 6), "Arsenal vs Chelsea: over 2.5"),
        ("sig-2", at(2024, 1, 20), "Lakers ML"),
        ("sig-3", at(2024, 2, 11), "Madrid to win"),
        ("sig-4", at(2024, 3, 1), "BTTS in Milan derby"),
        ("sig-5", at(2024, 3, 15), "Djokovic in straight sets"),
    ]
    .into_iter()
    .map(|(id, created_at, title)| Signal {
        id: id.to_string(),
        created_at,
        title: Some(title.to_string()),
    })
    .collect()
}

fn sample_kyc_requests() -> Vec<KycRequest> {
    let request = |id: &str,
                   user_id: &str,
                   name: (&str, &str),
                   status: KycStatus,
                   created_at: DateTime<Utc>,
                   id_type: &str,
                   id_number: &str,
                   notes: &str| KycRequest {
        id: id.to_string(),
        user_id: user_id.to_string(),
        firstname: name.0.to_string(),
        lastname: name.1.to_string(),
        email: format!("{}.{}@example.com", name.0.to_lowercase(), initial(name.1)),
        phone: Some("+1 (555) 123-4567".to_string()),
        address: None,
        id_type: id_type.to_string(),
        id_number: Some(id_number.to_string()),
        id_photos: IdPhotos::default(),
        selfie: String::new(),
        status,
        created_at: Some(created_at),
        notes: Some(notes.to_string()),
    };

    vec![
        request(
            "kyc-1",
            "2",
            ("Michael", "Johnson"),
            KycStatus::Pending,
            at(2023, 10, 15),
            "Driver License",
            "DL123456789",
            "ID expires on 2025-08-15",
        ),
        request(
            "kyc-2",
            "4",
            ("Sarah", "Williams"),
            KycStatus::Pending,
            at(2023, 10, 18),
            "Passport",
            "P87654321",
            "Passport issued in 2020",
        ),
        request(
            "kyc-3",
            "6",
            ("David", "Brown"),
            KycStatus::Approved,
            at(2023, 10, 10),
            "National ID",
            "NID987654321",
            "Verified on 2023-10-12",
        ),
        request(
            "kyc-4",
            "8",
            ("Emma", "Thompson"),
            KycStatus::Rejected,
            at(2023, 10, 5),
            "Driver License",
            "DL456789123",
            "ID image blurry, needs resubmission",
        ),
    ]
}
