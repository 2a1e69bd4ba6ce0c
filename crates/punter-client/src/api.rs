//! HTTP client for the punter platform admin API

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::source::{DataSource, StatusPersistence};
use async_trait::async_trait;
use punter_protocol::{DeliveryReport, EmailMessage};
use punter_types::{
    Admin, KycRequest, KycStatus, ListEnvelope, NewAdmin, Signal, Transaction, TransactionStatus,
    User, UserStatus,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

/// Admin API endpoint paths
pub mod endpoints {
    /// Login
    pub const LOGIN: &str = "/client/login";
    /// Admin list
    pub const ADMINS: &str = "/admin/getAdmins";
    /// Admin creation
    pub const SIGNUP: &str = "/admin/Signup";
    /// Admin deletion
    pub const DELETE_ADMIN: &str = "/admin/deleteAdmin";
    /// User list
    pub const USERS: &str = "/admin/getUsers";
    /// Transaction list
    pub const TRANSACTIONS: &str = "/admin/getTransactions";
    /// Transaction status update
    pub const TRANSACTION_STATUS: &str = "/admin/transactionStatus";
    /// Signal list
    pub const SIGNALS: &str = "/admin/getSignals";
    /// KYC request list
    pub const IDENTIFICATIONS: &str = "/admin/getIdentifications";
    /// KYC decision
    pub const VERIFY: &str = "/admin/verifyAction";
}

#[derive(serde::Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum SignupResponse {
    Wrapped { data: Admin },
    Bare(Admin),
}

/// API client for the admin REST backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    user_status_endpoint: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url` with default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            user_status_endpoint: None,
        }
    }

    /// Create a client from configuration
    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("punter-admin/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
            user_status_endpoint: config.user_status_endpoint.clone(),
        })
    }

    /// Send `token` as a bearer credential on every request
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Use `path` to persist user status changes
    #[must_use]
    pub fn with_user_status_endpoint(mut self, path: impl Into<String>) -> Self {
        self.user_status_endpoint = Some(path.into());
        self
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> ClientResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, %status, "backend rejected request");
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }
        Ok(response)
    }

    async fn get_list<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<Vec<T>> {
        let response = self.send(endpoint, self.client.get(self.url(endpoint))).await?;
        let body = response.bytes().await.map_err(|source| ClientError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let envelope: ListEnvelope<T> =
            serde_json::from_slice(&body).map_err(|e| ClientError::decode(endpoint, e))?;
        debug!(endpoint, count = envelope.data.len(), "fetched list");
        Ok(envelope.into_inner())
    }

    async fn post<B: Serialize + Sync>(&self, endpoint: &str, body: &B) -> ClientResult<Response> {
        self.send(endpoint, self.client.post(self.url(endpoint)).json(body))
            .await
    }
}

#[async_trait]
impl DataSource for ApiClient {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        let response = self
            .post(
                endpoints::LOGIN,
                &json!({ "email": email, "password": password }),
            )
            .await?;
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| ClientError::decode(endpoints::LOGIN, e))?;
        info!("login accepted");
        Ok(body.token)
    }

    async fn admins(&self) -> ClientResult<Vec<Admin>> {
        self.get_list(endpoints::ADMINS).await
    }

    #[instrument(skip(self, admin), fields(email = %admin.email))]
    async fn create_admin(&self, admin: &NewAdmin) -> ClientResult<Option<Admin>> {
        let response = self.post(endpoints::SIGNUP, admin).await?;
        let body = response.bytes().await.map_err(|source| ClientError::Transport {
            endpoint: endpoints::SIGNUP.to_string(),
            source,
        })?;
        match serde_json::from_slice::<SignupResponse>(&body) {
            Ok(SignupResponse::Wrapped { data } | SignupResponse::Bare(data)) => Ok(Some(data)),
            Err(e) => {
                debug!(error = %e, "signup response does not describe the admin");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_admin(&self, id: &str) -> ClientResult<()> {
        self.post(endpoints::DELETE_ADMIN, &json!({ "id": id }))
            .await
            .map(drop)
    }

    async fn users(&self) -> ClientResult<Vec<User>> {
        self.get_list(endpoints::USERS).await
    }

    #[instrument(skip(self))]
    async fn update_user_status(
        &self,
        id: &str,
        status: UserStatus,
    ) -> ClientResult<StatusPersistence> {
        let Some(endpoint) = self.user_status_endpoint.as_deref() else {
            warn!("no user status endpoint configured; change is local only");
            return Ok(StatusPersistence::LocalOnly);
        };
        self.post(endpoint, &json!({ "id": id, "status": status }))
            .await?;
        Ok(StatusPersistence::Remote)
    }

    async fn transactions(&self) -> ClientResult<Vec<Transaction>> {
        self.get_list(endpoints::TRANSACTIONS).await
    }

    #[instrument(skip(self))]
    async fn set_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
    ) -> ClientResult<()> {
        self.post(
            endpoints::TRANSACTION_STATUS,
            &json!({ "id": id, "status": status }),
        )
        .await
        .map(drop)
    }

    async fn signals(&self) -> ClientResult<Vec<Signal>> {
        self.get_list(endpoints::SIGNALS).await
    }

    async fn kyc_requests(&self) -> ClientResult<Vec<KycRequest>> {
        self.get_list(endpoints::IDENTIFICATIONS).await
    }

    #[instrument(skip(self))]
    async fn verify_kyc(&self, id: &str, user_id: &str, status: KycStatus) -> ClientResult<()> {
        self.post(
            endpoints::VERIFY,
            &json!({ "id": id, "userId": user_id, "status": status }),
        )
        .await
        .map(drop)
    }

    async fn send_email(&self, message: &EmailMessage) -> ClientResult<DeliveryReport> {
        // The backend has no mail endpoint; delivery is simulated.
        info!(
            selection = %message.selection,
            recipients = message.recipients.len(),
            subject = %message.subject,
            "email queued"
        );
        Ok(DeliveryReport::for_message(message))
    }
}
