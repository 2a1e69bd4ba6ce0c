//! Integration tests for the HTTP data source against a mock backend

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use pretty_assertions::assert_eq;
use punter_client::api::endpoints;
use punter_client::{
    AccountDesk, ApiClient, ClientError, DataSource, GENERIC_FAILURE, KycDesk, StatusPersistence,
    StatusUpdate, UserDesk,
};
use punter_protocol::{AdminDraft, Decision};
use punter_types::{KycStatus, TransactionStatus, UserStatus};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json(id: &str, role: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "firstname": "Alice",
        "lastname": "Johnson",
        "email": format!("{id}@example.com"),
        "username": format!("user{id}"),
        "role": role,
        "status": status,
        "createdAt": "2024-01-15T09:30:00Z"
    })
}

fn kyc_json(id: &str, user_id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "userId": user_id,
        "firstname": "Michael",
        "lastname": "Johnson",
        "idType": "Passport",
        "status": status,
        "createdAt": "2023-10-15T09:30:00Z"
    })
}

async fn mount_list(server: &MockServer, endpoint: &str, data: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

/// List endpoints decode the `data` envelope and carry the bearer token
#[tokio::test]
async fn test_lists_decode_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::USERS))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [user_json("1", "user", "active"), user_json("2", "punter", "suspended")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(format!("{}/", server.uri())).with_token("abc123");
    let users = client.users().await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[1].status, UserStatus::Suspended);
}

/// A non-2xx answer becomes a status error with the generic operator message
#[tokio::test]
async fn test_server_error_is_reported_generically() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::TRANSACTIONS))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = ApiClient::new(server.uri())
        .transactions()
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Status { ref endpoint, .. } if endpoint == endpoints::TRANSACTIONS));
    assert_eq!(err.user_message(), GENERIC_FAILURE);
}

/// A body without the `data` field is a decode error
#[tokio::test]
async fn test_missing_envelope_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::SIGNALS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let err = ApiClient::new(server.uri()).signals().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
}

/// Transaction decisions post `{id, status}`
#[tokio::test]
async fn test_transaction_status_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::TRANSACTION_STATUS))
        .and(body_json(json!({ "id": "tx-3", "status": "completed" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    ApiClient::new(server.uri())
        .set_transaction_status("tx-3", TransactionStatus::Completed)
        .await
        .unwrap();
}

/// KYC decisions go through the desk and post `{id, userId, status}`
#[tokio::test]
async fn test_kyc_desk_posts_verification() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        endpoints::IDENTIFICATIONS,
        json!([kyc_json("kyc-1", "u-9", "pending"), kyc_json("kyc-2", "u-3", "approved")]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(endpoints::VERIFY))
        .and(body_json(json!({ "id": "kyc-1", "userId": "u-9", "status": "rejected" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let source: Arc<dyn DataSource> = Arc::new(ApiClient::new(server.uri()));
    let mut desk = KycDesk::load(source).await.unwrap();
    let decided = desk.decide("kyc-1", Decision::Reject).await.unwrap();

    assert_eq!(decided.status, KycStatus::Rejected);
    assert_eq!(desk.board().count(KycStatus::Pending), 0);
}

/// A rejected KYC decision leaves the loaded list unchanged
#[tokio::test]
async fn test_kyc_failure_keeps_pending() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        endpoints::IDENTIFICATIONS,
        json!([kyc_json("kyc-1", "u-9", "pending")]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(endpoints::VERIFY))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source: Arc<dyn DataSource> = Arc::new(ApiClient::new(server.uri()));
    let mut desk = KycDesk::load(source).await.unwrap();
    let err = desk.decide("kyc-1", Decision::Approve).await.unwrap_err();

    assert!(err.is_backend());
    assert_eq!(desk.board().get("kyc-1").unwrap().status, KycStatus::Pending);
}

/// Login posts credentials and returns the token
#[tokio::test]
async fn test_login_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::LOGIN))
        .and(body_json(json!({ "email": "grace@punter.io", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "jwt.token" })))
        .mount(&server)
        .await;

    let token = ApiClient::new(server.uri())
        .login("grace@punter.io", "pw")
        .await
        .unwrap();
    assert_eq!(token, "jwt.token");
}

fn jane_draft() -> AdminDraft {
    let mut rng = StdRng::seed_from_u64(3);
    let mut draft = AdminDraft::new();
    draft.set_first_name("Jane", &mut rng);
    draft.set_last_name("Doe", &mut rng);
    draft.set_email("jane@punter.io");
    draft
}

/// Signup answers that wrap the admin in `data` are used directly
#[tokio::test]
async fn test_signup_with_echoed_admin() {
    let server = MockServer::start().await;
    mount_list(&server, endpoints::ADMINS, json!([])).await;
    Mock::given(method("POST"))
        .and(path(endpoints::SIGNUP))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "_id": "a-7",
                "firstname": "Jane",
                "lastname": "Doe",
                "email": "jane@punter.io"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source: Arc<dyn DataSource> = Arc::new(ApiClient::new(server.uri()));
    let mut desk = AccountDesk::load(source).await.unwrap();
    let admin = desk.create(&jane_draft()).await.unwrap();

    assert_eq!(admin.id, "a-7");
    assert_eq!(desk.roster().admins().len(), 1);
}

/// Signup answers without a usable body fall back to re-fetching the list
#[tokio::test]
async fn test_signup_without_body_refetches_admins() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::SIGNUP))
        .respond_with(ResponseTemplate::new(200).set_body_string("created"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(endpoints::ADMINS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "_id": "a-8",
                "firstname": "Jane",
                "lastname": "Doe",
                "email": "jane@punter.io"
            }]
        })))
        .mount(&server)
        .await;

    let source: Arc<dyn DataSource> = Arc::new(ApiClient::new(server.uri()));
    let mut desk = AccountDesk::load(source).await.unwrap();
    let admin = desk.create(&jane_draft()).await.unwrap();

    assert_eq!(admin.id, "a-8");
}

/// Without a configured endpoint user status changes stay local
#[tokio::test]
async fn test_user_status_local_only_without_endpoint() {
    let server = MockServer::start().await;
    mount_list(&server, endpoints::USERS, json!([user_json("1", "user", "active")])).await;

    let source: Arc<dyn DataSource> = Arc::new(ApiClient::new(server.uri()));
    let mut desk = UserDesk::load(source).await.unwrap();
    let update = desk.set_status("1", UserStatus::Suspended).await.unwrap();

    assert_eq!(update, StatusUpdate::Applied(StatusPersistence::LocalOnly));
    assert_eq!(
        desk.directory().get("1").unwrap().status,
        UserStatus::Suspended
    );
}

/// A configured endpoint receives `{id, status}`
#[tokio::test]
async fn test_user_status_posts_to_configured_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/updateUserStatus"))
        .and(body_json(json!({ "id": "1", "status": "inactive" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).with_user_status_endpoint("/admin/updateUserStatus");
    let persistence = client
        .update_user_status("1", UserStatus::Inactive)
        .await
        .unwrap();
    assert_eq!(persistence, StatusPersistence::Remote);
}

/// Connection failures are transport errors
#[tokio::test]
async fn test_unreachable_backend() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let err = ApiClient::new(uri).admins().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }));
    assert_eq!(err.user_message(), GENERIC_FAILURE);
}
