//! End-to-end command tests against the fixture data source

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use clap::Parser;
use pretty_assertions::assert_eq;
use punter_client::{
    AppContext, ClientError, Config, DataSource, FixtureDataSource, RecordedWrite, SessionStore,
};
use punter_console::{Answer, Cli, Renderer, execute};
use punter_protocol::ProtocolError;
use punter_types::{TransactionStatus, UserStatus};
use std::sync::Arc;
use tempfile::TempDir;

struct Harness {
    ctx: AppContext,
    fixture: FixtureDataSource,
    _dir: TempDir,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let fixture = FixtureDataSource::new();
        let source: Arc<dyn DataSource> = Arc::new(fixture.clone());
        let session = SessionStore::new(dir.path().join("session.json"));
        Self {
            ctx: AppContext::with_source(config, source, session),
            fixture,
            _dir: dir,
        }
    }

    async fn run(&mut self, args: &[&str]) -> anyhow::Result<String> {
        self.run_answering(args, false).await
    }

    async fn run_answering(&mut self, args: &[&str], answer: bool) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("punter-admin").chain(args.iter().copied()))
            .unwrap();
        let mut renderer = Renderer::new(Vec::new(), cli.format);
        execute(&mut self.ctx, cli.command, &mut renderer, &mut Answer(answer)).await?;
        Ok(String::from_utf8(renderer.into_inner()).unwrap())
    }
}

#[tokio::test]
async fn test_dashboard_prints_three_cards() {
    let mut harness = Harness::new();
    let out = harness.run(&["dashboard", "--calendar-order"]).await.unwrap();

    assert!(out.contains("Total Users: 8"));
    assert!(out.contains("Total Revenue: $"));
    assert!(out.contains("Total Signals: 5"));
    let jan = out.find("  Jan").unwrap();
    let nov = out.find("  Nov").unwrap();
    assert!(jan < nov);
}

#[tokio::test]
async fn test_dashboard_json() {
    let mut harness = Harness::new();
    let out = harness.run(&["dashboard", "--format", "json"]).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(value["users"]["total"], 8.0);
    assert_eq!(value["signals"]["total"], 5.0);
}

#[tokio::test]
async fn test_users_list_filters_and_searches() {
    let mut harness = Harness::new();
    let out = harness
        .run(&["users", "list", "--role", "punter", "--format", "json"])
        .await
        .unwrap();
    let users: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
    assert_eq!(users.len(), 4);
    assert!(users.iter().all(|user| user["role"] == "punter"));

    let out = harness
        .run(&["users", "list", "--search", "HANNAH"])
        .await
        .unwrap();
    assert!(out.contains("Hannah Green"));
    assert!(!out.contains("Alice Johnson"));
}

#[tokio::test]
async fn test_user_status_change() {
    let mut harness = Harness::new();
    let out = harness
        .run(&["users", "status", "3", "active"])
        .await
        .unwrap();
    assert_eq!(out, "User 3 is now active\n");

    let out = harness
        .run(&["users", "status", "3", "active"])
        .await
        .unwrap();
    assert_eq!(out, "User 3 is already active\n");

    assert_eq!(
        harness.fixture.writes().await,
        vec![RecordedWrite::UserStatus {
            id: "3".to_string(),
            status: UserStatus::Active,
        }]
    );
}

#[tokio::test]
async fn test_transaction_approve_and_redecide() {
    let mut harness = Harness::new();
    let out = harness
        .run(&["transactions", "approve", "tx-3"])
        .await
        .unwrap();
    assert_eq!(out, "Transaction tx-3 approved; status is now completed\n");

    let err = harness
        .run(&["transactions", "reject", "tx-3"])
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ClientError>(),
        Some(ClientError::Protocol(ProtocolError::NotPending { .. }))
    ));
    assert_eq!(
        harness.fixture.writes().await,
        vec![RecordedWrite::TransactionStatus {
            id: "tx-3".to_string(),
            status: TransactionStatus::Completed,
        }]
    );
}

#[tokio::test]
async fn test_transactions_list_pending_only() {
    let mut harness = Harness::new();
    let out = harness
        .run(&["transactions", "list", "--status", "pending"])
        .await
        .unwrap();

    assert!(out.contains("tx-3"));
    assert!(out.contains("tx-4"));
    assert!(!out.contains("tx-1"));
    // newest first
    assert!(out.find("tx-4").unwrap() < out.find("tx-3").unwrap());
}

#[tokio::test]
async fn test_kyc_show_and_approve() {
    let mut harness = Harness::new();
    let out = harness.run(&["kyc", "show", "kyc-2"]).await.unwrap();
    assert!(out.contains("Sarah Williams"));
    assert!(out.contains("Passport"));

    let out = harness.run(&["kyc", "approve", "kyc-2"]).await.unwrap();
    assert_eq!(out, "KYC request kyc-2 from Sarah Williams approved\n");
}

#[tokio::test]
async fn test_unknown_record_is_not_found() {
    let mut harness = Harness::new();
    let err = harness.run(&["kyc", "show", "kyc-99"]).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ProtocolError>(),
        Some(ProtocolError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_admin_create_generates_password() {
    let mut harness = Harness::new();
    let out = harness
        .run(&[
            "admins",
            "create",
            "--first-name",
            "Jane",
            "--last-name",
            "Doe",
            "--email",
            "jane@punter.io",
            "--format",
            "json",
        ])
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(value["admin"]["email"], "jane@punter.io");
    let password = value["password"].as_str().unwrap();
    assert!(password.starts_with("Jd"));
    assert_eq!(password.len(), 6);
}

#[tokio::test]
async fn test_admin_create_rejects_bad_email() {
    let mut harness = Harness::new();
    let err = harness
        .run(&[
            "admins",
            "create",
            "--first-name",
            "Jane",
            "--last-name",
            "Doe",
            "--email",
            "not-an-email",
        ])
        .await
        .unwrap_err();

    assert!(err.to_string().contains("email"));
    assert!(harness.fixture.writes().await.is_empty());
}

#[tokio::test]
async fn test_admin_delete_requires_confirmation() {
    let mut harness = Harness::new();

    let err = harness
        .run_answering(&["admins", "delete", "admin-2"], false)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ClientError>(),
        Some(ClientError::Protocol(ProtocolError::Unconfirmed { .. }))
    ));

    let out = harness
        .run_answering(&["admins", "delete", "admin-2"], true)
        .await
        .unwrap();
    assert_eq!(out, "Deleted admin tunde@punter.io\n");

    let out = harness.run(&["admins", "list"]).await.unwrap();
    assert!(!out.contains("admin-2"));
}

#[tokio::test]
async fn test_email_send_to_one_punter() {
    let mut harness = Harness::new();
    let out = harness
        .run(&[
            "email", "send", "--to", "punter", "--id", "4", "--subject", "Hi", "--body", "Hello",
        ])
        .await
        .unwrap();
    assert_eq!(
        out,
        "Sent \"Hi\" to Specific Punter (4) (1 recipients)\n"
    );

    let err = harness
        .run(&[
            "email", "send", "--to", "punter", "--id", "1", "--subject", "Hi", "--body", "Hello",
        ])
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ClientError>(),
        Some(ClientError::Protocol(ProtocolError::InvalidRecipient { .. }))
    ));
}

#[tokio::test]
async fn test_login_gate_and_session() {
    let mut config = Config::default();
    config.auth.require_session = true;
    let mut harness = Harness::with_config(config);

    let err = harness.run(&["users", "list"]).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ClientError>(),
        Some(ClientError::NotAuthenticated)
    ));

    let out = harness
        .run(&["login", "--email", "grace@punter.io", "--password", "pw"])
        .await
        .unwrap();
    assert_eq!(out, "Logged in as grace@punter.io\n");
    harness.run(&["users", "list"]).await.unwrap();

    harness.run(&["logout"]).await.unwrap();
    assert!(harness.run(&["users", "list"]).await.is_err());
}

#[tokio::test]
async fn test_config_show_is_toml() {
    let mut harness = Harness::new();
    let out = harness.run(&["config", "show"]).await.unwrap();
    let value: toml::Value = toml::from_str(&out).unwrap();
    assert_eq!(value["api"]["base_url"].as_str(), Some("http://localhost:5000"));
}
