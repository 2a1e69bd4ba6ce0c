//! Application context passed to every workflow
//!
//! Holds the resolved configuration, the selected data source and the
//! session store, so no workflow reaches for global state.

use crate::api::ApiClient;
use crate::config::{Config, SourceKind};
use crate::error::{ClientError, ClientResult};
use crate::fixtures::FixtureDataSource;
use crate::session::SessionStore;
use crate::source::DataSource;
use std::sync::Arc;
use tracing::{debug, info};

/// Configuration, data source and session shared by all commands
#[derive(Debug, Clone)]
pub struct AppContext {
    config: Config,
    source: Arc<dyn DataSource>,
    session: SessionStore,
    token: Option<String>,
}

impl AppContext {
    /// Build the context described by `config`.
    ///
    /// A stored session token, when present, is attached to the HTTP client.
    pub async fn from_config(config: Config) -> ClientResult<Self> {
        let session = SessionStore::new(config.session_path()?);
        let token = session.load().await?;

        let source: Arc<dyn DataSource> = match config.source.kind {
            SourceKind::Http => {
                let mut client = ApiClient::from_config(&config.api)?;
                if let Some(token) = &token {
                    client = client.with_token(token.clone());
                }
                Arc::new(client)
            }
            SourceKind::Fixture => Arc::new(FixtureDataSource::new()),
        };

        info!(
            source = source.name(),
            authenticated = token.is_some(),
            "context ready"
        );

        Ok(Self {
            config,
            source,
            session,
            token,
        })
    }

    /// Context over an explicit data source, for tests and embedding
    pub fn with_source(config: Config, source: Arc<dyn DataSource>, session: SessionStore) -> Self {
        Self {
            config,
            source,
            session,
            token: None,
        }
    }

    /// Resolved configuration
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Selected data source
    pub fn source(&self) -> Arc<dyn DataSource> {
        Arc::clone(&self.source)
    }

    /// Session store
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Whether a session token was found at startup
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Enforce the login gate when `auth.require_session` is set
    pub fn require_session(&self) -> ClientResult<()> {
        if self.config.auth.require_session && self.token.is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        Ok(())
    }

    /// Log in and persist the returned token
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<()> {
        let token = self.source.login(email, password).await?;
        self.session.save(&token).await?;
        debug!(path = %self.session.path().display(), "token stored");
        self.token = Some(token);
        Ok(())
    }

    /// Forget the stored token
    pub async fn logout(&mut self) -> ClientResult<()> {
        self.session.clear().await?;
        self.token = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture_config(dir: &tempfile::TempDir, require_session: bool) -> Config {
        let mut config = Config::default();
        config.source.kind = SourceKind::Fixture;
        config.auth.require_session = require_session;
        config.auth.session_file = Some(dir.path().join("session.json"));
        config
    }

    #[tokio::test]
    async fn test_login_gate() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = AppContext::from_config(fixture_config(&dir, true))
            .await
            .unwrap();
        assert!(matches!(
            ctx.require_session(),
            Err(ClientError::NotAuthenticated)
        ));

        ctx.login("grace@punter.io", "secret").await.unwrap();
        ctx.require_session().unwrap();
        assert_eq!(
            ctx.session().load().await.unwrap().as_deref(),
            Some("fixture-token-grace@punter.io")
        );

        let reloaded = AppContext::from_config(fixture_config(&dir, true))
            .await
            .unwrap();
        assert!(reloaded.is_authenticated());

        ctx.logout().await.unwrap();
        assert!(ctx.require_session().is_err());
    }

    #[tokio::test]
    async fn test_gate_disabled_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::from_config(fixture_config(&dir, false))
            .await
            .unwrap();
        assert!(!ctx.is_authenticated());
        ctx.require_session().unwrap();
        assert_eq!(ctx.source().name(), "fixture");
    }
}
