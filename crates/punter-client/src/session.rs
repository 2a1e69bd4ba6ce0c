//! File-backed session token store
//!
//! The token lives in a small JSON object under the single key `token`, so the
//! file stays readable and other keys can be added without breaking old ones.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Persistent store for the opaque auth token
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by `path`; nothing is touched until the first call
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored token, if any
    pub async fn load(&self) -> ClientResult<Option<String>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClientError::session(&self.path, &e)),
        };
        let file: SessionFile = serde_json::from_slice(&raw).map_err(|e| ClientError::Session {
            path: self.path.clone(),
            message: format!("corrupt session file: {e}"),
        })?;
        Ok(file.token.filter(|token| !token.is_empty()))
    }

    /// Persist `token`, replacing any earlier one
    pub async fn save(&self, token: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ClientError::session(parent, &e))?;
        }
        let file = SessionFile {
            token: Some(token.to_string()),
        };
        let raw = serde_json::to_vec_pretty(&file).map_err(|e| ClientError::Session {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| ClientError::session(&self.path, &e))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Forget the token; clearing an empty store is not an error
    pub async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::session(&self.path, &e)),
        }
    }
}
