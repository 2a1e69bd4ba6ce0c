//! Configuration management for the admin console

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Base name of the optional configuration file in the working directory
pub const CONFIG_FILE: &str = "punter-admin";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "PUNTER";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Where records come from
    #[serde(default)]
    pub source: SourceConfig,

    /// Session configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Path of the user status endpoint, when the backend provides one
    #[serde(default)]
    pub user_status_endpoint: Option<String>,
}

/// Data source selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// `http` for the live backend, `fixture` for built-in sample data
    #[serde(default)]
    pub kind: SourceKind,
}

/// Kind of data source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Live REST backend
    #[default]
    Http,
    /// In-memory sample records
    Fixture,
}

/// Session configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Refuse backend commands when no session token is stored
    #[serde(default)]
    pub require_session: bool,

    /// Session file override; defaults to the platform config directory
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ClientError::configuration(format!(
                "unknown log format `{other}` (expected pretty or json)"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            user_status_endpoint: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Logging settings given on the command line; each one replaces the value
/// from the configuration sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingOverrides {
    /// Log level
    pub level: Option<String>,
    /// Log format
    pub format: Option<LogFormat>,
}

impl LoggingOverrides {
    fn apply(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.level {
            logging.level.clone_from(level);
        }
        if let Some(format) = self.format {
            logging.format = format;
        }
    }
}

impl ApiConfig {
    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from `punter-admin.toml`, an optional explicit
    /// file, then `PUNTER_*` environment variables, later sources winning.
    ///
    /// Nested keys use a double underscore, e.g. `PUNTER_API__BASE_URL`.
    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        Self::load_with_overrides(path, &LoggingOverrides::default())
    }

    /// Load like [`Config::load`], apply command line logging overrides, then
    /// validate the result once.
    pub fn load_with_overrides(
        path: Option<&Path>,
        overrides: &LoggingOverrides,
    ) -> ClientResult<Self> {
        let mut config = Self::read_sources(path)?;
        overrides.apply(&mut config.logging);
        config.validate()?;
        Ok(config)
    }

    fn read_sources(path: Option<&Path>) -> ClientResult<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Check values the type system cannot
    pub fn validate(&self) -> ClientResult<()> {
        let base = Url::parse(&self.api.base_url).map_err(|e| {
            ClientError::configuration(format!("api.base_url `{}`: {e}", self.api.base_url))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::configuration(format!(
                "api.base_url must be http or https, got `{}`",
                base.scheme()
            )));
        }

        if let Some(endpoint) = &self.api.user_status_endpoint {
            if !endpoint.starts_with('/') {
                return Err(ClientError::configuration(format!(
                    "api.user_status_endpoint must start with `/`, got `{endpoint}`"
                )));
            }
        }

        if self.api.request_timeout_secs == Some(0) {
            return Err(ClientError::configuration(
                "api.request_timeout_secs must be positive",
            ));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ClientError::configuration(format!(
                "unknown logging.level `{}` (expected one of: {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Where the session token is stored
    pub fn session_path(&self) -> ClientResult<PathBuf> {
        if let Some(path) = &self.auth.session_file {
            return Ok(path.clone());
        }
        directories::ProjectDirs::from("io", "punter", "punter-admin")
            .map(|dirs| dirs.config_dir().join("session.json"))
            .ok_or_else(|| ClientError::configuration("no home directory to store the session in"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.request_timeout(), None);
        assert_eq!(config.source.kind, SourceKind::Http);
        assert!(!config.auth.require_session);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        config.validate().unwrap();
    }

    #[test]
    fn test_load_explicit_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "https://api.punter.io"
request_timeout_secs = 15
user_status_endpoint = "/admin/updateUserStatus"

[source]
kind = "fixture"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "https://api.punter.io");
        assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(
            config.api.user_status_endpoint.as_deref(),
            Some("/admin/updateUserStatus")
        );
        assert_eq!(config.source.kind, SourceKind::Fixture);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_command_line_level_replaces_bad_file_level() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nlevel = \"loud\"").unwrap();

        assert!(Config::load(Some(file.path())).is_err());

        let overrides = LoggingOverrides {
            level: Some("debug".to_string()),
            format: Some(LogFormat::Json),
        };
        let config = Config::load_with_overrides(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ClientError::Configuration { .. })
        ));
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://files.punter.io")]
    fn test_rejects_bad_base_url(#[case] base_url: &str) {
        let mut config = Config::default();
        config.api.base_url = base_url.to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_relative_status_endpoint() {
        let mut config = Config::default();
        config.api.user_status_endpoint = Some("admin/status".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case("Pretty", LogFormat::Pretty)]
    #[case("text", LogFormat::Pretty)]
    fn test_log_format_parse(#[case] input: &str, #[case] expected: LogFormat) {
        assert_eq!(input.parse::<LogFormat>().unwrap(), expected);
    }

    #[test]
    fn test_session_file_override() {
        let mut config = Config::default();
        config.auth.session_file = Some(PathBuf::from("/tmp/punter-session.json"));
        assert_eq!(
            config.session_path().unwrap(),
            PathBuf::from("/tmp/punter-session.json")
        );
    }
}
