//! Connection settings.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::retry::RetryPolicy;

/// Database URL used when none is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:db.sqlite3";

/// Environment variable holding the database URL.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Settings for [`SqliteDatabase::connect`](crate::SqliteDatabase::connect).
///
/// Every field is optional when deserializing:
///
/// ```rust
/// use sqlflow_sqlite::SqliteConfig;
///
/// let config = SqliteConfig::from_json_str(r#"{ "url": "sqlite::memory:", "retry": { "max_attempts": 5 } }"#)?;
/// assert_eq!(config.url, "sqlite::memory:");
/// assert_eq!(config.retry.max_attempts, 5);
/// assert_eq!(config.retry.max_backoff_ms, 50);
/// # Ok::<(), sqlflow_sqlite::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// SQLite connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// Retry behaviour on lock contention.
    pub retry: RetryPolicy,
    /// Append executed statements and errors to this file instead of
    /// emitting them through `tracing`.
    pub log_file: Option<PathBuf>,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_DATABASE_URL),
            max_connections: 5,
            retry: RetryPolicy::default(),
            log_file: None,
        }
    }
}

impl SqliteConfig {
    /// Creates a config for `url` with default settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// A private in-memory database on a single connection.
    ///
    /// The connection is pinned open for the pool's lifetime; see
    /// [`SqliteConfig::is_in_memory`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: String::from("sqlite::memory:"),
            max_connections: 1,
            ..Self::default()
        }
    }

    /// Returns whether the URL names an in-memory database, whose contents
    /// live only as long as its connection.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// Reads the URL from `DATABASE_URL`, falling back to
    /// [`DEFAULT_DATABASE_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_url_or_default(std::env::var(DATABASE_URL_ENV).ok())
    }

    fn with_url_or_default(url: Option<String>) -> Self {
        match url {
            Some(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// `Config` if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Config` if it is malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Sets the log file.
    #[must_use]
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
