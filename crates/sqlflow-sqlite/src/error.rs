//! Error types for the SQLite collaborator.

use sqlflow_core::SqlFlowError;

/// Errors that can occur while setting up or talking to SQLite.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error while connecting or closing.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// `begin` was called while a transaction is open.
    #[error("A transaction is already active")]
    TransactionActive,

    /// `commit` or `rollback` was called without an open transaction.
    #[error("No active transaction")]
    NoTransaction,

    /// IO error (runtime startup, reading a config file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Error raised by the statement layer (e.g. opening the log file).
    #[error(transparent)]
    Core(#[from] SqlFlowError),
}

/// Result type for SQLite collaborator operations.
pub type Result<T> = std::result::Result<T, Error>;
