//! Error types for statement building and execution.

use thiserror::Error;

/// Errors raised while building or executing a statement.
///
/// Validation errors are raised by the mutating call that introduced the
/// invalid state; `build()` only reports a missing table. Execution errors
/// come from the [`Database`](crate::Database) collaborator and are passed
/// through unchanged.
#[derive(Debug, Error)]
pub enum SqlFlowError {
    /// The statement has no target table.
    #[error("table name cannot be empty")]
    EmptyTableName,

    /// An UPDATE has no SET assignments.
    #[error("update requires at least one assignment")]
    EmptyAssignments,

    /// INSERT columns and values have different lengths.
    #[error("columns and values count must match ({columns} columns, {values} values)")]
    ColumnValueMismatch {
        /// Number of columns given.
        columns: usize,
        /// Number of values given.
        values: usize,
    },

    /// An empty condition was added to a subquery.
    #[error("invalid condition provided: condition text cannot be empty")]
    InvalidCondition,

    /// A subquery was given an empty query text.
    #[error("subquery text cannot be empty")]
    EmptySubquery,

    /// A subquery would contain itself.
    #[error("subquery cannot be nested into itself")]
    CyclicSubquery,

    /// A sort direction other than ASC or DESC.
    #[error("invalid sort direction: {0}")]
    InvalidDirection(String),

    /// The collaborator failed to run the statement.
    #[error("query execution failed: {message}")]
    QueryExecution {
        /// Human readable failure description.
        message: String,
        /// Underlying driver error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO error (opening or writing a log file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlFlowError {
    /// Creates a `QueryExecution` error without an underlying cause.
    #[must_use]
    pub fn query_execution(message: impl Into<String>) -> Self {
        Self::QueryExecution {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `QueryExecution` error wrapping a driver error.
    #[must_use]
    pub fn query_execution_from<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::QueryExecution {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` if the statement was rejected before reaching the
    /// database.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyTableName
                | Self::EmptyAssignments
                | Self::ColumnValueMismatch { .. }
                | Self::InvalidCondition
                | Self::EmptySubquery
                | Self::CyclicSubquery
                | Self::InvalidDirection(_)
        )
    }
}

/// Result type alias for sqlflow operations.
pub type Result<T> = std::result::Result<T, SqlFlowError>;
