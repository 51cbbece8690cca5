//! The execution collaborator consumed by the statement builders.
//!
//! Builders never own a connection. `execute()` takes any [`Database`]
//! and forwards the rendered SQL and its parameters to it.

use crate::builder::SqlValue;
use crate::error::Result;

/// Best-effort message sink.
///
/// Implementations must not panic or propagate failures: a logging problem
/// never aborts the statement that triggered it.
pub trait Logger {
    /// Records one message.
    fn log(&self, message: &str);
}

/// Something that can run SQL.
///
/// Retry, timeouts and transaction handling are the implementation's
/// business; builders pass results and errors through unchanged.
pub trait Database {
    /// Runs `sql` with positional `params`.
    ///
    /// # Errors
    ///
    /// `QueryExecution` when the statement cannot be run.
    fn execute_query(&self, sql: &str, params: &[SqlValue]) -> Result<QueryResult>;

    /// Returns the logger statements report to after running.
    fn logger(&self) -> &dyn Logger;
}

/// Driver-level outcome of one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Column names of the returned rows.
    pub columns: Vec<String>,
    /// Returned rows, one value per column.
    pub rows: Vec<Vec<SqlValue>>,
    /// Rows changed by the statement, when the driver reports it.
    pub rows_affected: Option<u64>,
    /// Row id of the last inserted row, when the driver reports it.
    pub last_insert_id: Option<i64>,
}

impl QueryResult {
    /// A result carrying only an affected-row count.
    #[must_use]
    pub fn affected(rows: u64) -> Self {
        Self {
            rows_affected: Some(rows),
            ..Self::default()
        }
    }

    /// A result carrying returned rows.
    #[must_use]
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// Looks up a value by row index and column name.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_column_name() {
        let result = QueryResult::with_rows(
            vec![String::from("id"), String::from("name")],
            vec![vec![SqlValue::Int(1), SqlValue::Text(String::from("Ann"))]],
        );
        assert_eq!(
            result.get(0, "name"),
            Some(&SqlValue::Text(String::from("Ann")))
        );
        assert_eq!(result.get(0, "missing"), None);
        assert_eq!(result.get(3, "id"), None);
        assert_eq!(result.rows_affected, None);
    }

    #[test]
    fn test_affected() {
        let result = QueryResult::affected(4);
        assert_eq!(result.rows_affected, Some(4));
        assert!(result.rows.is_empty());
    }
}
