//! SQLite implementation of the [`Database`] collaborator.
//!
//! Statement builders are synchronous, so the connection pool is driven by a
//! private current-thread tokio runtime owned by [`SqliteDatabase`].

use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use sqlflow_core::{
    Database, FileLogger, Logger, QueryResult, SqlFlowError, SqlValue, TracingLogger,
};
use sqlx::pool::PoolConnection;
use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column, Executor, Row, Sqlite, TypeInfo, ValueRef};
use tokio::runtime::Runtime;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::config::SqliteConfig;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// A pooled SQLite connection implementing [`Database`].
///
/// # Example
///
/// ```rust
/// use sqlflow_core::builder::{InsertBuilder, RawStatement, SelectBuilder, Statement};
/// use sqlflow_sqlite::{SqliteConfig, SqliteDatabase};
///
/// let db = SqliteDatabase::connect(&SqliteConfig::in_memory())?;
/// RawStatement::new("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").execute(&db)?;
///
/// InsertBuilder::new()
///     .into_table("users")?
///     .set(&["name"], vec!["Alice"])?
///     .execute(&db)?;
///
/// let rows = SelectBuilder::new().columns(&["name"]).from("users").execute(&db)?;
/// assert_eq!(rows.rows.len(), 1);
/// # Ok::<(), sqlflow_sqlite::Error>(())
/// ```
pub struct SqliteDatabase {
    pool: SqlitePool,
    runtime: Runtime,
    logger: Box<dyn Logger>,
    retry: RetryPolicy,
    /// Connection holding the open transaction, if any.
    pinned: AsyncMutex<Option<PoolConnection<Sqlite>>>,
    last_error: Mutex<Option<String>>,
}

impl SqliteDatabase {
    /// Opens a pool for `config`.
    ///
    /// Statements are logged to `config.log_file` when set, otherwise
    /// through `tracing`. The connection outcome is logged either way.
    ///
    /// # Errors
    ///
    /// `Core` if the log file cannot be opened, `Io` if the runtime cannot
    /// start, `Database` if the connection fails.
    pub fn connect(config: &SqliteConfig) -> Result<Self> {
        let logger: Box<dyn Logger> = match &config.log_file {
            Some(path) => Box::new(FileLogger::open(path)?),
            None => Box::new(TracingLogger),
        };
        Self::connect_with_logger(config, logger)
    }

    /// Opens a pool for `config`, reporting to `logger`.
    ///
    /// In-memory databases keep one connection open for the pool's whole
    /// lifetime, since closing it would discard the data.
    ///
    /// # Errors
    ///
    /// `Io` if the runtime cannot start, `Database` if the connection fails.
    pub fn connect_with_logger(config: &SqliteConfig, logger: Box<dyn Logger>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let mut pool_options =
            SqlitePoolOptions::new().max_connections(config.max_connections.max(1));
        if config.is_in_memory() {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let connected = SqliteConnectOptions::from_str(&config.url).and_then(|options| {
            runtime.block_on(pool_options.connect_with(options.create_if_missing(true)))
        });

        match connected {
            Ok(pool) => {
                info!(url = %config.url, "Connected to database");
                logger.log(&format!(
                    "Successfully connected to the database {}",
                    config.url
                ));
                Ok(Self {
                    pool,
                    runtime,
                    logger,
                    retry: config.retry,
                    pinned: AsyncMutex::new(None),
                    last_error: Mutex::new(None),
                })
            }
            Err(err) => {
                warn!(url = %config.url, error = %err, "Connection failed");
                logger.log(&format!("Connection error: {err}"));
                Err(err.into())
            }
        }
    }

    /// Replaces the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Box::new(logger);
        self
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Returns whether the pool still accepts statements.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.pool.is_closed()
    }

    /// Returns the message of the last failed operation.
    ///
    /// Reset by every statement and transaction call; `None` means the
    /// latest one succeeded.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error_slot().clone()
    }

    /// Returns whether a transaction is open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.runtime.block_on(self.pinned.lock()).is_some()
    }

    /// Starts a transaction. Until [`commit`](Self::commit) or
    /// [`rollback`](Self::rollback), every statement runs on the same
    /// connection.
    ///
    /// # Errors
    ///
    /// `TransactionActive` if one is already open, `Database` if BEGIN fails.
    pub fn begin(&self) -> Result<()> {
        let outcome = self.runtime.block_on(async {
            let mut pinned = self.pinned.lock().await;
            if pinned.is_some() {
                return Err(Error::TransactionActive);
            }
            let mut conn = self.pool.acquire().await?;
            sqlx::query("BEGIN").execute(&mut *conn).await?;
            *pinned = Some(conn);
            Ok::<(), Error>(())
        });
        debug!(ok = outcome.is_ok(), "BEGIN");
        self.record(outcome)
    }

    /// Commits the open transaction.
    ///
    /// # Errors
    ///
    /// `NoTransaction` if none is open, `Database` if COMMIT fails. The
    /// transaction stays open after a failed COMMIT so it can be rolled back.
    pub fn commit(&self) -> Result<()> {
        self.finish("COMMIT")
    }

    /// Discards the open transaction.
    ///
    /// # Errors
    ///
    /// `NoTransaction` if none is open, `Database` if ROLLBACK fails.
    pub fn rollback(&self) -> Result<()> {
        self.finish("ROLLBACK")
    }

    fn finish(&self, statement: &'static str) -> Result<()> {
        let outcome = self.runtime.block_on(async {
            let mut pinned = self.pinned.lock().await;
            let Some(conn) = pinned.as_mut() else {
                return Err(Error::NoTransaction);
            };
            sqlx::query(statement).execute(&mut **conn).await?;
            *pinned = None;
            Ok::<(), Error>(())
        });
        debug!(ok = outcome.is_ok(), "{statement}");
        self.record(outcome)
    }

    /// Closes every pooled connection, rolling back an open transaction.
    /// Later statements fail.
    pub fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        self.runtime.block_on(self.shutdown());
        debug!("Database connection closed");
        self.logger.log("Database connection closed");
    }

    async fn shutdown(&self) {
        if let Some(mut conn) = self.pinned.lock().await.take() {
            if let Err(err) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                warn!(error = %err, "Failed to roll back open transaction");
            }
        }
        self.pool.close().await;
    }

    async fn run(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> std::result::Result<QueryResult, sqlx::Error> {
        let mut pinned = self.pinned.lock().await;
        match pinned.as_mut() {
            Some(conn) => run_on(&mut **conn, sql, params).await,
            None => run_on(&self.pool, sql, params).await,
        }
    }

    fn last_error_slot(&self) -> MutexGuard<'_, Option<String>> {
        self.last_error
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record<T>(&self, outcome: Result<T>) -> Result<T> {
        *self.last_error_slot() = outcome.as_ref().err().map(ToString::to_string);
        outcome
    }
}

impl Database for SqliteDatabase {
    fn execute_query(&self, sql: &str, params: &[SqlValue]) -> sqlflow_core::Result<QueryResult> {
        let mut attempt = 1;
        loop {
            match self.runtime.block_on(self.run(sql, params)) {
                Ok(result) => {
                    *self.last_error_slot() = None;
                    return Ok(result);
                }
                Err(err) if self.retry.allows_retry(attempt) && RetryPolicy::is_retryable(&err) => {
                    let pause = self.retry.backoff();
                    warn!(attempt, pause = ?pause, error = %err, "Database locked, retrying");
                    self.runtime.block_on(tokio::time::sleep(pause));
                    attempt += 1;
                }
                Err(err) => {
                    self.logger.log(&format!("Error executing the query: {err}"));
                    *self.last_error_slot() = Some(err.to_string());
                    return Err(SqlFlowError::query_execution_from(err.to_string(), err));
                }
            }
        }
    }

    fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }
}

impl Drop for SqliteDatabase {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            self.runtime.block_on(self.shutdown());
        }
    }
}

impl std::fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDatabase")
            .field("pool", &self.pool)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Runs one statement on `executor`, fetching rows when it returns any.
async fn run_on<'c, E>(
    executor: E,
    sql: &str,
    params: &[SqlValue],
) -> std::result::Result<QueryResult, sqlx::Error>
where
    E: Executor<'c, Database = Sqlite>,
{
    let query = params
        .iter()
        .fold(sqlx::query(sql), |query, value| bind_param(query, value));

    if returns_rows(sql) {
        let rows = query.fetch_all(executor).await?;
        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let values = rows
            .iter()
            .map(decode_row)
            .collect::<std::result::Result<_, _>>()?;
        Ok(QueryResult::with_rows(columns, values))
    } else {
        let done = query.execute(executor).await?;
        Ok(QueryResult {
            rows_affected: Some(done.rows_affected()),
            last_insert_id: Some(done.last_insert_rowid()),
            ..QueryResult::default()
        })
    }
}

/// Binds a SqlValue parameter to a query.
fn bind_param<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value.clone() {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}

/// Returns whether `sql` produces a result set.
fn returns_rows(sql: &str) -> bool {
    let keyword = sql
        .trim_start_matches(|c: char| c == '(' || c.is_whitespace())
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();
    matches!(
        keyword.as_str(),
        "SELECT" | "WITH" | "PRAGMA" | "VALUES" | "EXPLAIN"
    ) || sql.to_ascii_uppercase().contains(" RETURNING ")
}

fn decode_row(row: &SqliteRow) -> std::result::Result<Vec<SqlValue>, sqlx::Error> {
    (0..row.len()).map(|idx| decode_value(row, idx)).collect()
}

/// Decodes one cell by its storage class.
fn decode_value(row: &SqliteRow, idx: usize) -> std::result::Result<SqlValue, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }
    let storage = raw.type_info().name().to_ascii_uppercase();
    match storage.as_str() {
        "INTEGER" => row.try_get::<i64, _>(idx).map(SqlValue::Int),
        "REAL" => row.try_get::<f64, _>(idx).map(SqlValue::Float),
        "BLOB" => row.try_get::<Vec<u8>, _>(idx).map(SqlValue::Blob),
        _ => row.try_get::<String, _>(idx).map(SqlValue::Text),
    }
}
