//! # sqlflow-sqlite
//!
//! SQLite execution collaborator for `sqlflow-core` statements.
//!
//! [`SqliteDatabase`] implements [`sqlflow_core::Database`] over an `sqlx`
//! connection pool. Parameters are bound positionally, result rows come
//! back as untyped [`SqlValue`](sqlflow_core::SqlValue)s, and lock
//! contention is retried with a jittered backoff.
//!
//! ```rust
//! use sqlflow_core::builder::{col, RawStatement, Statement, UpdateBuilder};
//! use sqlflow_sqlite::{SqliteConfig, SqliteDatabase};
//!
//! let db = SqliteDatabase::connect(&SqliteConfig::in_memory())?;
//! RawStatement::new("CREATE TABLE users (id INTEGER PRIMARY KEY, active INTEGER)")
//!     .execute(&db)?;
//! RawStatement::new("INSERT INTO users (active) VALUES (1), (1), (0)").execute(&db)?;
//!
//! let changed = UpdateBuilder::new()
//!     .table("users")
//!     .assign("active", 0)
//!     .where_clause(col("active").eq(1))
//!     .execute(&db)?;
//! assert_eq!(changed, 2);
//! # Ok::<(), sqlflow_sqlite::Error>(())
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod retry;

pub use config::{SqliteConfig, DATABASE_URL_ENV, DEFAULT_DATABASE_URL};
pub use database::SqliteDatabase;
pub use error::{Error, Result};
pub use retry::RetryPolicy;
