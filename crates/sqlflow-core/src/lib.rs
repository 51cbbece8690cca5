//! # sqlflow-core
//!
//! Fluent builders for SELECT, INSERT, UPDATE and DELETE statements.
//!
//! This crate provides:
//! - Chainable builders that accumulate clauses and render deterministic SQL
//! - Structured predicates whose values are bound as `?` parameters
//! - Nested subqueries with cycle detection
//! - A [`Database`] collaborator trait that builders execute against
//!
//! ## Building
//!
//! ```rust
//! use sqlflow_core::builder::{InsertBuilder, Statement};
//!
//! let insert = InsertBuilder::new()
//!     .into_table("users")?
//!     .set(&["name", "email"], vec!["Alice", "alice@example.com"])?;
//!
//! assert_eq!(insert.build()?, "INSERT INTO users (name, email) VALUES (?, ?)");
//! # Ok::<(), sqlflow_core::SqlFlowError>(())
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Raw string conditions are emitted verbatim. Values that come from users
//! belong in [`col`] expressions, which render placeholders:
//!
//! ```rust
//! use sqlflow_core::builder::{col, DeleteBuilder, Statement};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let delete = DeleteBuilder::new()
//!     .from("users")
//!     .where_clause(col("name").eq(user_input));
//!
//! assert_eq!(delete.build()?, "DELETE FROM users WHERE name = ?");
//! assert_eq!(delete.params().len(), 1);
//! # Ok::<(), sqlflow_core::SqlFlowError>(())
//! ```

pub mod builder;
pub mod database;
pub mod error;
pub mod logger;

pub use builder::{
    col, DeleteBuilder, InsertBuilder, SelectBuilder, SqlValue, Statement, Subquery,
    UpdateBuilder,
};
pub use database::{Database, Logger, QueryResult};
pub use error::{Result, SqlFlowError};
pub use logger::{FileLogger, TracingLogger};
