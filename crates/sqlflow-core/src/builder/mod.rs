//! Fluent SQL statement builders.
//!
//! Every builder accumulates clause fragments through chained calls and
//! renders them on demand. Values given through [`col`] expressions or
//! `set()` calls are always bound as `?` parameters.
//!
//! # Example
//!
//! ```rust
//! use sqlflow_core::builder::{col, SelectBuilder, Statement};
//!
//! let select = SelectBuilder::new()
//!     .columns(&["id", "name"])
//!     .from("users")
//!     .where_clause(col("active").eq(true))
//!     .where_clause("deleted_at IS NULL");
//!
//! assert_eq!(
//!     select.build()?,
//!     "SELECT id, name FROM users WHERE active = ? AND deleted_at IS NULL"
//! );
//! # Ok::<(), sqlflow_core::SqlFlowError>(())
//! ```

mod clause;
mod delete;
mod expr;
mod insert;
mod select;
mod statement;
mod subquery;
mod trigger;
mod update;
pub mod value;

pub use clause::{Condition, Direction, EmbeddedSubquery, Join, JoinKind};
pub use delete::DeleteBuilder;
pub use expr::{col, Column, ExprBuilder};
pub use insert::{InsertBuilder, InsertValue};
pub use select::SelectBuilder;
pub use statement::{RawStatement, Statement};
pub use subquery::Subquery;
pub use trigger::{Trigger, TriggerEvent, TriggerTiming};
pub use update::UpdateBuilder;
pub use value::{SqlValue, ToSqlValue};
