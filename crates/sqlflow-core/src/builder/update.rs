//! UPDATE statement builder.

use super::clause::{Condition, Render};
use super::statement::{dispatch, Statement, StatementParts};
use super::subquery::Subquery;
use super::value::{SqlValue, ToSqlValue};
use crate::database::Database;
use crate::error::{Result, SqlFlowError};

/// An assignment in the SET clause.
#[derive(Debug, Clone, PartialEq)]
struct Assignment {
    column: String,
    value: SqlValue,
}

/// An UPDATE statement builder.
///
/// Assignments render in insertion order. [`Statement::build`] always binds
/// them as `?`; [`Statement::preview`] shows the literals for logging.
/// Rendering fails with `EmptyAssignments` until at least one column is set.
///
/// # Example
///
/// ```rust
/// use sqlflow_core::builder::{col, SqlValue, Statement, UpdateBuilder};
///
/// let update = UpdateBuilder::new()
///     .table("users")
///     .set(vec![("name", SqlValue::Text("Bob".into())), ("age", SqlValue::Int(31))])
///     .where_clause(col("id").eq(7));
///
/// assert_eq!(update.build()?, "UPDATE users SET name = ?, age = ? WHERE id = ?");
/// assert_eq!(update.preview()?, "UPDATE users SET name = 'Bob', age = 31 WHERE id = 7");
/// # Ok::<(), sqlflow_core::SqlFlowError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBuilder {
    parts: StatementParts,
    assignments: Vec<Assignment>,
}

impl UpdateBuilder {
    /// Creates an empty UPDATE builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table to update.
    #[must_use]
    pub fn table(mut self, table: &str) -> Self {
        self.parts.table = String::from(table);
        self
    }

    /// Replaces all assignments with `pairs`, in order.
    ///
    /// A column listed twice keeps its first position and its last value.
    #[must_use]
    pub fn set<T: ToSqlValue>(mut self, pairs: Vec<(&str, T)>) -> Self {
        self.assignments.clear();
        for (column, value) in pairs {
            self = self.assign(column, value);
        }
        self
    }

    /// Adds one assignment, or overwrites the value of an existing one.
    #[must_use]
    pub fn assign<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        let value = value.to_sql_value();
        match self.assignments.iter_mut().find(|a| a.column == column) {
            Some(existing) => existing.value = value,
            None => self.assignments.push(Assignment {
                column: String::from(column),
                value,
            }),
        }
        self
    }

    /// Appends an AND-joined WHERE condition.
    ///
    /// Raw strings are emitted verbatim; prefer [`col`](super::col)
    /// expressions for anything carrying user input.
    #[must_use]
    pub fn where_clause(mut self, condition: impl Into<Condition>) -> Self {
        self.parts.push_condition(condition);
        self
    }

    /// Appends `EXISTS (<query>)` to the WHERE conditions.
    #[must_use]
    pub fn exists(self, query: &str) -> Self {
        self.where_clause(format!("EXISTS ({query})"))
    }

    /// Appends `(<query>) [AS alias]` to the FROM list.
    #[must_use]
    pub fn subquery(mut self, query: &str, alias: Option<&str>) -> Self {
        self.parts.push_embedded(query, alias);
        self
    }

    /// Attaches a nested subquery, rendered as an AND-joined
    /// `EXISTS (<subquery>)` after the other WHERE conditions.
    #[must_use]
    pub fn exists_subquery(mut self, subquery: Subquery) -> Self {
        self.parts.exists = Some(subquery);
        self
    }

    /// Returns the nested EXISTS subquery, if any.
    #[must_use]
    pub const fn nested_subquery(&self) -> Option<&Subquery> {
        self.parts.exists.as_ref()
    }

    fn render(&self, mode: Render) -> Result<String> {
        let table = self.parts.table()?;
        if self.assignments.is_empty() {
            return Err(SqlFlowError::EmptyAssignments);
        }
        let set_parts: Vec<String> = self
            .assignments
            .iter()
            .map(|a| format!("{} = {}", a.column, mode.value(&a.value)))
            .collect();
        let mut sql = format!("UPDATE {table} SET {}", set_parts.join(", "));

        if let Some(from) = self.parts.embedded_list() {
            sql.push_str(" FROM ");
            sql.push_str(&from);
        }

        if let Some(conditions) = self.parts.where_sql(mode) {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions);
        }

        Ok(sql)
    }
}

impl Statement for UpdateBuilder {
    /// Number of rows changed.
    type Output = u64;

    fn build(&self) -> Result<String> {
        self.render(Render::Parameterized)
    }

    fn params(&self) -> Vec<SqlValue> {
        self.assignments
            .iter()
            .map(|a| &a.value)
            .chain(self.parts.condition_params())
            .cloned()
            .collect()
    }

    fn preview(&self) -> Result<String> {
        self.render(Render::Inline)
    }

    fn execute(&self, db: &dyn Database) -> Result<u64> {
        let result = dispatch(self, db)?;
        result.rows_affected.ok_or_else(|| {
            SqlFlowError::query_execution(format!(
                "UPDATE on {} returned no affected-row count",
                self.parts.table
            ))
        })
    }
}
