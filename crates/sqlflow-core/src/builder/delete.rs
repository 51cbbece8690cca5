//! DELETE statement builder.

use super::clause::{case_expression, if_expression, Condition, Render};
use super::statement::{dispatch, Statement, StatementParts};
use super::subquery::Subquery;
use super::value::SqlValue;
use crate::database::{Database, QueryResult};
use crate::error::Result;

/// A DELETE statement builder.
///
/// **Warning**: without any WHERE condition the statement deletes every row.
///
/// # Example
///
/// ```rust
/// use sqlflow_core::builder::{DeleteBuilder, Statement};
///
/// let delete = DeleteBuilder::new()
///     .from("users")
///     .where_clause("email = 'a@b.com'");
///
/// assert_eq!(delete.build()?, "DELETE FROM users WHERE email = 'a@b.com'");
/// # Ok::<(), sqlflow_core::SqlFlowError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteBuilder {
    parts: StatementParts,
}

impl DeleteBuilder {
    /// Creates an empty DELETE builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table to delete from.
    #[must_use]
    pub fn from(mut self, table: &str) -> Self {
        self.parts.table = String::from(table);
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

    /// Appends `(<query>) [AS alias]` to the USING list.
    #[must_use]
    pub fn using(mut self, query: &str, alias: Option<&str>) -> Self {
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

    /// Appends `<column> = CASE WHEN ... END` to the WHERE conditions.
    #[must_use]
    pub fn case(self, column: &str, whens: &[(&str, &str)], default: Option<&str>) -> Self {
        let case = case_expression(whens, default);
        self.where_clause(format!("{column} = {case}"))
    }

    /// Appends `IF (<condition>) THEN <then> [ELSE <otherwise>]` to the
    /// WHERE conditions.
    #[must_use]
    pub fn if_then(self, condition: &str, then: &str, otherwise: Option<&str>) -> Self {
        self.where_clause(if_expression(condition, then, otherwise))
    }

    fn render(&self, mode: Render) -> Result<String> {
        let mut sql = format!("DELETE FROM {}", self.parts.table()?);

        if let Some(using) = self.parts.embedded_list() {
            sql.push_str(" USING ");
            sql.push_str(&using);
        }

        if let Some(conditions) = self.parts.where_sql(mode) {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions);
        }

        Ok(sql)
    }
}

impl Statement for DeleteBuilder {
    type Output = QueryResult;

    fn build(&self) -> Result<String> {
        self.render(Render::Parameterized)
    }

    fn params(&self) -> Vec<SqlValue> {
        self.parts.condition_params().cloned().collect()
    }

    fn preview(&self) -> Result<String> {
        self.render(Render::Inline)
    }

    fn execute(&self, db: &dyn Database) -> Result<QueryResult> {
        dispatch(self, db)
    }
}
