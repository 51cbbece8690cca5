//! SELECT statement builder.

use super::clause::{
    aliased, case_expression, if_expression, Condition, Direction, Join, JoinKind, Render,
};
use super::statement::{dispatch, Statement, StatementParts};
use super::subquery::Subquery;
use super::value::SqlValue;
use crate::database::{Database, QueryResult};
use crate::error::Result;

/// A SELECT statement builder.
///
/// Clauses render in a fixed order: columns, FROM, joins, WHERE, GROUP BY,
/// HAVING, ORDER BY, LIMIT, OFFSET.
///
/// # Example
///
/// ```rust
/// use sqlflow_core::builder::{col, Direction, SelectBuilder, Statement};
///
/// let select = SelectBuilder::new()
///     .columns(&["u.id", "u.name"])
///     .from("users u")
///     .left_join("orders o", "o.user_id = u.id")
///     .where_clause(col("u.active").eq(true))
///     .order_by(&["u.name"], Direction::Asc);
///
/// assert_eq!(
///     select.build()?,
///     "SELECT u.id, u.name FROM users u LEFT JOIN orders o ON o.user_id = u.id \
///      WHERE u.active = ? ORDER BY u.name ASC"
/// );
/// # Ok::<(), sqlflow_core::SqlFlowError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectBuilder {
    parts: StatementParts,
    distinct: bool,
    columns: Vec<String>,
    joins: Vec<Join>,
    group_by: Vec<String>,
    having: Option<Condition>,
    order_by: Vec<String>,
    direction: Direction,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectBuilder {
    /// Creates an empty SELECT builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the selected columns, replacing any previous list.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Selects all columns (`*`).
    #[must_use]
    pub fn all(self) -> Self {
        self.columns(&["*"])
    }

    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Sets the table to select from.
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

    fn join(mut self, kind: JoinKind, table: &str, on: &str) -> Self {
        self.joins.push(Join {
            kind,
            table: String::from(table),
            condition: String::from(on),
        });
        self
    }

    /// Adds an INNER JOIN.
    #[must_use]
    pub fn inner_join(self, table: &str, on: &str) -> Self {
        self.join(JoinKind::Inner, table, on)
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(self, table: &str, on: &str) -> Self {
        self.join(JoinKind::Left, table, on)
    }

    /// Adds a RIGHT JOIN.
    #[must_use]
    pub fn right_join(self, table: &str, on: &str) -> Self {
        self.join(JoinKind::Right, table, on)
    }

    /// Sets the GROUP BY columns, replacing any previous list.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.group_by = cols.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Sets the HAVING condition, replacing any previous one.
    ///
    /// Rendered whenever set, with or without GROUP BY.
    #[must_use]
    pub fn having(mut self, condition: impl Into<Condition>) -> Self {
        self.having = Some(condition.into());
        self
    }

    /// Sets the ORDER BY columns and direction, replacing any previous
    /// ordering.
    #[must_use]
    pub fn order_by(mut self, cols: &[&str], direction: Direction) -> Self {
        self.order_by = cols.iter().map(|c| String::from(*c)).collect();
        self.direction = direction;
        self
    }

    /// Adds a LIMIT clause.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Adds an OFFSET clause.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Appends a subquery to the select list: `(<query>) [AS alias]`.
    #[must_use]
    pub fn subquery(mut self, query: &str, alias: Option<&str>) -> Self {
        self.parts.push_embedded(query, alias);
        self
    }

    /// Appends `EXISTS (<query>)` to the WHERE conditions.
    #[must_use]
    pub fn exists(self, query: &str) -> Self {
        self.where_clause(format!("EXISTS ({query})"))
    }

    /// Appends `(<query>) [AS alias]` to the WHERE conditions.
    #[must_use]
    pub fn where_subquery(self, query: &str, alias: Option<&str>) -> Self {
        self.where_clause(aliased(query, alias))
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

    /// Replaces the select list with `CASE WHEN ... END AS <column>`.
    ///
    /// Any columns selected before are discarded. The expression is always
    /// aliased as `column`, so the result set exposes it under that name;
    /// callers matching older output that rendered a bare `CASE ... END`
    /// will see the extra ` AS <column>`.
    #[must_use]
    pub fn case(mut self, column: &str, whens: &[(&str, &str)], default: Option<&str>) -> Self {
        let case = case_expression(whens, default);
        self.columns = vec![format!("{case} AS {column}")];
        self
    }

    /// Appends `IF (<condition>) THEN <then> [ELSE <otherwise>]` to the
    /// WHERE conditions.
    #[must_use]
    pub fn if_then(self, condition: &str, then: &str, otherwise: Option<&str>) -> Self {
        self.where_clause(if_expression(condition, then, otherwise))
    }

    fn render(&self, mode: Render) -> Result<String> {
        let table = self.parts.table()?;
        let mut sql = String::from("SELECT ");

        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        let mut select_list = self.columns.clone();
        select_list.extend(self.parts.embedded.iter().map(ToString::to_string));
        if select_list.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&select_list.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(table);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_string());
        }

        if let Some(conditions) = self.parts.where_sql(mode) {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if let Some(having) = &self.having {
            sql.push_str(" HAVING ");
            sql.push_str(having.render(mode));
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
            sql.push(' ');
            sql.push_str(self.direction.as_sql());
        }

        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        if let Some(n) = self.offset {
            sql.push_str(&format!(" OFFSET {n}"));
        }

        Ok(sql)
    }
}

impl Statement for SelectBuilder {
    type Output = QueryResult;

    fn build(&self) -> Result<String> {
        self.render(Render::Parameterized)
    }

    fn params(&self) -> Vec<SqlValue> {
        let having = self.having.iter().flat_map(Condition::params);
        self.parts.condition_params().chain(having).cloned().collect()
    }

    fn preview(&self) -> Result<String> {
        self.render(Render::Inline)
    }

    fn execute(&self, db: &dyn Database) -> Result<QueryResult> {
        dispatch(self, db)
    }
}
