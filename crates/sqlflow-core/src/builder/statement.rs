//! The contract shared by every statement builder.

use tracing::debug;

use super::clause::{Condition, EmbeddedSubquery, Render};
use super::subquery::Subquery;
use super::value::SqlValue;
use crate::database::{Database, QueryResult};
use crate::error::{Result, SqlFlowError};

/// A renderable, executable SQL statement.
///
/// Rendering is a pure read of the accumulated state: `build()` can be
/// called any number of times and returns the same text. Builders are not
/// meant to be shared between threads while being mutated; each statement
/// has one owner.
pub trait Statement {
    /// What [`Statement::execute`] returns.
    type Output;

    /// Renders the statement with `?` placeholders.
    ///
    /// # Errors
    ///
    /// `EmptyTableName` if no table was set. Nothing else: every other
    /// invalid state is rejected by the mutator that introduced it.
    fn build(&self) -> Result<String>;

    /// Returns the bound parameters in placeholder order.
    fn params(&self) -> Vec<SqlValue>;

    /// Renders the statement with parameters inlined as escaped literals.
    ///
    /// **Warning**: for logs and debugging only. Never execute the result.
    ///
    /// # Errors
    ///
    /// Same as [`Statement::build`].
    fn preview(&self) -> Result<String>;

    /// Same as [`Statement::build`].
    ///
    /// # Errors
    ///
    /// Same as [`Statement::build`].
    fn query(&self) -> Result<String> {
        self.build()
    }

    /// Runs the statement against `db`.
    ///
    /// # Errors
    ///
    /// Build errors, or whatever the collaborator reports.
    fn execute(&self, db: &dyn Database) -> Result<Self::Output>;
}

/// Renders `statement`, runs it and logs it. Collaborator errors pass
/// through untouched.
pub(crate) fn dispatch<S: Statement + ?Sized>(
    statement: &S,
    db: &dyn Database,
) -> Result<QueryResult> {
    let sql = statement.query()?;
    let params = statement.params();
    debug!(sql = %sql, params = params.len(), "Executing statement");
    let result = db.execute_query(&sql, &params)?;
    db.logger().log(&format!("Execution of query: {sql}"));
    Ok(result)
}

/// State common to all four statement kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StatementParts {
    pub(crate) table: String,
    pub(crate) conditions: Vec<Condition>,
    pub(crate) exists: Option<Subquery>,
    pub(crate) embedded: Vec<EmbeddedSubquery>,
}

impl StatementParts {
    pub(crate) fn table(&self) -> Result<&str> {
        if self.table.is_empty() {
            Err(SqlFlowError::EmptyTableName)
        } else {
            Ok(&self.table)
        }
    }

    pub(crate) fn push_condition(&mut self, condition: impl Into<Condition>) {
        self.conditions.push(condition.into());
    }

    pub(crate) fn push_embedded(&mut self, query: &str, alias: Option<&str>) {
        self.embedded.push(EmbeddedSubquery {
            query: String::from(query),
            alias: alias.map(String::from),
        });
    }

    pub(crate) fn embedded_list(&self) -> Option<String> {
        if self.embedded.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.embedded.iter().map(ToString::to_string).collect();
        Some(parts.join(", "))
    }

    /// Conditions followed by the nested EXISTS subquery, all AND-joined
    /// under a single WHERE.
    pub(crate) fn where_sql(&self, mode: Render) -> Option<String> {
        let mut parts: Vec<String> = self
            .conditions
            .iter()
            .map(|c| String::from(c.render(mode)))
            .collect();
        if let Some(sq) = &self.exists {
            parts.push(format!("EXISTS ({})", sq.build()));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" AND "))
        }
    }

    pub(crate) fn condition_params(&self) -> impl Iterator<Item = &SqlValue> {
        self.conditions.iter().flat_map(Condition::params)
    }
}

/// A hand-written SQL string with bound parameters.
///
/// **Warning**: the text is executed verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatement {
    sql: String,
    params: Vec<SqlValue>,
}

impl RawStatement {
    /// Creates a raw statement.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: vec![],
        }
    }

    /// Binds the next positional parameter.
    #[must_use]
    pub fn bind<T: super::ToSqlValue>(mut self, value: T) -> Self {
        self.params.push(value.to_sql_value());
        self
    }
}

impl Statement for RawStatement {
    type Output = QueryResult;

    fn build(&self) -> Result<String> {
        Ok(self.sql.clone())
    }

    fn params(&self) -> Vec<SqlValue> {
        self.params.clone()
    }

    /// Substitutes each `?` outside of quoted literals, in order.
    fn preview(&self) -> Result<String> {
        let mut out = String::with_capacity(self.sql.len());
        let mut params = self.params.iter();
        let mut quoted = false;
        for ch in self.sql.chars() {
            match ch {
                '\'' => {
                    quoted = !quoted;
                    out.push(ch);
                }
                '?' if !quoted => match params.next() {
                    Some(value) => out.push_str(&value.to_sql_inline()),
                    None => out.push(ch),
                },
                _ => out.push(ch),
            }
        }
        Ok(out)
    }

    fn execute(&self, db: &dyn Database) -> Result<QueryResult> {
        dispatch(self, db)
    }
}
