//! INSERT statement builder.

use super::clause::{aliased, case_expression, if_expression, Condition, Render};
use super::statement::{dispatch, Statement, StatementParts};
use super::subquery::Subquery;
use super::value::{SqlValue, ToSqlValue};
use crate::database::{Database, QueryResult};
use crate::error::{Result, SqlFlowError};

/// One entry of the VALUES list.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertValue {
    /// A bound parameter, rendered as `?`.
    Param(SqlValue),
    /// A SQL expression rendered verbatim (e.g. from [`InsertBuilder::case`]).
    Expr(String),
}

impl InsertValue {
    fn render(&self, mode: Render) -> String {
        match self {
            Self::Param(value) => mode.value(value),
            Self::Expr(sql) => sql.clone(),
        }
    }
}

/// An INSERT statement builder.
///
/// Columns and values are set together and must have the same length.
///
/// # Example
///
/// ```rust
/// use sqlflow_core::builder::{InsertBuilder, Statement};
///
/// let insert = InsertBuilder::new()
///     .into_table("users")?
///     .set(&["name", "email"], vec!["Alice", "alice@example.com"])?;
///
/// assert_eq!(insert.build()?, "INSERT INTO users (name, email) VALUES (?, ?)");
/// assert_eq!(insert.params().len(), 2);
/// # Ok::<(), sqlflow_core::SqlFlowError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertBuilder {
    parts: StatementParts,
    columns: Vec<String>,
    values: Vec<InsertValue>,
}

impl InsertBuilder {
    /// Creates an empty INSERT builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table to insert into.
    ///
    /// # Errors
    ///
    /// `EmptyTableName` if `table` is empty.
    pub fn into_table(mut self, table: &str) -> Result<Self> {
        if table.is_empty() {
            return Err(SqlFlowError::EmptyTableName);
        }
        self.parts.table = String::from(table);
        Ok(self)
    }

    /// Sets the columns and their positionally paired values, replacing any
    /// previous ones.
    ///
    /// # Errors
    ///
    /// `ColumnValueMismatch` if the lengths differ. The builder is consumed
    /// either way.
    pub fn set<T: ToSqlValue>(mut self, columns: &[&str], values: Vec<T>) -> Result<Self> {
        if columns.len() != values.len() {
            return Err(SqlFlowError::ColumnValueMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }
        self.columns = columns.iter().map(|c| String::from(*c)).collect();
        self.values = values
            .into_iter()
            .map(|v| InsertValue::Param(v.to_sql_value()))
            .collect();
        Ok(self)
    }

    /// Uses `CASE WHEN ... END` as the value of `column`.
    ///
    /// Replaces the value if `column` is already listed, otherwise appends
    /// the column. The expression is emitted inline, not bound.
    #[must_use]
    pub fn case(mut self, column: &str, whens: &[(&str, &str)], default: Option<&str>) -> Self {
        let value = InsertValue::Expr(case_expression(whens, default));
        match self.columns.iter().position(|c| c == column) {
            Some(idx) => self.values[idx] = value,
            None => {
                self.columns.push(String::from(column));
                self.values.push(value);
            }
        }
        self
    }

    /// Appends `(<query>) [AS alias]` to the column list.
    #[must_use]
    pub fn subquery(mut self, query: &str, alias: Option<&str>) -> Self {
        self.parts.push_embedded(query, alias);
        self
    }

    /// Appends an AND-joined trailing WHERE condition.
    ///
    /// Kept for compatibility; most dialects reject WHERE on INSERT.
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

    /// Appends `EXISTS (<query>) AS <alias>` to the WHERE conditions.
    #[must_use]
    pub fn exists_with_alias(self, query: &str, alias: &str) -> Self {
        self.where_clause(format!("EXISTS ({query}) AS {alias}"))
    }

    /// Appends `(<query>) [AS alias]` to the WHERE conditions.
    #[must_use]
    pub fn where_subquery(self, query: &str, alias: Option<&str>) -> Self {
        self.where_clause(aliased(query, alias))
    }

    /// Appends `IF (<condition>) THEN <then> [ELSE <otherwise>]` to the
    /// WHERE conditions.
    #[must_use]
    pub fn if_then(self, condition: &str, then: &str, otherwise: Option<&str>) -> Self {
        self.where_clause(if_expression(condition, then, otherwise))
    }

    /// Appends ` SELECT <subquery>` after the VALUES list.
    #[must_use]
    pub fn select_from(mut self, subquery: Subquery) -> Self {
        self.parts.exists = Some(subquery);
        self
    }

    /// Returns the nested SELECT subquery, if any.
    #[must_use]
    pub const fn nested_subquery(&self) -> Option<&Subquery> {
        self.parts.exists.as_ref()
    }

    fn render(&self, mode: Render) -> Result<String> {
        let table = self.parts.table()?;

        let mut columns = self.columns.join(", ");
        if let Some(embedded) = self.parts.embedded_list() {
            if !columns.is_empty() {
                columns.push_str(", ");
            }
            columns.push_str(&embedded);
        }

        let values: Vec<String> = self.values.iter().map(|v| v.render(mode)).collect();
        let mut sql = format!(
            "INSERT INTO {table} ({columns}) VALUES ({})",
            values.join(", ")
        );

        if !self.parts.conditions.is_empty() {
            let conditions: Vec<&str> = self
                .parts
                .conditions
                .iter()
                .map(|c| c.render(mode))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        if let Some(subquery) = &self.parts.exists {
            sql.push_str(" SELECT ");
            sql.push_str(&subquery.build());
        }

        Ok(sql)
    }
}

impl Statement for InsertBuilder {
    type Output = QueryResult;

    fn build(&self) -> Result<String> {
        self.render(Render::Parameterized)
    }

    fn params(&self) -> Vec<SqlValue> {
        let bound = self.values.iter().filter_map(|v| match v {
            InsertValue::Param(value) => Some(value),
            InsertValue::Expr(_) => None,
        });
        bound.chain(self.parts.condition_params()).cloned().collect()
    }

    fn preview(&self) -> Result<String> {
        self.render(Render::Inline)
    }

    fn execute(&self, db: &dyn Database) -> Result<QueryResult> {
        dispatch(self, db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_rejected_at_call() {
        assert!(matches!(
            InsertBuilder::new().into_table(""),
            Err(SqlFlowError::EmptyTableName)
        ));
    }

    #[test]
    fn test_missing_table_rejected_at_build() {
        let insert = InsertBuilder::new().set(&["a"], vec![1]).unwrap();
        assert!(matches!(insert.build(), Err(SqlFlowError::EmptyTableName)));
    }

    #[test]
    fn test_mismatch_fails_fast() {
        let err = InsertBuilder::new()
            .into_table("t")
            .unwrap()
            .set(&["a", "b"], vec!["x"])
            .unwrap_err();
        assert!(matches!(
            err,
            SqlFlowError::ColumnValueMismatch {
                columns: 2,
                values: 1
            }
        ));
    }

    #[test]
    fn test_case_appends_inline_expression() {
        let insert = InsertBuilder::new()
            .into_table("grades")
            .unwrap()
            .set(&["student"], vec!["ann"])
            .unwrap()
            .case("letter", &[("score >= 90", "'A'")], Some("'B'"));
        assert_eq!(
            insert.build().unwrap(),
            "INSERT INTO grades (student, letter) VALUES (?, CASE WHEN score >= 90 THEN 'A' ELSE 'B' END)"
        );
        assert_eq!(insert.params(), vec![SqlValue::Text(String::from("ann"))]);
    }

    #[test]
    fn test_case_replaces_existing_column_value() {
        let insert = InsertBuilder::new()
            .into_table("t")
            .unwrap()
            .set(&["a", "b"], vec![1, 2])
            .unwrap()
            .case("a", &[("x", "1")], None);
        assert_eq!(
            insert.build().unwrap(),
            "INSERT INTO t (a, b) VALUES (CASE WHEN x THEN 1 END, ?)"
        );
        assert_eq!(insert.params(), vec![SqlValue::Int(2)]);
    }

    #[test]
    fn test_preview_inlines_values() {
        let insert = InsertBuilder::new()
            .into_table("users")
            .unwrap()
            .set(
                &["name", "age"],
                vec![SqlValue::Text(String::from("O'Hara")), SqlValue::Int(40)],
            )
            .unwrap();
        assert_eq!(
            insert.preview().unwrap(),
            "INSERT INTO users (name, age) VALUES ('O''Hara', 40)"
        );
    }
}
