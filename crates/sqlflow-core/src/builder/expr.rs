//! Structured predicate builder.
//!
//! `col("email").eq(input)` renders `email = ?` and carries `input` as a
//! bound parameter, so callers never splice values into SQL text.

use super::value::{SqlValue, ToSqlValue};

/// Creates a column reference.
#[must_use]
pub fn col(name: &str) -> Column {
    Column {
        table: None,
        name: String::from(name),
    }
}

/// A column reference, optionally qualified by a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Optional table qualifier.
    pub table: Option<String>,
    /// Column name.
    pub name: String,
}

impl Column {
    /// Creates a qualified column reference (`table.name`).
    #[must_use]
    pub fn qualified(table: &str, name: &str) -> Self {
        Self {
            table: Some(String::from(table)),
            name: String::from(name),
        }
    }

    /// Returns the SQL representation.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match &self.table {
            Some(t) => format!("{t}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// `column = ?`
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> ExprBuilder {
        ExprBuilder::from(self).eq(value)
    }

    /// `column != ?`
    #[must_use]
    pub fn not_eq<T: ToSqlValue>(self, value: T) -> ExprBuilder {
        ExprBuilder::from(self).not_eq(value)
    }

    /// `column < ?`
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> ExprBuilder {
        ExprBuilder::from(self).lt(value)
    }

    /// `column <= ?`
    #[must_use]
    pub fn lt_eq<T: ToSqlValue>(self, value: T) -> ExprBuilder {
        ExprBuilder::from(self).lt_eq(value)
    }

    /// `column > ?`
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> ExprBuilder {
        ExprBuilder::from(self).gt(value)
    }

    /// `column >= ?`
    #[must_use]
    pub fn gt_eq<T: ToSqlValue>(self, value: T) -> ExprBuilder {
        ExprBuilder::from(self).gt_eq(value)
    }

    /// `column IS NULL`
    #[must_use]
    pub fn is_null(self) -> ExprBuilder {
        ExprBuilder::from(self).is_null()
    }

    /// `column IS NOT NULL`
    #[must_use]
    pub fn is_not_null(self) -> ExprBuilder {
        ExprBuilder::from(self).is_not_null()
    }

    /// `column LIKE ?`
    #[must_use]
    pub fn like<T: ToSqlValue>(self, pattern: T) -> ExprBuilder {
        ExprBuilder::from(self).like(pattern)
    }

    /// `column NOT LIKE ?`
    #[must_use]
    pub fn not_like<T: ToSqlValue>(self, pattern: T) -> ExprBuilder {
        ExprBuilder::from(self).binary("NOT LIKE", pattern.to_sql_value())
    }

    /// `column BETWEEN ? AND ?`
    #[must_use]
    pub fn between<T: ToSqlValue, U: ToSqlValue>(self, low: T, high: U) -> ExprBuilder {
        ExprBuilder::from(self).between(low.to_sql_value(), high.to_sql_value(), false)
    }

    /// `column NOT BETWEEN ? AND ?`
    #[must_use]
    pub fn not_between<T: ToSqlValue, U: ToSqlValue>(self, low: T, high: U) -> ExprBuilder {
        ExprBuilder::from(self).between(low.to_sql_value(), high.to_sql_value(), true)
    }

    /// `column IN (?, ?, ...)`
    #[must_use]
    pub fn in_list<T: ToSqlValue>(self, values: Vec<T>) -> ExprBuilder {
        ExprBuilder::from(self).in_list(values)
    }

    /// `column NOT IN (?, ?, ...)`
    #[must_use]
    pub fn not_in_list<T: ToSqlValue>(self, values: Vec<T>) -> ExprBuilder {
        ExprBuilder::from(self).not_in_list(values)
    }
}

/// A predicate with its bound parameters.
///
/// Keeps two renderings side by side: `sql` with `?` placeholders, used for
/// execution, and `inline` with escaped literals, used for previews.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprBuilder {
    sql: String,
    inline: String,
    params: Vec<SqlValue>,
}

impl ExprBuilder {
    /// Creates an expression from raw SQL.
    ///
    /// **Warning**: the text is emitted verbatim. Never build it from user
    /// input.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self {
            inline: sql.clone(),
            sql,
            params: vec![],
        }
    }

    /// Creates a bound value expression (`?`).
    #[must_use]
    pub fn value<T: ToSqlValue>(value: T) -> Self {
        Self::from(value.to_sql_value())
    }

    fn binary(self, op: &str, right: impl Into<Self>) -> Self {
        let right = right.into();
        let mut params = self.params;
        params.extend(right.params);
        Self {
            sql: format!("{} {op} {}", self.sql, right.sql),
            inline: format!("{} {op} {}", self.inline, right.inline),
            params,
        }
    }

    fn postfix(self, op: &str) -> Self {
        Self {
            sql: format!("{} {op}", self.sql),
            inline: format!("{} {op}", self.inline),
            params: self.params,
        }
    }

    fn between(self, low: SqlValue, high: SqlValue, negated: bool) -> Self {
        let keyword = if negated { "NOT BETWEEN" } else { "BETWEEN" };
        let inline = format!(
            "{} {keyword} {} AND {}",
            self.inline,
            low.to_sql_inline(),
            high.to_sql_inline()
        );
        let mut params = self.params;
        params.push(low);
        params.push(high);
        Self {
            sql: format!("{} {keyword} ? AND ?", self.sql),
            inline,
            params,
        }
    }

    fn list(self, values: Vec<SqlValue>, negated: bool) -> Self {
        let keyword = if negated { "NOT IN" } else { "IN" };
        let placeholders = vec![SqlValue::PLACEHOLDER; values.len()].join(", ");
        let literals: Vec<String> = values.iter().map(SqlValue::to_sql_inline).collect();
        let mut params = self.params;
        params.extend(values);
        Self {
            sql: format!("{} {keyword} ({placeholders})", self.sql),
            inline: format!("{} {keyword} ({})", self.inline, literals.join(", ")),
            params,
        }
    }

    /// `self AND other`
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        self.binary("AND", other)
    }

    /// `self OR other`
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        self.binary("OR", other)
    }

    /// Wraps the expression in parentheses.
    #[must_use]
    pub fn paren(self) -> Self {
        Self {
            sql: format!("({})", self.sql),
            inline: format!("({})", self.inline),
            params: self.params,
        }
    }

    /// Negates the expression with NOT.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self {
            sql: format!("NOT {}", self.sql),
            inline: format!("NOT {}", self.inline),
            params: self.params,
        }
    }

    /// `self = ?`
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> Self {
        self.binary("=", value.to_sql_value())
    }

    /// `self != ?`
    #[must_use]
    pub fn not_eq<T: ToSqlValue>(self, value: T) -> Self {
        self.binary("!=", value.to_sql_value())
    }

    /// `self < ?`
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> Self {
        self.binary("<", value.to_sql_value())
    }

    /// `self <= ?`
    #[must_use]
    pub fn lt_eq<T: ToSqlValue>(self, value: T) -> Self {
        self.binary("<=", value.to_sql_value())
    }

    /// `self > ?`
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> Self {
        self.binary(">", value.to_sql_value())
    }

    /// `self >= ?`
    #[must_use]
    pub fn gt_eq<T: ToSqlValue>(self, value: T) -> Self {
        self.binary(">=", value.to_sql_value())
    }

    /// `self IS NULL`
    #[must_use]
    pub fn is_null(self) -> Self {
        self.postfix("IS NULL")
    }

    /// `self IS NOT NULL`
    #[must_use]
    pub fn is_not_null(self) -> Self {
        self.postfix("IS NOT NULL")
    }

    /// `self LIKE ?`
    #[must_use]
    pub fn like<T: ToSqlValue>(self, pattern: T) -> Self {
        self.binary("LIKE", pattern.to_sql_value())
    }

    /// `self IN (?, ...)`
    #[must_use]
    pub fn in_list<T: ToSqlValue>(self, values: Vec<T>) -> Self {
        let values = values.into_iter().map(ToSqlValue::to_sql_value).collect();
        self.list(values, false)
    }

    /// `self NOT IN (?, ...)`
    #[must_use]
    pub fn not_in_list<T: ToSqlValue>(self, values: Vec<T>) -> Self {
        let values = values.into_iter().map(ToSqlValue::to_sql_value).collect();
        self.list(values, true)
    }

    /// Returns the parameterized SQL.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the SQL with parameters inlined as escaped literals.
    #[must_use]
    pub fn inline_sql(&self) -> &str {
        &self.inline
    }

    /// Returns the bound parameters in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Consumes the builder and returns the SQL and parameters.
    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}

impl From<Column> for ExprBuilder {
    fn from(col: Column) -> Self {
        Self::raw(col.to_sql())
    }
}

impl From<SqlValue> for ExprBuilder {
    fn from(value: SqlValue) -> Self {
        Self {
            sql: String::from(SqlValue::PLACEHOLDER),
            inline: value.to_sql_inline(),
            params: vec![value],
        }
    }
}
