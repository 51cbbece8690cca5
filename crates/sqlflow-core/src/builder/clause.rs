//! Clause fragments shared by the statement builders.

use std::fmt;
use std::str::FromStr;

use super::expr::ExprBuilder;
use super::value::SqlValue;
use crate::error::SqlFlowError;

/// Which rendering of bound values to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Render {
    /// `?` placeholders, values returned separately.
    Parameterized,
    /// Escaped literals spliced in. Never executed.
    Inline,
}

impl Render {
    pub(crate) fn value(self, value: &SqlValue) -> String {
        match self {
            Self::Parameterized => String::from(SqlValue::PLACEHOLDER),
            Self::Inline => value.to_sql_inline(),
        }
    }
}

/// One WHERE/HAVING predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Pre-formatted SQL text.
    ///
    /// **Warning**: emitted verbatim. Anything built by string formatting
    /// from user input is an injection hole; use [`Condition::Expr`] via
    /// [`col`](super::col) instead.
    Raw(String),
    /// Structured predicate with bound parameters.
    Expr(ExprBuilder),
}

impl Condition {
    pub(crate) fn render(&self, mode: Render) -> &str {
        match (self, mode) {
            (Self::Raw(sql), _) => sql,
            (Self::Expr(expr), Render::Parameterized) => expr.sql(),
            (Self::Expr(expr), Render::Inline) => expr.inline_sql(),
        }
    }

    /// Returns the parameters bound by this condition.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        match self {
            Self::Raw(_) => &[],
            Self::Expr(expr) => expr.params(),
        }
    }
}

impl From<&str> for Condition {
    fn from(sql: &str) -> Self {
        Self::Raw(String::from(sql))
    }
}

impl From<String> for Condition {
    fn from(sql: String) -> Self {
        Self::Raw(sql)
    }
}

impl From<ExprBuilder> for Condition {
    fn from(expr: ExprBuilder) -> Self {
        Self::Expr(expr)
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl Direction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Direction {
    type Err = SqlFlowError;

    /// Parses `asc`/`desc` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(SqlFlowError::InvalidDirection(String::from(s))),
        }
    }
}

/// Kind of JOIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// INNER JOIN
    Inner,
    /// LEFT JOIN
    Left,
    /// RIGHT JOIN
    Right,
}

impl JoinKind {
    /// Returns the SQL keyword preceding `JOIN`.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// Join kind.
    pub kind: JoinKind,
    /// Joined table, optionally with alias.
    pub table: String,
    /// ON condition.
    pub condition: String,
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} JOIN {} ON {}",
            self.kind.as_sql(),
            self.table,
            self.condition
        )
    }
}

/// A subquery inlined as a column or table-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedSubquery {
    /// Subquery text, without parentheses.
    pub query: String,
    /// Optional alias.
    pub alias: Option<String>,
}

impl fmt::Display for EmbeddedSubquery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "({}) AS {alias}", self.query),
            None => write!(f, "({})", self.query),
        }
    }
}

/// Renders `(<query>) [AS alias]`.
pub(crate) fn aliased(query: &str, alias: Option<&str>) -> String {
    EmbeddedSubquery {
        query: String::from(query),
        alias: alias.map(String::from),
    }
    .to_string()
}

/// Renders `CASE WHEN w THEN t ... [ELSE d] END`.
pub(crate) fn case_expression(whens: &[(&str, &str)], default: Option<&str>) -> String {
    let mut sql = String::from("CASE ");
    for (when, then) in whens {
        sql.push_str(&format!("WHEN {when} THEN {then} "));
    }
    if let Some(default) = default {
        sql.push_str(&format!("ELSE {default} "));
    }
    sql.push_str("END");
    sql
}

/// Renders `IF (cond) THEN x [ELSE y]`.
pub(crate) fn if_expression(condition: &str, then: &str, otherwise: Option<&str>) -> String {
    match otherwise {
        Some(otherwise) => format!("IF ({condition}) THEN {then} ELSE {otherwise}"),
        None => format!("IF ({condition}) THEN {then}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::col;

    #[test]
    fn test_direction_parse_is_case_insensitive() {
        assert_eq!("desc".parse::<Direction>().unwrap(), Direction::Desc);
        assert_eq!(" Asc ".parse::<Direction>().unwrap(), Direction::Asc);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(SqlFlowError::InvalidDirection(d)) if d == "sideways"
        ));
    }

    #[test]
    fn test_join_display() {
        let join = Join {
            kind: JoinKind::Left,
            table: String::from("orders o"),
            condition: String::from("o.user_id = u.id"),
        };
        assert_eq!(join.to_string(), "LEFT JOIN orders o ON o.user_id = u.id");
    }

    #[test]
    fn test_embedded_subquery_display() {
        let plain = EmbeddedSubquery {
            query: String::from("SELECT 1"),
            alias: None,
        };
        let aliased = EmbeddedSubquery {
            query: String::from("SELECT COUNT(*) FROM orders"),
            alias: Some(String::from("n")),
        };
        assert_eq!(plain.to_string(), "(SELECT 1)");
        assert_eq!(aliased.to_string(), "(SELECT COUNT(*) FROM orders) AS n");
    }

    #[test]
    fn test_case_expression() {
        let sql = case_expression(&[("score > 90", "'A'"), ("score > 80", "'B'")], Some("'C'"));
        assert_eq!(
            sql,
            "CASE WHEN score > 90 THEN 'A' WHEN score > 80 THEN 'B' ELSE 'C' END"
        );
        assert_eq!(case_expression(&[("x", "1")], None), "CASE WHEN x THEN 1 END");
    }

    #[test]
    fn test_if_expression() {
        assert_eq!(if_expression("a > 1", "1", Some("0")), "IF (a > 1) THEN 1 ELSE 0");
        assert_eq!(if_expression("a > 1", "1", None), "IF (a > 1) THEN 1");
    }

    #[test]
    fn test_condition_render_modes() {
        let cond = Condition::from(col("name").eq("Ann"));
        assert_eq!(cond.render(Render::Parameterized), "name = ?");
        assert_eq!(cond.render(Render::Inline), "name = 'Ann'");
        assert_eq!(cond.params().len(), 1);

        let raw = Condition::from("id = 1");
        assert_eq!(raw.render(Render::Inline), "id = 1");
        assert!(raw.params().is_empty());
    }
}
