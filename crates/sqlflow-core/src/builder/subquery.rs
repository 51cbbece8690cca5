//! Nested subquery builder.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::clause::Direction;
use crate::error::{Result, SqlFlowError};

static NEXT_SUBQUERY_ID: AtomicU64 = AtomicU64::new(1);

/// A subquery with its own conditions and ordering.
///
/// Nesting renders the inner subquery at call time and replaces the raw
/// query with `(<inner>)`, one parenthesis pair per call. Each subquery has
/// an identity, shared with its clones, and remembers the identities it
/// currently contains, which is how self-nesting is detected.
///
/// # Example
///
/// ```rust
/// use sqlflow_core::builder::{Direction, Subquery};
///
/// let inner = Subquery::new("SELECT user_id FROM orders")?
///     .add_condition("total > 100")?;
/// let outer = Subquery::new("SELECT *")?
///     .add_nested_subquery(&inner)?
///     .order_by("user_id", Direction::Desc);
///
/// assert_eq!(
///     outer.build(),
///     "(SELECT user_id FROM orders WHERE total > 100) ORDER BY user_id DESC"
/// );
/// # Ok::<(), sqlflow_core::SqlFlowError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subquery {
    id: u64,
    absorbed: BTreeSet<u64>,
    query: String,
    conditions: Vec<String>,
    order_by: Vec<String>,
}

impl Subquery {
    /// Creates a subquery from raw query text.
    ///
    /// # Errors
    ///
    /// `EmptySubquery` if `query` is blank.
    pub fn new(query: impl Into<String>) -> Result<Self> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(SqlFlowError::EmptySubquery);
        }
        Ok(Self {
            id: NEXT_SUBQUERY_ID.fetch_add(1, Ordering::Relaxed),
            absorbed: BTreeSet::new(),
            query,
            conditions: vec![],
            order_by: vec![],
        })
    }

    /// Returns the raw query text, without conditions or ordering.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replaces the raw query text, forgetting any nested subquery it held.
    ///
    /// # Errors
    ///
    /// `EmptySubquery` if `query` is blank.
    pub fn set_query(mut self, query: impl Into<String>) -> Result<Self> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(SqlFlowError::EmptySubquery);
        }
        self.query = query;
        self.absorbed.clear();
        Ok(self)
    }

    /// Appends an AND-joined condition.
    ///
    /// # Errors
    ///
    /// `InvalidCondition` if `condition` is blank.
    pub fn add_condition(mut self, condition: impl Into<String>) -> Result<Self> {
        let condition = condition.into();
        if condition.trim().is_empty() {
            return Err(SqlFlowError::InvalidCondition);
        }
        self.conditions.push(condition);
        Ok(self)
    }

    /// Returns the conditions in insertion order.
    #[must_use]
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Appends an ORDER BY entry.
    #[must_use]
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order_by.push(format!("{column} {direction}"));
        self
    }

    /// Wraps `inner` one level deeper: the raw query becomes
    /// `(<inner.build()>)`, replacing whatever was nested before.
    ///
    /// # Errors
    ///
    /// `CyclicSubquery` if `inner` is this subquery (or a clone of it), or
    /// already contains it.
    pub fn add_nested_subquery(mut self, inner: &Self) -> Result<Self> {
        if inner.id == self.id || inner.absorbed.contains(&self.id) {
            return Err(SqlFlowError::CyclicSubquery);
        }
        self.query = format!("({})", inner.build());
        self.absorbed = inner.absorbed.clone();
        self.absorbed.insert(inner.id);
        Ok(self)
    }

    /// Renders `<query> [WHERE ...] [ORDER BY ...]`.
    #[must_use]
    pub fn build(&self) -> String {
        let mut sql = self.query.clone();
        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        sql
    }
}

impl fmt::Display for Subquery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_build() {
        let sq = Subquery::new("SELECT id FROM users").unwrap();
        assert_eq!(sq.build(), "SELECT id FROM users");
        assert_eq!(sq.to_string(), sq.build());
    }

    #[test]
    fn test_conditions_and_ordering() {
        let sq = Subquery::new("SELECT id FROM users")
            .unwrap()
            .add_condition("active = 1")
            .unwrap()
            .add_condition("age > 18")
            .unwrap()
            .order_by("name", Direction::Asc)
            .order_by("id", Direction::Desc);
        assert_eq!(
            sq.build(),
            "SELECT id FROM users WHERE active = 1 AND age > 18 ORDER BY name ASC, id DESC"
        );
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(Subquery::new("  "), Err(SqlFlowError::EmptySubquery)));
        let sq = Subquery::new("SELECT 1").unwrap();
        assert!(matches!(
            sq.clone().add_condition(""),
            Err(SqlFlowError::InvalidCondition)
        ));
        assert!(matches!(sq.set_query(""), Err(SqlFlowError::EmptySubquery)));
    }

    #[test]
    fn test_each_nesting_adds_one_paren_pair() {
        let inner = Subquery::new("SELECT 1").unwrap();
        let middle = Subquery::new("x").unwrap().add_nested_subquery(&inner).unwrap();
        let outer = Subquery::new("y").unwrap().add_nested_subquery(&middle).unwrap();
        assert_eq!(middle.build(), "(SELECT 1)");
        assert_eq!(outer.build(), "((SELECT 1))");
    }

    #[test]
    fn test_self_nesting_rejected() {
        let sq = Subquery::new("SELECT 1").unwrap();
        let copy = sq.clone();
        assert!(matches!(
            sq.add_nested_subquery(&copy),
            Err(SqlFlowError::CyclicSubquery)
        ));
    }

    #[test]
    fn test_transitive_nesting_rejected() {
        let a = Subquery::new("SELECT a").unwrap();
        let b = Subquery::new("SELECT b").unwrap().add_nested_subquery(&a).unwrap();
        let c = Subquery::new("SELECT c").unwrap().add_nested_subquery(&b).unwrap();
        assert!(matches!(
            a.add_nested_subquery(&c),
            Err(SqlFlowError::CyclicSubquery)
        ));
    }

    #[test]
    fn test_renesting_forgets_replaced_subquery() {
        let a = Subquery::new("SELECT a").unwrap();
        let b = Subquery::new("SELECT b").unwrap();
        let outer = Subquery::new("x")
            .unwrap()
            .add_nested_subquery(&a)
            .unwrap()
            .add_nested_subquery(&b)
            .unwrap();
        assert_eq!(outer.build(), "(SELECT b)");

        let wrapped = a.add_nested_subquery(&outer).unwrap();
        assert_eq!(wrapped.build(), "((SELECT b))");
        assert!(matches!(
            b.add_nested_subquery(&outer),
            Err(SqlFlowError::CyclicSubquery)
        ));
    }

    #[test]
    fn test_set_query_forgets_nested_subquery() {
        let a = Subquery::new("SELECT a").unwrap();
        let outer = Subquery::new("x")
            .unwrap()
            .add_nested_subquery(&a)
            .unwrap()
            .set_query("SELECT plain")
            .unwrap();
        assert_eq!(outer.build(), "SELECT plain");

        let wrapped = a.add_nested_subquery(&outer).unwrap();
        assert_eq!(wrapped.build(), "(SELECT plain)");
    }
}
