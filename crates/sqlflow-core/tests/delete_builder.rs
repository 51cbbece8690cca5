//! Tests for DELETE rendering.

mod common;

use sqlflow_core::builder::{col, DeleteBuilder, Statement};

#[test]
fn delete_by_email() {
    let delete = DeleteBuilder::new()
        .from("users")
        .where_clause("email = 'a@b.com'");
    assert_eq!(
        delete.build().unwrap(),
        "DELETE FROM users WHERE email = 'a@b.com'"
    );
    assert!(delete.params().is_empty());
}

#[test]
fn mixed_raw_and_structured_conditions() {
    let delete = DeleteBuilder::new()
        .from("sessions")
        .where_clause(col("expires_at").lt(1_700_000_000))
        .where_clause("revoked = 1")
        .where_clause(col("user_id").in_list(vec![1, 2, 3]));
    assert_eq!(
        delete.build().unwrap(),
        "DELETE FROM sessions WHERE expires_at < ? AND revoked = 1 AND user_id IN (?, ?, ?)"
    );
    assert_eq!(delete.params().len(), 4);
}

#[test]
fn exists_condition() {
    let delete = DeleteBuilder::new()
        .from("carts c")
        .exists("SELECT 1 FROM orders o WHERE o.cart_id = c.id");
    assert_eq!(
        delete.build().unwrap(),
        "DELETE FROM carts c WHERE EXISTS (SELECT 1 FROM orders o WHERE o.cart_id = c.id)"
    );
}
