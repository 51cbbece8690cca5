//! End-to-end statement execution against SQLite.

mod common;

use sqlflow_core::builder::{
    col, DeleteBuilder, Direction, InsertBuilder, RawStatement, SelectBuilder, SqlValue,
    Statement, Subquery, Trigger, TriggerEvent, TriggerTiming, UpdateBuilder,
};
use sqlflow_core::{Database, FileLogger, SqlFlowError};
use sqlflow_sqlite::{SqliteConfig, SqliteDatabase};

#[test]
fn grouped_select_with_join_and_having() {
    let db = common::bookstore();
    common::seed(&db);

    let result = SelectBuilder::new()
        .columns(&["a.name", "COUNT(b.id) AS books"])
        .from("authors a")
        .inner_join("books b", "b.author_id = a.id")
        .where_clause(col("b.price").gt(5))
        .group_by(&["a.name"])
        .having(col("COUNT(b.id)").gt_eq(2))
        .order_by(&["a.name"], Direction::Asc)
        .execute(&db)
        .unwrap();

    assert_eq!(result.columns, vec!["name", "books"]);
    assert_eq!(result.rows.len(), 2);
    assert_eq!(
        result.get(0, "name"),
        Some(&SqlValue::Text(String::from("Le Guin")))
    );
    assert_eq!(result.get(1, "books"), Some(&SqlValue::Int(2)));
}

#[test]
fn select_with_nested_exists() {
    let db = common::bookstore();
    common::seed(&db);

    let sold = Subquery::new("SELECT 1 FROM sales s")
        .unwrap()
        .add_condition("s.book_id = b.id")
        .unwrap();
    let result = SelectBuilder::new()
        .columns(&["b.title"])
        .from("books b")
        .where_clause("b.stock > 0")
        .exists_subquery(sold)
        .order_by(&["b.title"], Direction::Asc)
        .execute(&db)
        .unwrap();

    let titles: Vec<&SqlValue> = result.rows.iter().map(|r| &r[0]).collect();
    assert_eq!(
        titles,
        vec![
            &SqlValue::Text(String::from("Mort")),
            &SqlValue::Text(String::from("The Dispossessed")),
        ]
    );
}

#[test]
fn update_with_exists_reports_row_count() {
    let db = common::bookstore();
    common::seed(&db);

    let changed = UpdateBuilder::new()
        .table("books")
        .assign("stock", 0)
        .exists("SELECT 1 FROM sales WHERE sales.book_id = books.id AND sales.qty >= 5")
        .execute(&db)
        .unwrap();
    assert_eq!(changed, 1);

    let untouched = UpdateBuilder::new()
        .table("books")
        .assign("stock", 99)
        .where_clause(col("title").eq("Nonexistent"))
        .execute(&db)
        .unwrap();
    assert_eq!(untouched, 0);
}

#[test]
fn insert_then_delete() {
    let db = common::bookstore();

    let inserted = InsertBuilder::new()
        .into_table("authors")
        .unwrap()
        .set(&["name"], vec!["O'Brien"])
        .unwrap()
        .execute(&db)
        .unwrap();
    let id = inserted.last_insert_id.unwrap();

    let deleted = DeleteBuilder::new()
        .from("authors")
        .where_clause(col("id").eq(id))
        .execute(&db)
        .unwrap();
    assert_eq!(deleted.rows_affected, Some(1));
}

#[test]
fn trigger_fires_on_insert() {
    let db = common::bookstore();
    RawStatement::new("CREATE TABLE audit (book_id INTEGER)")
        .execute(&db)
        .unwrap();

    let trigger = Trigger::new(
        "books_audit",
        "books",
        TriggerTiming::After,
        TriggerEvent::Insert,
        "BEGIN INSERT INTO audit (book_id) VALUES (NEW.id); END",
    );
    trigger.create_on(&db).unwrap();

    InsertBuilder::new()
        .into_table("books")
        .unwrap()
        .set(
            &["author_id", "title", "price"],
            vec![SqlValue::Int(1), SqlValue::Text(String::from("Tehanu")), SqlValue::Float(11.0)],
        )
        .unwrap()
        .execute(&db)
        .unwrap();

    let audit = RawStatement::new("SELECT COUNT(*) AS n FROM audit").execute(&db).unwrap();
    assert_eq!(audit.get(0, "n"), Some(&SqlValue::Int(1)));

    trigger.drop_on(&db).unwrap();
    trigger.drop_on(&db).unwrap();
}

#[test]
fn constraint_violation_surfaces_as_execution_error() {
    let db = common::bookstore();
    let err = InsertBuilder::new()
        .into_table("books")
        .unwrap()
        .set(&["title"], vec!["Orphan"])
        .unwrap()
        .execute(&db)
        .unwrap_err();
    assert!(matches!(err, SqlFlowError::QueryExecution { .. }));
    assert!(!err.is_validation());
}

#[test]
fn file_backed_database_writes_log() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shop.sqlite3");
    let log_path = dir.path().join("sqlflow_log.txt");
    let config = SqliteConfig::new(format!("sqlite:{}", db_path.display())).log_file(&log_path);

    {
        let db = SqliteDatabase::connect(&config).unwrap();
        RawStatement::new("CREATE TABLE t (a INTEGER)")
            .execute(&db)
            .unwrap();
        db.close();
    }

    assert!(db_path.exists());
    let log = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(&format!(
        " - Successfully connected to the database sqlite:{}",
        db_path.display()
    )));
    assert!(lines[1].ends_with(" - Execution of query: CREATE TABLE t (a INTEGER)"));
    assert!(lines[2].ends_with(" - Database connection closed"));
}

#[test]
fn logger_can_be_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("custom.log");
    let db = SqliteDatabase::connect(&SqliteConfig::in_memory())
        .unwrap()
        .with_logger(FileLogger::open(&log_path).unwrap());

    RawStatement::new("SELECT 1").execute(&db).unwrap();
    db.logger().log("manual entry");

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains(" - Execution of query: SELECT 1\n"));
    assert!(log.contains(" - manual entry\n"));
}
