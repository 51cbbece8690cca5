#![allow(dead_code)]

use sqlflow_core::builder::{RawStatement, Statement};
use sqlflow_sqlite::{SqliteConfig, SqliteDatabase};

/// Opens an in-memory database with a small bookstore schema.
pub fn bookstore() -> SqliteDatabase {
    let db = SqliteDatabase::connect(&SqliteConfig::in_memory())
        .expect("Failed to open in-memory SQLite database");
    for ddl in [
        "CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        "CREATE TABLE books (id INTEGER PRIMARY KEY, author_id INTEGER NOT NULL, \
         title TEXT NOT NULL, price REAL NOT NULL, stock INTEGER NOT NULL DEFAULT 0)",
        "CREATE TABLE sales (id INTEGER PRIMARY KEY, book_id INTEGER NOT NULL, qty INTEGER NOT NULL)",
    ] {
        RawStatement::new(ddl)
            .execute(&db)
            .expect("Failed to create schema");
    }
    db
}

/// Inserts `(author, title, price, stock)` rows.
pub fn seed(db: &SqliteDatabase) {
    RawStatement::new("INSERT INTO authors (id, name) VALUES (1, 'Le Guin'), (2, 'Pratchett')")
        .execute(db)
        .expect("Failed to seed authors");
    RawStatement::new(
        "INSERT INTO books (author_id, title, price, stock) VALUES \
         (1, 'The Dispossessed', 12.5, 3), \
         (1, 'The Lathe of Heaven', 9.0, 0), \
         (2, 'Mort', 8.0, 7), \
         (2, 'Small Gods', 10.0, 2)",
    )
    .execute(db)
    .expect("Failed to seed books");
    RawStatement::new("INSERT INTO sales (book_id, qty) VALUES (1, 2), (3, 5), (3, 1)")
        .execute(db)
        .expect("Failed to seed sales");
}
