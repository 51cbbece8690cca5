//! Builds and runs a handful of statements against a bookstore database.
//!
//! ```sh
//! DATABASE_URL=sqlite:bookstore.sqlite3 cargo run -p sqlflow-sqlite --example bookstore
//! ```
//!
//! Without `DATABASE_URL` the demo runs against `sqlite:db.sqlite3`.

use sqlflow_core::builder::{
    col, DeleteBuilder, Direction, InsertBuilder, RawStatement, SelectBuilder, Statement,
    Subquery, ToSqlValue, UpdateBuilder,
};
use sqlflow_sqlite::{SqliteConfig, SqliteDatabase};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let db = SqliteDatabase::connect(&SqliteConfig::from_env())?;

    RawStatement::new(
        "CREATE TABLE IF NOT EXISTS books (id INTEGER PRIMARY KEY, title TEXT NOT NULL, \
         price REAL NOT NULL, stock INTEGER NOT NULL DEFAULT 0)",
    )
    .execute(&db)?;
    RawStatement::new(
        "CREATE TABLE IF NOT EXISTS sales (id INTEGER PRIMARY KEY, book_id INTEGER NOT NULL, \
         qty INTEGER NOT NULL)",
    )
    .execute(&db)?;

    db.begin()?;
    for (title, price, stock) in [("Mort", 8.0, 7), ("Small Gods", 10.0, 2), ("Eric", 6.5, 0)] {
        let insert = InsertBuilder::new()
            .into_table("books")?
            .set(
                &["title", "price", "stock"],
                vec![title.to_sql_value(), price.to_sql_value(), stock.to_sql_value()],
            )?;
        info!(sql = %insert.preview()?, "Inserting");
        let result = insert.execute(&db)?;
        RawStatement::new("INSERT INTO sales (book_id, qty) VALUES (?, ?)")
            .bind(result.last_insert_id)
            .bind(stock / 2)
            .execute(&db)?;
    }
    db.commit()?;

    let best_sellers =
        Subquery::new("SELECT 1 FROM sales s")?.add_condition("s.book_id = b.id AND s.qty > 0")?;
    let in_stock = SelectBuilder::new()
        .columns(&["b.title", "b.price"])
        .from("books b")
        .where_clause(col("b.stock").gt(0))
        .exists_subquery(best_sellers)
        .order_by(&["b.price"], Direction::Desc);
    info!(sql = %in_stock.build()?, "Selecting");
    for row in in_stock.execute(&db)?.rows {
        info!(title = %row[0], price = %row[1], "In stock and selling");
    }

    let discounted = UpdateBuilder::new()
        .table("books")
        .assign("price", 5.0)
        .where_clause(col("stock").eq(0))
        .execute(&db)?;
    info!(rows = discounted, "Discounted out-of-stock books");

    let removed = DeleteBuilder::new()
        .from("sales")
        .where_clause(col("qty").eq(0))
        .execute(&db)?;
    info!(rows = ?removed.rows_affected, "Removed empty sales");

    db.close();
    Ok(())
}
