//! CREATE/DROP TRIGGER statements.

use std::fmt;

use super::statement::{RawStatement, Statement};
use crate::database::{Database, QueryResult};
use crate::error::Result;

/// When a trigger fires relative to its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTiming {
    /// BEFORE
    Before,
    /// AFTER
    After,
}

impl fmt::Display for TriggerTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Before => "BEFORE",
            Self::After => "AFTER",
        })
    }
}

/// The row event a trigger reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// INSERT
    Insert,
    /// UPDATE
    Update,
    /// DELETE
    Delete,
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        })
    }
}

/// A row-level trigger definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    name: String,
    table: String,
    timing: TriggerTiming,
    event: TriggerEvent,
    body: String,
}

impl Trigger {
    /// Defines a trigger running `body` for each affected row.
    #[must_use]
    pub fn new(
        name: &str,
        table: &str,
        timing: TriggerTiming,
        event: TriggerEvent,
        body: &str,
    ) -> Self {
        Self {
            name: String::from(name),
            table: String::from(table),
            timing,
            event,
            body: String::from(body),
        }
    }

    /// Returns the trigger name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `CREATE TRIGGER <name> <timing> <event> ON <table> FOR EACH ROW <body>;`
    #[must_use]
    pub fn create_sql(&self) -> String {
        format!(
            "CREATE TRIGGER {} {} {} ON {} FOR EACH ROW {};",
            self.name, self.timing, self.event, self.table, self.body
        )
    }

    /// `DROP TRIGGER IF EXISTS <name>;`
    #[must_use]
    pub fn drop_sql(&self) -> String {
        format!("DROP TRIGGER IF EXISTS {};", self.name)
    }

    /// Replaces the body and returns the new CREATE statement.
    pub fn modify(&mut self, body: &str) -> String {
        self.body = String::from(body);
        self.create_sql()
    }

    /// Creates the trigger on `db`.
    ///
    /// # Errors
    ///
    /// Whatever the collaborator reports.
    pub fn create_on(&self, db: &dyn Database) -> Result<QueryResult> {
        RawStatement::new(self.create_sql()).execute(db)
    }

    /// Drops the trigger on `db` if it exists.
    ///
    /// # Errors
    ///
    /// Whatever the collaborator reports.
    pub fn drop_on(&self, db: &dyn Database) -> Result<QueryResult> {
        RawStatement::new(self.drop_sql()).execute(db)
    }
}
