#![allow(dead_code)]

use std::cell::RefCell;

use sqlflow_core::{Database, Logger, QueryResult, Result, SqlFlowError, SqlValue};

/// Logger double keeping every message.
#[derive(Default)]
pub struct MemoryLogger {
    pub messages: RefCell<Vec<String>>,
}

impl Logger for MemoryLogger {
    fn log(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// What the fake database answers with.
pub enum Reply {
    Result(QueryResult),
    Fail(&'static str),
}

/// Database double recording every call.
pub struct RecordingDatabase {
    pub calls: RefCell<Vec<(String, Vec<SqlValue>)>>,
    pub logger: MemoryLogger,
    reply: Reply,
}

impl RecordingDatabase {
    pub fn replying(reply: Reply) -> Self {
        Self {
            calls: RefCell::new(vec![]),
            logger: MemoryLogger::default(),
            reply,
        }
    }

    pub fn ok() -> Self {
        Self::replying(Reply::Result(QueryResult::affected(1)))
    }

    pub fn messages(&self) -> Vec<String> {
        self.logger.messages.borrow().clone()
    }

    pub fn last_call(&self) -> (String, Vec<SqlValue>) {
        self.calls
            .borrow()
            .last()
            .cloned()
            .unwrap_or_else(|| panic!("no statement was executed"))
    }
}

impl Database for RecordingDatabase {
    fn execute_query(&self, sql: &str, params: &[SqlValue]) -> Result<QueryResult> {
        self.calls
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));
        match &self.reply {
            Reply::Result(result) => Ok(result.clone()),
            Reply::Fail(message) => Err(SqlFlowError::query_execution(*message)),
        }
    }

    fn logger(&self) -> &dyn Logger {
        &self.logger
    }
}
