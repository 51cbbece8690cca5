//! Bounded retry on lock contention.

use std::time::Duration;

use rand::RngExt;
use serde::Deserialize;

/// SQLITE_BUSY primary result code.
const SQLITE_BUSY: i64 = 5;
/// SQLITE_LOCKED primary result code.
const SQLITE_LOCKED: i64 = 6;

/// How often, and how patiently, a statement is retried when the database
/// is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Lower bound of the random pause between attempts.
    pub min_backoff_ms: u64,
    /// Upper bound of the random pause between attempts.
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_backoff_ms: 10,
            max_backoff_ms: 50,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            min_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }

    /// Returns whether another attempt is allowed after `attempt` failed.
    #[must_use]
    pub const fn allows_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Picks a random pause in `[min_backoff_ms, max_backoff_ms]`.
    #[must_use]
    pub fn backoff(&self) -> Duration {
        let (low, high) = if self.min_backoff_ms <= self.max_backoff_ms {
            (self.min_backoff_ms, self.max_backoff_ms)
        } else {
            (self.max_backoff_ms, self.min_backoff_ms)
        };
        Duration::from_millis(rand::rng().random_range(low..=high))
    }

    /// Returns whether `err` is a transient lock error worth retrying.
    #[must_use]
    pub fn is_retryable(err: &sqlx::Error) -> bool {
        let sqlx::Error::Database(db_err) = err else {
            return false;
        };
        // Extended result codes keep the primary code in the low byte.
        db_err
            .code()
            .and_then(|code| code.parse::<i64>().ok())
            .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
    }
}
