//! [`Logger`] sinks.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use tracing::{info, warn};

use crate::database::Logger;
use crate::error::Result;

/// Timestamp layout of [`FileLogger`] lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Forwards messages to `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        info!(target: "sqlflow", "{message}");
    }
}

/// Appends `YYYY-MM-DD HH:MM:SS - message` lines to a file.
///
/// The file is opened once by [`FileLogger::open`], flushed after every
/// entry, and closed by [`FileLogger::close`] or on drop. Write failures are
/// reported through `tracing` and otherwise ignored.
#[derive(Debug)]
pub struct FileLogger {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileLogger {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be opened.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    /// Returns the log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` until [`FileLogger::close`] is called.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.writer().is_some()
    }

    /// Flushes and closes the file. Later messages are dropped.
    pub fn close(&self) {
        if let Some(mut writer) = self.writer().take() {
            if let Err(e) = writer.flush() {
                warn!(path = %self.path.display(), error = %e, "Failed to flush log file");
            }
        }
    }

    fn writer(&self) -> MutexGuard<'_, Option<BufWriter<File>>> {
        self.writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Logger for FileLogger {
    fn log(&self, message: &str) {
        let line = format!("{} - {message}\n", Local::now().format(TIMESTAMP_FORMAT));
        let mut guard = self.writer();
        let Some(writer) = guard.as_mut() else {
            warn!(path = %self.path.display(), "Log file is closed, dropping message");
            return;
        };
        if let Err(e) = writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
        {
            warn!(path = %self.path.display(), error = %e, "Error writing to log file");
        }
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logger_appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sqlflow_log.txt");

        let logger = FileLogger::open(&path).unwrap();
        logger.log("first");
        logger.log("second");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - first"));
        assert!(lines[1].ends_with(" - second"));
        // "2024-01-31 12:00:00 - " prefix
        assert_eq!(lines[0].find(" - "), Some(19));
    }

    #[test]
    fn test_file_logger_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");

        FileLogger::open(&path).unwrap().log("one");
        FileLogger::open(&path).unwrap().log("two");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_closed_logger_drops_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");

        let logger = FileLogger::open(&path).unwrap();
        logger.log("kept");
        logger.close();
        assert!(!logger.is_open());
        logger.log("dropped");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("kept"));
        assert!(!contents.contains("dropped"));
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("log.txt");
        assert!(matches!(
            FileLogger::open(path),
            Err(crate::SqlFlowError::Io(_))
        ));
    }
}
