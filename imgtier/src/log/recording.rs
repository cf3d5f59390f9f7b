//! In-memory logger for inspecting diagnostics.

use crate::log::{LogLevel, Logger};
use parking_lot::Mutex;
use std::fmt::Arguments;

/// A captured diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Logger that keeps every message it receives.
///
/// A testing aid for crates embedding the coordinator: inject it with
/// [`crate::retrieval::CoordinatorBuilder::with_logger`] and assert that
/// swallowed failures were still reported. Messages are kept without bound,
/// so it is not meant for production use.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records captured so far, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Messages only, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }

    /// Records at or above `level`.
    pub fn at_least(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level >= level)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        self.records.lock().push(LogRecord {
            level,
            message: args.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{log_debug, log_error};

    #[test]
    fn test_records_in_order() {
        let logger = RecordingLogger::new();
        log_debug!(logger, "first {}", 1);
        log_error!(logger, "second {}", 2);

        let records = logger.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first 1");
        assert_eq!(records[1].level, LogLevel::Error);
    }

    #[test]
    fn test_at_least_filters_by_level() {
        let logger = RecordingLogger::new();
        logger.debug(format_args!("noise"));
        logger.warn(format_args!("disk write failed"));

        let warnings = logger.at_least(LogLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "disk write failed");
    }

    #[test]
    fn test_clear() {
        let logger = RecordingLogger::new();
        logger.info(format_args!("x"));
        logger.clear();
        assert!(logger.records().is_empty());
    }
}
