//! Adapter from [`Logger`] to the `tracing` macros.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Logger that forwards diagnostics to `tracing`.
///
/// Output depends on the installed subscriber; see [`crate::logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "imgtier::diagnostics", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "imgtier::diagnostics", "{}", args),
            LogLevel::Info => tracing::info!(target: "imgtier::diagnostics", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "imgtier::diagnostics", "{}", args),
            LogLevel::Error => tracing::error!(target: "imgtier::diagnostics", "{}", args),
        }
    }
}
