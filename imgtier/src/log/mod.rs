//! Diagnostics channel used by the retrieval layer.
//!
//! Storage failures, resize failures and other conditions that must never
//! reach a fetch caller are reported through a [`Logger`]. The coordinator
//! holds an `Arc<dyn Logger>`, so production code routes diagnostics into
//! `tracing` while tests can record and inspect them.
//!
//! - [`TracingLogger`]: forwards to the `tracing` macros
//! - [`NoOpLogger`]: discards everything
//! - [`RecordingLogger`]: keeps messages in memory, for tests
//!
//! ```
//! use imgtier::log::{Logger, RecordingLogger};
//! use imgtier::log_warn;
//! use std::sync::Arc;
//!
//! let logger = Arc::new(RecordingLogger::new());
//! log_warn!(logger, "disk write failed for {}", "avatar-42");
//! assert_eq!(logger.messages().len(), 1);
//! ```

mod noop;
mod recording;
mod tracing_adapter;
mod r#trait;

pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use recording::{LogRecord, RecordingLogger};
pub use tracing_adapter::TracingLogger;
