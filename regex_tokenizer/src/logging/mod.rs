//! Logging for the tokenizer
//!
//! There is no process-wide logger. [`init`] builds a [`LoggingService`]
//! from preferences and the caller passes it to whatever needs to log, then
//! flushes and closes it when done.

pub mod codes;
pub mod events;
#[macro_use]
pub mod macros;
pub mod service;

use crate::config::runtime::LoggingPreferences;
use std::path::PathBuf;
use std::sync::Arc;

pub use codes::{Code, ErrorCode, Severity};
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, EventSummary, FileLogger, Logger, LoggingService, MemoryLogger, MultiLogger,
    NullLogger, StructuredLogger,
};

/// Failure building the logging service
#[derive(Debug, thiserror::Error)]
pub enum LoggingInitError {
    #[error("Cannot open log file '{path}': {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ErrorCode for LoggingInitError {
    fn error_code(&self) -> Code {
        codes::system::INITIALIZATION_FAILURE
    }
}

/// Build a service from preferences: console (plain or JSON) plus an optional file
pub fn init(preferences: &LoggingPreferences) -> Result<LoggingService, LoggingInitError> {
    let level = preferences.min_log_level;
    let mut multi = MultiLogger::new(level);

    if preferences.enable_console_logging {
        multi = if preferences.use_structured_logging {
            multi.with_structured_console(level)
        } else {
            multi.with_console(level)
        };
    }

    if let Some(path) = &preferences.log_file {
        multi = multi
            .with_file(path, level, preferences.use_structured_logging)
            .map_err(|source| LoggingInitError::LogFile {
                path: path.clone(),
                source,
            })?;
    }

    if multi.is_empty() {
        return Ok(LoggingService::disabled());
    }

    Ok(LoggingService::new(Arc::new(multi), level))
}

/// Service backed by a fresh memory logger, for tests and embedding
pub fn memory_service(level: LogLevel) -> (LoggingService, Arc<MemoryLogger>) {
    let memory = Arc::new(MemoryLogger::new());
    (LoggingService::new(memory.clone(), level), memory)
}
