//! Logging service and logger implementations
//!
//! A [`LoggingService`] is an ordinary value handed to whoever needs to log.
//! Cloning it shares the same loggers and the same closed flag.

use super::codes::Code;
use super::events::{LogEvent, LogLevel};
use crate::config::compile_time::logging::{LOG_WRITE_BUFFER_SIZE, MAX_MEMORY_EVENTS};
use crate::utils::Span;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Destination for log events
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);

    /// Push buffered output to its destination
    fn flush(&self) {}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Level-filtered front end over a logger
#[derive(Clone)]
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
    closed: Arc<AtomicBool>,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self {
            logger,
            min_level,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Service that drops every event
    pub fn disabled() -> Self {
        Self::new(Arc::new(NullLogger), LogLevel::Error)
    }

    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level && !self.is_closed()
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn flush(&self) {
        self.logger.flush();
    }

    /// Flush and stop accepting events; later calls are no-ops
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.logger.flush();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    pub fn log_error_with_context(
        &self,
        error_code: Code,
        message: &str,
        context: Vec<(&str, &str)>,
    ) {
        let mut event = LogEvent::error(error_code, message);
        for (key, value) in context {
            event = event.with_context(key, value);
        }
        self.log_event(event);
    }

    pub fn log_error_with_span(&self, error_code: Code, message: &str, span: Span) {
        self.log_event(LogEvent::error(error_code, message).with_span(span));
    }

    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }

    pub fn log_info_with_code(&self, info_code: Code, message: &str) {
        self.log_event(LogEvent::info_with_code(info_code, message));
    }

    pub fn log_success(&self, success_code: Code, message: &str) {
        self.log_event(LogEvent::success(success_code, message));
    }

    pub fn log_success_with_context(
        &self,
        success_code: Code,
        message: &str,
        context: Vec<(&str, &str)>,
    ) {
        let mut event = LogEvent::success(success_code, message);
        for (key, value) in context {
            event = event.with_context(key, value);
        }
        self.log_event(event);
    }

    pub fn log_warning(&self, message: &str) {
        self.log_event(LogEvent::warning(message));
    }

    pub fn log_warning_with_code(&self, warning_code: Code, message: &str) {
        self.log_event(LogEvent::warning_with_code(warning_code, message));
    }

    pub fn log_debug(&self, message: &str) {
        self.log_event(LogEvent::debug(message));
    }

    pub fn log_debug_with_code(&self, debug_code: Code, message: &str) {
        self.log_event(LogEvent::debug_with_code(debug_code, message));
    }
}

impl std::fmt::Debug for LoggingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingService")
            .field("min_level", &self.min_level)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Logger that discards everything
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// Human-readable console logger; errors go to stderr
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            match event.level {
                LogLevel::Error => eprintln!("{}", event.format()),
                _ => println!("{}", event.format()),
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// JSON-lines console logger
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            let output = event.format_json().unwrap_or_else(|_| event.format());
            match event.level {
                LogLevel::Error => eprintln!("{}", output),
                _ => println!("{}", output),
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// In-memory logger for tests and summaries; keeps the newest events
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
    capacity: usize,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_capacity(MAX_MEMORY_EVENTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        lock(&self.events).clone()
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
    }

    pub fn event_count(&self) -> usize {
        lock(&self.events).len()
    }

    fn filtered(&self, predicate: impl Fn(&LogEvent) -> bool) -> Vec<LogEvent> {
        lock(&self.events)
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.filtered(LogEvent::is_error)
    }

    pub fn get_warnings(&self) -> Vec<LogEvent> {
        self.filtered(LogEvent::is_warning)
    }

    pub fn get_events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.filtered(|e| e.code == code)
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        lock(&self.events)
            .iter()
            .any(|e| e.is_error() && e.code == code)
    }

    pub fn has_success_with_code(&self, code: Code) -> bool {
        lock(&self.events)
            .iter()
            .any(|e| e.is_info() && e.code == code)
    }

    pub fn get_critical_errors(&self) -> Vec<LogEvent> {
        self.filtered(|e| e.is_error() && e.requires_halt())
    }

    pub fn get_events_by_category(&self, category: &str) -> Vec<LogEvent> {
        self.filtered(|e| e.category() == category)
    }

    pub fn get_summary(&self) -> EventSummary {
        let events = lock(&self.events);
        EventSummary {
            total_count: events.len(),
            error_count: events.iter().filter(|e| e.is_error()).count(),
            warning_count: events.iter().filter(|e| e.is_warning()).count(),
            info_count: events.iter().filter(|e| e.is_info()).count(),
            debug_count: events.iter().filter(|e| e.is_debug()).count(),
            critical_count: events
                .iter()
                .filter(|e| e.is_error() && e.requires_halt())
                .count(),
        }
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = lock(&self.events);
        if events.len() >= self.capacity {
            let remove_count = events.len() - self.capacity + 1;
            events.drain(0..remove_count);
        }
        events.push(event.clone());
    }
}

/// Summary of events in memory logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub total_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub debug_count: usize,
    pub critical_count: usize,
}

impl EventSummary {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    pub fn has_critical_errors(&self) -> bool {
        self.critical_count > 0
    }
}

/// Buffered append-only file logger
pub struct FileLogger {
    writer: Mutex<BufWriter<File>>,
    min_level: LogLevel,
    structured: bool,
}

impl FileLogger {
    pub fn new<P: AsRef<Path>>(
        file_path: P,
        min_level: LogLevel,
        structured: bool,
    ) -> Result<Self, std::io::Error> {
        let path = file_path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::with_capacity(LOG_WRITE_BUFFER_SIZE, file)),
            min_level,
            structured,
        })
    }
}

impl Logger for FileLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            let output = if self.structured {
                event.format_json().unwrap_or_else(|_| event.format())
            } else {
                event.format()
            };
            // Write failures are dropped; logging must not recurse into itself
            let _ = writeln!(lock(&self.writer), "{}", output);
        }
    }

    fn flush(&self) {
        let _ = lock(&self.writer).flush();
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Fan-out logger
pub struct MultiLogger {
    loggers: Vec<Arc<dyn Logger>>,
    min_level: LogLevel,
}

impl MultiLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            loggers: Vec::new(),
            min_level,
        }
    }

    pub fn add_logger(&mut self, logger: Arc<dyn Logger>) {
        self.loggers.push(logger);
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    pub fn with_console(mut self, console_level: LogLevel) -> Self {
        self.add_logger(Arc::new(ConsoleLogger::new(console_level)));
        self
    }

    pub fn with_structured_console(mut self, console_level: LogLevel) -> Self {
        self.add_logger(Arc::new(StructuredLogger::new(console_level)));
        self
    }

    pub fn with_file<P: AsRef<Path>>(
        mut self,
        file_path: P,
        file_level: LogLevel,
        structured: bool,
    ) -> Result<Self, std::io::Error> {
        let file_logger = FileLogger::new(file_path, file_level, structured)?;
        self.add_logger(Arc::new(file_logger));
        Ok(self)
    }

    pub fn with_memory(mut self) -> (Self, Arc<MemoryLogger>) {
        let memory_logger = Arc::new(MemoryLogger::new());
        self.add_logger(memory_logger.clone());
        (self, memory_logger)
    }
}

impl Logger for MultiLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            for logger in &self.loggers {
                logger.log(event);
            }
        }
    }

    fn flush(&self) {
        for logger in &self.loggers {
            logger.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use tempfile::tempdir;

    fn memory_service(level: LogLevel) -> (LoggingService, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        (LoggingService::new(logger.clone(), level), logger)
    }

    #[test]
    fn test_memory_logger() {
        let logger = MemoryLogger::new();

        logger.log(&LogEvent::info("Message 1"));
        logger.log(&LogEvent::error(
            codes::lexical::PATTERN_MISMATCH,
            "Error message",
        ));

        assert_eq!(logger.event_count(), 2);
        assert_eq!(logger.get_errors().len(), 1);
        assert!(logger.has_error_with_code(codes::lexical::PATTERN_MISMATCH));

        let summary = logger.get_summary();
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.info_count, 1);
        assert!(summary.has_errors());

        logger.clear();
        assert_eq!(logger.event_count(), 0);
    }

    #[test]
    fn test_memory_logger_keeps_newest_events() {
        let logger = MemoryLogger::with_capacity(3);
        for i in 0..5 {
            logger.log(&LogEvent::info(&format!("event {}", i)));
        }
        let messages: Vec<String> = logger.get_events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["event 2", "event 3", "event 4"]);
    }

    #[test]
    fn test_multi_logger() {
        let multi = MultiLogger::new(LogLevel::Debug);
        let (multi, memory) = multi.with_memory();

        multi.log(&LogEvent::info("Test message"));
        assert_eq!(memory.event_count(), 1);
        assert_eq!(multi.len(), 1);
    }

    #[test]
    fn test_logging_service() {
        let (service, logger) = memory_service(LogLevel::Debug);

        service.log_error(codes::file_processing::PERMISSION_DENIED, "Test error");
        service.log_success(codes::success::FILE_PROCESSING_SUCCESS, "Test success");
        service.log_info("Test info");

        assert_eq!(logger.event_count(), 3);
        assert!(logger.has_error_with_code(codes::file_processing::PERMISSION_DENIED));
        assert!(logger.has_success_with_code(codes::success::FILE_PROCESSING_SUCCESS));
    }

    #[test]
    fn test_log_level_filtering() {
        let (service, logger) = memory_service(LogLevel::Error);

        service.log_debug("Debug message");
        service.log_info("Info message");
        service.log_error(codes::system::INTERNAL_ERROR, "Error message");

        assert_eq!(logger.event_count(), 1);
        assert!(logger.has_error_with_code(codes::system::INTERNAL_ERROR));
    }

    #[test]
    fn test_close_stops_logging_for_all_clones() {
        let (service, logger) = memory_service(LogLevel::Debug);
        let clone = service.clone();

        clone.log_info("before close");
        service.close();
        clone.log_info("after close");
        service.close();

        assert!(clone.is_closed());
        assert_eq!(logger.event_count(), 1);
    }

    #[test]
    fn test_disabled_service_drops_events() {
        let service = LoggingService::disabled();
        service.log_error(codes::system::INTERNAL_ERROR, "ignored");
        service.flush();
        service.close();
    }

    #[test]
    fn test_file_logger_flushes_on_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("tokenizer.log");
        let logger = Arc::new(FileLogger::new(&path, LogLevel::Info, true).unwrap());
        let service = LoggingService::new(logger, LogLevel::Info);

        service.log_success(codes::success::TOKENIZATION_COMPLETE, "done");
        service.log_debug("filtered out");
        service.close();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["code"], "I020");
    }

    #[test]
    fn test_critical_errors_and_categories() {
        let logger = MemoryLogger::new();

        logger.log(&LogEvent::error(codes::system::INTERNAL_ERROR, "Critical"));
        logger.log(&LogEvent::error(
            codes::file_processing::FILE_NOT_FOUND,
            "File error",
        ));
        logger.log(&LogEvent::error(
            codes::lexical::PATTERN_MISMATCH,
            "Lexical error",
        ));

        assert_eq!(logger.get_critical_errors().len(), 3);
        assert_eq!(logger.get_events_by_category("FileProcessing").len(), 1);
        assert_eq!(logger.get_events_by_category("Lexical").len(), 1);
        assert_eq!(
            logger
                .get_events_with_code(codes::system::INTERNAL_ERROR)
                .len(),
            1
        );
    }

    #[test]
    fn test_context_convenience_methods() {
        let (service, logger) = memory_service(LogLevel::Debug);

        service.log_error_with_context(
            codes::file_processing::FILE_TOO_LARGE,
            "File too large",
            vec![("size", "1024"), ("limit", "512")],
        );
        service.log_success_with_context(
            codes::success::TOKENIZATION_COMPLETE,
            "Tokenization done",
            vec![("tokens", "42")],
        );

        let events = logger.get_events();
        assert_eq!(events.len(), 2);
        assert!(events[0].context.contains_key("size"));
        assert!(events[1].context.contains_key("tokens"));
    }
}
