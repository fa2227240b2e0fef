//! File processor: path validation, size and line limits, line splitting

mod processor;

pub use processor::{
    read_lines, split_lines, FileMetadata, FileProcessingResult, FileProcessor,
    FileProcessorError,
};

use crate::config::runtime::FileProcessorPreferences;
use crate::logging::LoggingService;

/// Process a file with default preferences
pub fn process_file(
    file_path: &str,
    log: &LoggingService,
) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new(log.clone()).process_file(file_path)
}

/// Create a file processor from runtime preferences
pub fn create_processor_from_preferences(
    prefs: &FileProcessorPreferences,
    log: &LoggingService,
) -> FileProcessor {
    FileProcessor::from_preferences(prefs, log.clone())
}
