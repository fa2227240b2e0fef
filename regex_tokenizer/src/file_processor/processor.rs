//! File processor: turns a path into validated source lines

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::{codes, Code, ErrorCode, LoggingService};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// File processor specific errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("No file named \"{path}\"")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .py, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path:?}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl ErrorCode for FileProcessorError {
    fn error_code(&self) -> Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::EmptyFile => codes::file_processing::EMPTY_FILE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            FileProcessorError::TooManyLines { .. } => codes::file_processing::TOO_MANY_LINES,
        }
    }
}

impl FileProcessorError {
    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    fn from_io(path: &Path, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::InvalidData => FileProcessorError::InvalidEncoding {
                path: path.display().to_string(),
            },
            _ => FileProcessorError::IoError {
                message: format!("'{}': {}", path.display(), error),
            },
        }
    }
}

/// File metadata collected during processing
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_py_file: bool,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    /// Get file size in human-readable format
    pub fn human_readable_size(&self) -> String {
        human_readable_bytes(self.size)
    }

    /// Whether the file is above the profile's large-file threshold
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

fn human_readable_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Source split into terminator-free lines, with metadata
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    /// Lines without `\n` / `\r\n`; a final terminator adds no empty line
    pub lines: Vec<String>,
    pub metadata: FileMetadata,
    pub has_trailing_newline: bool,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if file is empty content-wise (only whitespace)
    pub fn is_effectively_empty(&self) -> bool {
        self.source.trim().is_empty()
    }
}

/// Split source text into lines the tokenizer accepts
pub fn split_lines(source: &str) -> Vec<String> {
    source.lines().map(str::to_string).collect()
}

/// Read a file into lines without validation or logging
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>, FileProcessorError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| FileProcessorError::from_io(path, &e))?;
    Ok(split_lines(&source))
}

/// File processor with compile-time limits and runtime preferences
#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub require_py_extension: bool,
    pub enable_performance_logging: bool,
    pub allow_empty_files: bool,
    log: LoggingService,
}

impl FileProcessor {
    pub fn new(log: LoggingService) -> Self {
        Self {
            require_py_extension: false,
            enable_performance_logging: true,
            allow_empty_files: true,
            log,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences, log: LoggingService) -> Self {
        Self {
            require_py_extension: prefs.require_py_extension,
            enable_performance_logging: prefs.enable_performance_logging,
            allow_empty_files: prefs.allow_empty_files,
            log,
        }
    }

    pub fn with_py_extension_required(mut self, required: bool) -> Self {
        self.require_py_extension = required;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    pub fn with_empty_files_allowed(mut self, allowed: bool) -> Self {
        self.allow_empty_files = allowed;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    pub fn max_line_count() -> usize {
        MAX_LINE_COUNT
    }

    /// Validate, read and split a file
    pub fn process_file(
        &self,
        file_path: &str,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let log = &self.log;

        log_debug!(log, "Starting file processing", "file" => file_path);

        // Step 1: Path validation
        let path = self.validate_path(file_path)?;

        // Step 2: Metadata collection
        let mut metadata = self.get_metadata(&path)?;

        // Step 3: File validation
        self.validate_file(&metadata, file_path)?;

        // Step 4: Content reading
        let source = self.read_file(&path, file_path)?;

        // Step 5: Line splitting and line limit
        let lines = split_lines(&source);
        if lines.len() > MAX_LINE_COUNT {
            let error = FileProcessorError::TooManyLines {
                lines: lines.len(),
                max_lines: MAX_LINE_COUNT,
            };
            log_error!(log, error.error_code(), "File exceeds maximum line count",
                "file" => file_path,
                "lines" => lines.len(),
                "max_lines" => MAX_LINE_COUNT);
            return Err(error);
        }

        metadata.line_count = lines.len();
        let has_trailing_newline = source.ends_with('\n');

        let result = FileProcessingResult {
            source,
            lines,
            metadata,
            has_trailing_newline,
            processing_duration: start_time.elapsed(),
        };

        self.log_processing_success(&result, file_path);

        Ok(result)
    }

    fn log_processing_success(&self, result: &FileProcessingResult, file_path: &str) {
        let log = &self.log;
        let duration_ms = format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0);

        if self.enable_performance_logging {
            log_success!(log,
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully with performance metrics",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "size_human" => result.metadata.human_readable_size(),
                "lines" => result.line_count(),
                "chars" => result.char_count(),
                "duration_ms" => duration_ms,
                "is_large_file" => result.metadata.is_large_file(),
                "trailing_newline" => result.has_trailing_newline
            );
        } else {
            log_success!(log,
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully",
                "file" => file_path,
                "lines" => result.line_count()
            );
        }
    }

    fn validate_path(&self, file_path: &str) -> Result<PathBuf, FileProcessorError> {
        let log = &self.log;

        if file_path.is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(log, error.error_code(), "Empty file path provided");
            return Err(error);
        }

        let path = Path::new(file_path);

        if !path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: file_path.to_string(),
            };
            log_error!(log, error.error_code(), "File not found", "path" => file_path);
            return Err(error);
        }

        if !path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(log, error.error_code(), "Path is not a file", "path" => file_path);
            return Err(error);
        }

        path.canonicalize().map_err(|e| {
            let error = FileProcessorError::from_io(path, &e);
            log_error!(log, error.error_code(), "Failed to canonicalize path",
                "path" => file_path,
                "io_error" => e);
            error
        })
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let log = &self.log;
        let metadata = fs::metadata(path).map_err(|e| {
            let error = FileProcessorError::from_io(path, &e);
            log_error!(log, error.error_code(), "Failed to read file metadata",
                "path" => path.display(),
                "io_error" => e);
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_py_file = extension.as_deref() == Some("py");

        let file_metadata = FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_py_file,
            modified: metadata.modified().ok(),
        };

        log_debug!(log, "File metadata collected",
            "size_bytes" => file_metadata.size,
            "size_human" => file_metadata.human_readable_size(),
            "extension" => file_metadata.extension.as_deref().unwrap_or("none"),
            "max_size_bytes" => MAX_FILE_SIZE);

        Ok(file_metadata)
    }

    fn validate_file(
        &self,
        metadata: &FileMetadata,
        file_path: &str,
    ) -> Result<(), FileProcessorError> {
        let log = &self.log;

        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(log, error.error_code(), "File exceeds maximum size limit",
                "file" => file_path,
                "size_human" => metadata.human_readable_size(),
                "limit_human" => human_readable_bytes(MAX_FILE_SIZE));
            return Err(error);
        }

        if metadata.size == 0 && !self.allow_empty_files {
            let error = FileProcessorError::EmptyFile;
            log_error!(log, error.error_code(), "File is empty", "file" => file_path);
            return Err(error);
        }

        if self.require_py_extension && !metadata.is_py_file {
            let error = FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(log, error.error_code(), "File does not have required .py extension",
                "file" => file_path,
                "extension" => metadata.extension.as_deref().unwrap_or("none"));
            return Err(error);
        }

        Ok(())
    }

    fn read_file(&self, path: &Path, file_path: &str) -> Result<String, FileProcessorError> {
        let log = &self.log;
        fs::read_to_string(path).map_err(|e| {
            let error = FileProcessorError::from_io(path, &e);
            log_error!(log, error.error_code(), "Failed to read file",
                "file" => file_path,
                "io_error" => e);
            error
        })
    }
}
