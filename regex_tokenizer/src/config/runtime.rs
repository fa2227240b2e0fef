// RUNTIME PREFERENCES (User Experience)

use crate::lexical::{EndOfInputPolicy, OperatorPreset};
pub use crate::logging::events::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Failure loading a preferences file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to require a .py extension
    pub require_py_extension: bool,

    /// Whether to log processing durations and sizes
    pub enable_performance_logging: bool,

    /// Whether an empty file is accepted (it tokenizes to ENCODING, ENDMARKER)
    pub allow_empty_files: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_py_extension: env::var(env_vars::REQUIRE_PY_EXTENSION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_performance_logging: env::var(env_vars::ENABLE_PERFORMANCE_LOGGING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            allow_empty_files: env::var(env_vars::ALLOW_EMPTY_FILES)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Base operator table
    pub operator_preset: OperatorPreset,

    /// Literal operators added on top of the preset
    pub extra_operators: Vec<String>,

    /// Handling of strings and brackets still open at end of input
    pub end_of_input: EndOfInputPolicy,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            operator_preset: env::var(env_vars::LEXICAL_OPERATOR_PRESET)
                .ok()
                .and_then(|v| OperatorPreset::parse(&v))
                .unwrap_or_default(),
            extra_operators: env::var(env_vars::LEXICAL_EXTRA_OPERATORS)
                .ok()
                .map(|v| parse_operator_list(&v))
                .unwrap_or_default(),
            end_of_input: env::var(env_vars::LEXICAL_END_OF_INPUT)
                .ok()
                .and_then(|v| EndOfInputPolicy::parse(&v))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the loggers
    pub min_log_level: LogLevel,

    /// Append events to this file as well
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            log_file: env::var(env_vars::LOGGING_FILE)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Parse log level from string (used for environment variables and flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.trim().to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Split a comma-separated operator list, dropping blanks
pub fn parse_operator_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|op| !op.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Load preferences from a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_PY_EXTENSION: &str = "TOKENIZER_REQUIRE_PY_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "TOKENIZER_ENABLE_PERFORMANCE_LOGGING";
    pub const ALLOW_EMPTY_FILES: &str = "TOKENIZER_ALLOW_EMPTY_FILES";

    // Lexical
    pub const LEXICAL_OPERATOR_PRESET: &str = "TOKENIZER_OPERATOR_PRESET";
    pub const LEXICAL_EXTRA_OPERATORS: &str = "TOKENIZER_EXTRA_OPERATORS";
    pub const LEXICAL_END_OF_INPUT: &str = "TOKENIZER_END_OF_INPUT";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "TOKENIZER_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "TOKENIZER_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "TOKENIZER_LOGGING_MIN_LEVEL";
    pub const LOGGING_FILE: &str = "TOKENIZER_LOGGING_FILE";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_operator_list_parsing() {
        assert_eq!(
            parse_operator_list(" <> , ,?? "),
            vec!["<>".to_string(), "??".to_string()]
        );
        assert!(parse_operator_list("").is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [lexical]
            operator_preset = "core"
            extra_operators = ["!="]
            end_of_input = "lenient"

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.lexical.operator_preset, OperatorPreset::Core);
        assert_eq!(config.lexical.extra_operators, vec!["!=".to_string()]);
        assert_eq!(config.lexical.end_of_input, EndOfInputPolicy::Lenient);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[file_processor]\nrequire_py_extension = true").unwrap();

        let config = RuntimeConfig::load(file.path()).unwrap();
        assert!(config.file_processor.require_py_extension);
    }

    #[test]
    fn test_load_errors() {
        let missing = RuntimeConfig::load(Path::new("/nonexistent/tokenizer.toml"));
        assert_matches!(missing, Err(ConfigError::Read { .. }));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[lexical]\noperator_preset = 7").unwrap();
        assert_matches!(
            RuntimeConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        );
    }

    #[test]
    fn test_env_var_names_are_prefixed() {
        for name in [
            env_vars::REQUIRE_PY_EXTENSION,
            env_vars::LEXICAL_OPERATOR_PRESET,
            env_vars::LOGGING_MIN_LEVEL,
        ] {
            assert!(name.starts_with("TOKENIZER_"));
        }
    }
}
