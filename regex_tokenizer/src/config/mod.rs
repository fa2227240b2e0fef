//! Configuration for the tokenizer
//!
//! Compile-time limits are generated by `build.rs` from the TOML profile in
//! `config/` and included here as [`compile_time`]. User-facing preferences
//! live in [`runtime`].

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{
    ConfigError, FileProcessorPreferences, LexicalPreferences, LoggingPreferences, RuntimeConfig,
};

/// Build information and configuration metadata
pub mod build_info {
    /// Configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("TOKENIZER_BUILD_PROFILE").unwrap_or("development")
    }

    /// Configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("TOKENIZER_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }

    /// OUT_DIR used for generation (for debugging)
    pub fn out_dir() -> &'static str {
        env!("OUT_DIR")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_limits_are_sane() {
        use compile_time::{differential, file_processing, logging};

        assert!(file_processing::LARGE_FILE_THRESHOLD <= file_processing::MAX_FILE_SIZE);
        assert!(file_processing::MAX_LINE_COUNT > 0);
        assert!(differential::REFERENCE_TIMEOUT_SECONDS > 0);
        assert!(differential::MAX_REFERENCE_OUTPUT_BYTES > 0);
        assert!(logging::MAX_MEMORY_EVENTS > 0);
        assert!(logging::MAX_LOG_MESSAGE_LENGTH > 0);
    }

    #[test]
    fn test_build_info() {
        assert!(build_info::source_info().ends_with(".toml"));
        assert!(!build_info::out_dir().is_empty());
    }
}
