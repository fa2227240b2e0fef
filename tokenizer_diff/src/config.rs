// RUNTIME PREFERENCES for the reference tokenizer

use regex_tokenizer::config::compile_time::differential::{
    MAX_REFERENCE_OUTPUT_BYTES, REFERENCE_TIMEOUT_SECONDS,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_REFERENCE_PROGRAM: &str = "python3";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencePreferences {
    /// Interpreter run as `<program> -m tokenize <file>`
    pub program: String,

    /// Seconds before the reference run is killed
    pub timeout_seconds: u64,

    /// Largest accepted stdout, in bytes
    pub max_output_bytes: usize,
}

impl ReferencePreferences {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds.max(1);
        self
    }
}

impl Default for ReferencePreferences {
    fn default() -> Self {
        Self {
            program: env::var(env_vars::REFERENCE_PROGRAM)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REFERENCE_PROGRAM.to_string()),
            timeout_seconds: env::var(env_vars::REFERENCE_TIMEOUT)
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&secs: &u64| secs > 0)
                .unwrap_or(REFERENCE_TIMEOUT_SECONDS),
            max_output_bytes: MAX_REFERENCE_OUTPUT_BYTES,
        }
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const REFERENCE_PROGRAM: &str = "TOKENIZER_REFERENCE_PROGRAM";
    pub const REFERENCE_TIMEOUT: &str = "TOKENIZER_REFERENCE_TIMEOUT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let prefs = ReferencePreferences::default()
            .with_program("python3.12")
            .with_timeout_seconds(0);

        assert_eq!(prefs.program, "python3.12");
        assert_eq!(prefs.timeout(), Duration::from_secs(1));
        assert_eq!(prefs.max_output_bytes, MAX_REFERENCE_OUTPUT_BYTES);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let prefs: ReferencePreferences = serde_json::from_str(r#"{"program": "py"}"#).unwrap();
        assert_eq!(prefs.program, "py");
        assert!(prefs.timeout_seconds > 0);
    }
}
