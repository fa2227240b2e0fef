// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    differential: DifferentialLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    large_file_threshold: u64,
    max_line_count: usize,
}

#[derive(serde::Deserialize)]
struct DifferentialLimits {
    reference_timeout_seconds: u64,
    max_reference_output_bytes: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_memory_events: usize,
    max_log_message_length: usize,
    log_write_buffer_size: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=TOKENIZER_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=TOKENIZER_CONFIG_DIR");

    let profile =
        env::var("TOKENIZER_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("TOKENIZER_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of regex_tokenizer directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_security_constraints(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_security_constraints(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_REFERENCE_TIMEOUT: u64 = 3600;
    const ABSOLUTE_MAX_REFERENCE_OUTPUT: usize = 1_073_741_824;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("SECURITY: max_file_size exceeds absolute maximum");
    }

    if config.file_processing.large_file_threshold > config.file_processing.max_file_size {
        panic!("CONFIG: large_file_threshold must not exceed max_file_size");
    }

    if config.differential.reference_timeout_seconds == 0
        || config.differential.reference_timeout_seconds > ABSOLUTE_MAX_REFERENCE_TIMEOUT
    {
        panic!("SECURITY: reference_timeout_seconds must be within 1..=3600");
    }

    if config.differential.max_reference_output_bytes > ABSOLUTE_MAX_REFERENCE_OUTPUT {
        panic!("SECURITY: max_reference_output_bytes exceeds absolute maximum");
    }

    if config.logging.max_log_message_length == 0 {
        panic!("CONFIG: max_log_message_length must be positive");
    }

    if profile == "production" {
        if config.file_processing.max_file_size > 50_000_000 {
            panic!("PRODUCTION: max_file_size too high for production");
        }
        if config.differential.reference_timeout_seconds > 600 {
            panic!("PRODUCTION: reference_timeout_seconds too high for production");
        }
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const LARGE_FILE_THRESHOLD: u64 = {};
        pub const MAX_LINE_COUNT: usize = {};
    }}

    pub mod differential {{
        pub const REFERENCE_TIMEOUT_SECONDS: u64 = {};
        pub const MAX_REFERENCE_OUTPUT_BYTES: usize = {};
    }}

    pub mod logging {{
        pub const MAX_MEMORY_EVENTS: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const LOG_WRITE_BUFFER_SIZE: usize = {};
    }}
}}
"#,
        profile,
        // File Processing
        config.file_processing.max_file_size,
        config.file_processing.large_file_threshold,
        config.file_processing.max_line_count,
        // Differential
        config.differential.reference_timeout_seconds,
        config.differential.max_reference_output_bytes,
        // Logging
        config.logging.max_memory_events,
        config.logging.max_log_message_length,
        config.logging.log_write_buffer_size,
    );

    fs::write(output_path, constants_code).unwrap();
}
