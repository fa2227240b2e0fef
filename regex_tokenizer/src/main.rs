use clap::{Parser, ValueEnum};
use regex_tokenizer::config::runtime::RuntimeConfig;
use regex_tokenizer::file_processor::{FileProcessor, FileProcessorError};
use regex_tokenizer::lexical::{tokenize_file_result, EndOfInputPolicy, LexerError, Tokenizer};
use regex_tokenizer::logging::{self, codes, ErrorCode, LogLevel, LoggingService};
use regex_tokenizer::{log_error, log_success};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
#[command(
    name = "regex-tokenizer",
    about = "Tokenize a Python-like source file and print one row per token",
    version
)]
struct Args {
    /// Source file to tokenize
    file: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
    /// Minimum log level (error, warning, info, debug)
    #[arg(long, value_parser = parse_level)]
    log_level: Option<LogLevel>,
    /// Emit log events as JSON lines
    #[arg(long)]
    structured_logs: bool,
    /// Also write log events to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Accept unterminated strings and unclosed brackets at end of input
    #[arg(long)]
    lenient: bool,
    /// Load preferences from a TOML file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_level(value: &str) -> Result<LogLevel, String> {
    regex_tokenizer::config::runtime::parse_log_level(value)
        .ok_or_else(|| format!("unknown log level '{}'", value))
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    File(#[from] FileProcessorError),
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
    #[error("cannot serialize tokens: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let args = Args::parse();

    let Some(file) = args.file.clone() else {
        eprintln!("Missing input filename");
        process::exit(1);
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {}", message);
            process::exit(1);
        }
    };

    let log = match logging::init(&config.logging) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("error[{}]: {}", e.error_code(), e);
            process::exit(1);
        }
    };

    let outcome = run(&file, args.format, &config, &log);
    log.close();

    match outcome {
        Ok(()) => {}
        Err(CliError::File(e)) => {
            eprintln!("{}", e);
            process::exit(1);
        }
        Err(CliError::Lexer(e)) => {
            eprintln!("error[{}]: {}", e.error_code(), e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn load_config(args: &Args) -> Result<RuntimeConfig, String> {
    let mut config = match &args.config {
        Some(path) => RuntimeConfig::load(path).map_err(|e| e.to_string())?,
        None => RuntimeConfig::default(),
    };

    if let Some(level) = args.log_level {
        config.logging.min_log_level = level;
    }
    if args.structured_logs {
        config.logging.use_structured_logging = true;
    }
    if let Some(path) = &args.log_file {
        config.logging.log_file = Some(path.clone());
    }
    if args.lenient {
        config.lexical.end_of_input = EndOfInputPolicy::Lenient;
    }

    Ok(config)
}

fn run(
    file: &str,
    format: OutputFormat,
    config: &RuntimeConfig,
    log: &LoggingService,
) -> Result<(), CliError> {
    let processor = FileProcessor::from_preferences(&config.file_processor, log.clone());
    let file_result = processor.process_file(file)?;

    let tokenizer = tokenize_file_result(&file_result, &config.lexical).map_err(|e| {
        log_error!(log, e.error_code(), &e.to_string(), "file" => file);
        e
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Table => {
            writeln!(out, "tokens:")?;
            tokenizer.print(&mut out)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, tokenizer.tokens())?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    report(&tokenizer, file, log);
    Ok(())
}

fn report(tokenizer: &Tokenizer, file: &str, log: &LoggingService) {
    let metrics = tokenizer.metrics();
    log_success!(log,
        codes::success::TOKENIZATION_COMPLETE,
        "Tokenization complete",
        "file" => file,
        "tokens" => metrics.total_tokens,
        "lines" => metrics.lines_processed,
        "max_indent_depth" => metrics.max_indent_depth,
        "max_bracket_depth" => metrics.max_bracket_depth,
        "multiline_strings" => metrics.multiline_strings,
        "kinds" => metrics.kind_summary(),
        "clean_end" => tokenizer.end_of_input().is_clean(),
    );
}
