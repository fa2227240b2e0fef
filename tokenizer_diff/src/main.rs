use clap::Parser;
use regex_tokenizer::config::runtime::{parse_log_level, LexicalPreferences, LoggingPreferences};
use regex_tokenizer::logging::{self, ErrorCode, LogLevel, LoggingService};
use regex_tokenizer::{log_error, EndOfInputPolicy, FileProcessor, Tokenizer};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokenizer_diff::{compare_tokenizer, Comparison, DiffError, PythonTokenize, ReferencePreferences};

#[derive(Parser)]
#[command(
    name = "tokenizer-diff",
    about = "Compare regex-tokenizer output with python -m tokenize",
    version
)]
struct Args {
    /// Source file to compare
    file: Option<PathBuf>,
    /// Interpreter that runs `-m tokenize`
    #[arg(long)]
    reference: Option<String>,
    /// Seconds before the reference run is killed
    #[arg(long)]
    timeout: Option<u64>,
    /// Only print the final verdict
    #[arg(long)]
    silent: bool,
    /// Print our tokens before comparing
    #[arg(long)]
    show_tokens: bool,
    /// Accept unterminated strings and unclosed brackets at end of input
    #[arg(long)]
    lenient: bool,
    /// Minimum log level (error, warning, info, debug)
    #[arg(long, value_parser = parse_level)]
    log_level: Option<LogLevel>,
}

fn parse_level(value: &str) -> Result<LogLevel, String> {
    parse_log_level(value).ok_or_else(|| format!("unknown log level '{}'", value))
}

const EXIT_MATCH: u8 = 0;
const EXIT_MISMATCH: u8 = 1;
const EXIT_HARNESS_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();

    let Some(file) = args.file.clone() else {
        eprintln!("Missing input filename");
        return ExitCode::from(EXIT_HARNESS_ERROR);
    };

    let mut logging_prefs = LoggingPreferences::default();
    if let Some(level) = args.log_level {
        logging_prefs.min_log_level = level;
    }
    let log = match logging::init(&logging_prefs) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("error[{}]: {}", e.error_code(), e);
            return ExitCode::from(EXIT_HARNESS_ERROR);
        }
    };

    let outcome = run(&args, &file, &log);
    log.close();

    match outcome {
        Ok(comparison) => {
            print!("{}", comparison.report(args.silent));
            let _ = io::stdout().flush();
            if comparison.is_match() {
                ExitCode::from(EXIT_MATCH)
            } else {
                ExitCode::from(EXIT_MISMATCH)
            }
        }
        Err(DiffError::File(e)) => {
            eprintln!("{}", e);
            ExitCode::from(EXIT_HARNESS_ERROR)
        }
        Err(e) => {
            eprintln!("error[{}]: {}", e.error_code(), e);
            ExitCode::from(EXIT_HARNESS_ERROR)
        }
    }
}

fn run(args: &Args, file: &Path, log: &LoggingService) -> Result<Comparison, DiffError> {
    let mut lexical = LexicalPreferences::default();
    if args.lenient {
        lexical.end_of_input = EndOfInputPolicy::Lenient;
    }

    let mut reference_prefs = ReferencePreferences::default();
    if let Some(program) = &args.reference {
        reference_prefs = reference_prefs.with_program(program.clone());
    }
    if let Some(seconds) = args.timeout {
        reference_prefs = reference_prefs.with_timeout_seconds(seconds);
    }
    let reference = PythonTokenize::new(&reference_prefs);

    let file_result = FileProcessor::new(log.clone()).process_file(&file.to_string_lossy())?;
    let tokenizer = Tokenizer::with_preferences(&file_result.lines, &lexical).map_err(|e| {
        log_error!(log, e.error_code(), &e.to_string(), "file" => file.display());
        e
    })?;

    if args.show_tokens {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        // A closed stdout only loses the listing; the comparison still runs
        let _ = writeln!(out, "tokens:").and_then(|_| tokenizer.print(&mut out));
    }

    compare_tokenizer(file, &tokenizer, &reference, log)
}
