//! Differential harness: our token stream against `python -m tokenize`

pub mod compare;
pub mod config;
pub mod executor;
pub mod reference;

pub use compare::{compare_tokens, Comparison, Mismatch, Report};
pub use config::ReferencePreferences;
pub use executor::{CommandError, CommandOutput, ReferenceExecutor};
pub use reference::{parse_reference_output, PythonTokenize, ReferenceTokenizer};

use regex_tokenizer::logging::{codes, Code, ErrorCode, LoggingService};
use regex_tokenizer::{
    log_error, log_success, FileProcessor, FileProcessorError, LexerError, LexicalPreferences,
    TokenStream, Tokenizer,
};
use std::path::Path;

/// Harness errors
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error(transparent)]
    File(#[from] FileProcessorError),

    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error("Reference tokenizer could not run: {0}")]
    Command(#[from] CommandError),

    #[error("Reference tokenizer exited with status {exit_code}: {stderr}")]
    ReferenceFailed { exit_code: i32, stderr: String },

    #[error("Malformed reference output on line {line_number}: {line:?}")]
    MalformedReferenceLine { line_number: usize, line: String },
}

impl ErrorCode for DiffError {
    fn error_code(&self) -> Code {
        match self {
            DiffError::File(e) => e.error_code(),
            DiffError::Lexer(e) => e.error_code(),
            DiffError::Command(e) => match e {
                CommandError::ProgramNotFound { .. } => codes::differential::REFERENCE_NOT_FOUND,
                CommandError::Timeout { .. } => codes::differential::REFERENCE_TIMEOUT,
                CommandError::PermissionDenied { .. } | CommandError::SecurityViolation { .. } => {
                    codes::differential::REFERENCE_PERMISSION_DENIED
                }
                CommandError::ExecutionFailed { .. } | CommandError::OutputTooLarge { .. } => {
                    codes::differential::REFERENCE_FAILED
                }
            },
            DiffError::ReferenceFailed { .. } => codes::differential::REFERENCE_FAILED,
            DiffError::MalformedReferenceLine { .. } => {
                codes::differential::MALFORMED_REFERENCE_OUTPUT
            }
        }
    }
}

/// Read, tokenize and compare one file against the reference
pub fn compare_file(
    path: &Path,
    reference: &dyn ReferenceTokenizer,
    preferences: &LexicalPreferences,
    log: &LoggingService,
) -> Result<Comparison, DiffError> {
    let file_result = FileProcessor::new(log.clone()).process_file(&path.to_string_lossy())?;
    let tokenizer = Tokenizer::with_preferences(&file_result.lines, preferences).map_err(|e| {
        log_error!(log, e.error_code(), &e.to_string(), "file" => path.display());
        e
    })?;
    compare_tokenizer(path, &tokenizer, reference, log)
}

/// Compare an already tokenized file against the reference
pub fn compare_tokenizer(
    path: &Path,
    tokenizer: &Tokenizer,
    reference: &dyn ReferenceTokenizer,
    log: &LoggingService,
) -> Result<Comparison, DiffError> {
    let theirs = reference
        .tokenize_file(path)
        .and_then(|output| parse_reference_output(&output))
        .map_err(|e| {
            log_error!(log, e.error_code(), &e.to_string(),
                "file" => path.display(),
                "reference" => reference.name());
            e
        })?;

    let comparison =
        compare_tokens(tokenizer.stream(), &TokenStream::new(theirs)).with_reference(reference.name());

    match &comparison.mismatch {
        None => {
            log_success!(log, codes::success::REFERENCE_MATCH, "Tokens match reference",
                "file" => path.display(),
                "reference" => reference.name(),
                "tokens" => comparison.ours_len);
        }
        Some(mismatch) => {
            log_error!(log, codes::differential::TOKEN_MISMATCH, "Tokens differ from reference",
                "file" => path.display(),
                "reference" => reference.name(),
                "index" => mismatch.index,
                "line" => mismatch.line,
                "ours_len" => comparison.ours_len,
                "theirs_len" => comparison.theirs_len);
        }
    }

    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use regex_tokenizer::logging::{memory_service, LogLevel};
    use std::fs;
    use tempfile::tempdir;

    /// Serves canned output instead of running a program
    struct FakeReference {
        output: Result<String, (i32, String)>,
    }

    impl ReferenceTokenizer for FakeReference {
        fn name(&self) -> &str {
            "fake tokenize"
        }

        fn tokenize_file(&self, _path: &Path) -> Result<String, DiffError> {
            self.output
                .clone()
                .map_err(|(exit_code, stderr)| DiffError::ReferenceFailed { exit_code, stderr })
        }
    }

    const ASSIGNMENT_ROWS: &str = "\
0,0-0,0:            ENCODING       'utf-8'
1,0-1,1:            NAME           'x'
1,2-1,3:            OP             '='
1,4-1,5:            NUMBER         '1'
1,5-1,6:            NEWLINE        '\\n'
2,0-2,0:            ENDMARKER      ''
";

    fn write_source(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.py");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_compare_file_match() {
        let (_dir, path) = write_source("x = 1\n");
        let reference = FakeReference {
            output: Ok(ASSIGNMENT_ROWS.to_string()),
        };
        let (log, memory) = memory_service(LogLevel::Info);

        let comparison =
            compare_file(&path, &reference, &LexicalPreferences::default(), &log).unwrap();
        assert!(comparison.is_match());
        assert_eq!(comparison.render(true), "\nTokens match 'fake tokenize'\n");
        assert!(memory.has_success_with_code(codes::success::REFERENCE_MATCH));
    }

    #[test]
    fn test_compare_file_mismatch() {
        let (_dir, path) = write_source("x = 2\n");
        let reference = FakeReference {
            output: Ok(ASSIGNMENT_ROWS.to_string()),
        };
        let (log, memory) = memory_service(LogLevel::Info);

        let comparison =
            compare_file(&path, &reference, &LexicalPreferences::default(), &log).unwrap();
        let mismatch = comparison.mismatch.as_ref().unwrap();
        assert_eq!(mismatch.index, 3);
        assert_eq!(mismatch.line, 1);
        assert!(memory.has_error_with_code(codes::differential::TOKEN_MISMATCH));
    }

    #[test]
    fn test_reference_failure() {
        let (_dir, path) = write_source("x = 1\n");
        let reference = FakeReference {
            output: Err((1, "No module named tokenize".to_string())),
        };
        let (log, memory) = memory_service(LogLevel::Info);

        let result = compare_file(&path, &reference, &LexicalPreferences::default(), &log);
        assert_matches!(result, Err(DiffError::ReferenceFailed { exit_code: 1, .. }));
        assert!(memory.has_error_with_code(codes::differential::REFERENCE_FAILED));
    }

    #[test]
    fn test_malformed_reference_output() {
        let (_dir, path) = write_source("x = 1\n");
        let reference = FakeReference {
            output: Ok("not a token row\n".to_string()),
        };
        let (log, _memory) = memory_service(LogLevel::Info);

        let error = compare_file(&path, &reference, &LexicalPreferences::default(), &log)
            .unwrap_err();
        assert_eq!(error.error_code(), codes::differential::MALFORMED_REFERENCE_OUTPUT);
    }

    #[test]
    fn test_missing_file_and_lexer_errors_keep_their_codes() {
        let dir = tempdir().unwrap();
        let reference = FakeReference {
            output: Ok(String::new()),
        };
        let log = LoggingService::disabled();

        let missing = compare_file(
            &dir.path().join("absent.py"),
            &reference,
            &LexicalPreferences::default(),
            &log,
        )
        .unwrap_err();
        assert_eq!(missing.error_code(), codes::file_processing::FILE_NOT_FOUND);

        let (_dir, path) = write_source("x = $\n");
        let lexer = compare_file(&path, &reference, &LexicalPreferences::default(), &log)
            .unwrap_err();
        assert_matches!(lexer, DiffError::Lexer(LexerError::PatternMismatch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_python_tokenize_with_stub_script() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("fake_tokenize.sh");
        let rows = dir.path().join("rows.txt");
        fs::write(&rows, ASSIGNMENT_ROWS).unwrap();
        fs::write(&script, format!("cat '{}'\n", rows.display())).unwrap();
        let (_src_dir, path) = write_source("x = 1\n");

        let prefs = ReferencePreferences::default().with_program("sh");
        let reference =
            PythonTokenize::new(&prefs).with_launch_args([script.to_string_lossy().to_string()]);

        let comparison =
            compare_file(&path, &reference, &LexicalPreferences::default(), &LoggingService::disabled())
                .unwrap();
        assert!(comparison.is_match(), "{}", comparison.render(false));
    }

    #[cfg(unix)]
    #[test]
    fn test_python_tokenize_nonzero_exit() {
        let prefs = ReferencePreferences::default().with_program("sh");
        let reference = PythonTokenize::new(&prefs)
            .with_launch_args(["-c", "echo broken >&2; exit 4", "sh"]);

        assert_matches!(
            reference.tokenize_file(Path::new("ignored.py")),
            Err(DiffError::ReferenceFailed { exit_code: 4, ref stderr }) if stderr == "broken"
        );
    }
}
