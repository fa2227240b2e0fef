//! Lexical analysis errors
//!
//! Every variant aborts the whole tokenization pass; there is no partial
//! result. Positions use the engine's coordinates (1-based lines, 0-based
//! character columns).

/// Fatal tokenization outcomes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("No pattern matches {text:?} at line {line}, column {column}")]
    PatternMismatch {
        line: usize,
        column: usize,
        text: String,
    },

    #[error("unindent does not match any outer indentation level (line {line}, width {width})")]
    IndentationError { line: usize, width: usize },

    #[error("Unmatched closing bracket '{bracket}' at line {line}, column {column}")]
    BracketUnderflow {
        line: usize,
        column: usize,
        bracket: char,
    },

    #[error("EOF in multi-line string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("EOF in multi-line statement: {depth} unclosed bracket(s) after line {line}")]
    UnclosedBracket { depth: usize, line: usize },

    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl LexerError {
    /// Source line the error refers to, when it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            LexerError::PatternMismatch { line, .. }
            | LexerError::IndentationError { line, .. }
            | LexerError::BracketUnderflow { line, .. }
            | LexerError::UnterminatedString { line, .. }
            | LexerError::UnclosedBracket { line, .. } => Some(*line),
            LexerError::InvalidPattern { .. } => None,
        }
    }

    /// Whether the error was raised by the end-of-input policy
    pub fn is_end_of_input(&self) -> bool {
        matches!(
            self,
            LexerError::UnterminatedString { .. } | LexerError::UnclosedBracket { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_lines() {
        let err = LexerError::IndentationError { line: 4, width: 2 };
        assert_eq!(err.line(), Some(4));
        assert!(!err.is_end_of_input());
        assert!(err
            .to_string()
            .starts_with("unindent does not match any outer indentation level"));

        let eof = LexerError::UnclosedBracket { depth: 2, line: 9 };
        assert!(eof.is_end_of_input());
    }
}
