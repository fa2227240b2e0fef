//! Lexical analysis
//!
//! Turns already-split source lines into a [`TokenStream`] using an ordered
//! pattern table, an indentation stack, a bracket depth counter and a
//! multi-line string sub-state. Nothing here logs; callers report outcomes
//! through their own `LoggingService`.

pub mod error;
pub mod metrics;
pub mod operators;
pub mod patterns;
pub mod tokenizer;

use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;

pub use error::LexerError;
pub use metrics::LexicalMetrics;
pub use operators::{OperatorPreset, OperatorSet};
pub use patterns::{PatternEntry, PatternRole, PatternTable, TripleQuote};
pub use tokenizer::{EndOfInput, EndOfInputPolicy, Tokenizer, ENCODING_NAME};

/// Tokenize lines with the core operator set and strict end-of-input handling
pub fn tokenize_lines<S: AsRef<str>>(lines: &[S]) -> Result<Tokenizer, LexerError> {
    Tokenizer::new(lines)
}

/// Tokenize the lines of a processed file under runtime preferences
pub fn tokenize_file_result(
    file_result: &FileProcessingResult,
    preferences: &LexicalPreferences,
) -> Result<Tokenizer, LexerError> {
    Tokenizer::with_preferences(&file_result.lines, preferences)
}
