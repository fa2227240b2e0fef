//! Ordered-pattern tokenizer for Python-like source
//!
//! Lines go in, a finished [`TokenStream`] comes out. Indentation becomes
//! `INDENT`/`DEDENT` tokens, open brackets suppress logical line ends, and
//! triple-quoted strings may span lines.

pub mod config;
#[macro_use]
pub mod logging;
pub mod file_processor;
pub mod lexical;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use config::runtime::{LexicalPreferences, RuntimeConfig};
pub use file_processor::{FileProcessingResult, FileProcessor, FileProcessorError};
pub use lexical::{
    tokenize_file_result, tokenize_lines, EndOfInputPolicy, LexerError, LexicalMetrics,
    OperatorSet, Tokenizer,
};
pub use logging::{ErrorCode, LoggingService};
pub use tokens::{Token, TokenKind, TokenStream, TokenStreamError};
pub use utils::{Position, Span};
