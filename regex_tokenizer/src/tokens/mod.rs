//! Token system for the tokenizer
//!
//! - **[`Token`]** - immutable `(kind, text, span)` value; equality ignores the span
//! - **[`TokenKind`]** - the reference tokenizer's token categories
//! - **[`TokenStream`]** - finished sequence with sequential and random access

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenKind};
pub use token_stream::{validation, TokenStream, TokenStreamError};
