//! Shared primitive types used by the tokenizer, the logging layer and the
//! differential harness.

pub mod span;

pub use span::{Position, Span};
