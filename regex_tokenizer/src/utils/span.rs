//! Source location tracking for tokens
//!
//! Positions are `(line, column)` pairs in the coordinate system used by the
//! reference tokenizer: lines are 1-based, columns are 0-based character
//! counts. Both fields are signed so that the retrieval sentinel can carry
//! `(-1, -1)`.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text.
///
/// Ordering is lexicographic on `(line, column)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Line number (1-based; 0 for the encoding marker)
    pub line: i64,
    /// Column number (0-based, in characters)
    pub column: i64,
}

impl Position {
    /// Position used by the out-of-range retrieval sentinel
    pub const SENTINEL: Position = Position {
        line: -1,
        column: -1,
    };

    /// Create a new position
    pub fn new(line: i64, column: i64) -> Self {
        Self { line, column }
    }

    /// Create a position from engine-side counters
    pub fn at(line: usize, column: usize) -> Self {
        Self {
            line: line as i64,
            column: column as i64,
        }
    }

    /// The origin `(0, 0)`, where the encoding marker lives
    pub fn origin() -> Self {
        Self::default()
    }

    /// Shift the column by `n` characters on the same line
    pub fn advance_columns(self, n: usize) -> Self {
        Self {
            line: self.line,
            column: self.column + n as i64,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    /// Create a new span
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    /// Get the start position of this span
    pub fn start(&self) -> Position {
        self.start
    }

    /// Get the end position of this span
    pub fn end(&self) -> Position {
        self.end
    }

    /// Zero-width span at a single position
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Span covering `width` characters starting at `pos`
    pub fn columns(pos: Position, width: usize) -> Self {
        Self {
            start: pos,
            end: pos.advance_columns(width),
        }
    }

    /// Span used by the retrieval sentinel
    pub fn sentinel() -> Self {
        Self::point(Position::SENTINEL)
    }

    /// Whether start does not come after end
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    /// Whether the span starts and ends on the same line
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering_is_lexicographic() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 0) < Position::new(2, 1));
        assert!(Position::SENTINEL < Position::origin());
    }

    #[test]
    fn test_span_display_matches_reference_format() {
        let span = Span::columns(Position::at(3, 4), 2);
        assert_eq!(span.to_string(), "3,4-3,6");
        assert_eq!(Span::sentinel().to_string(), "-1,-1--1,-1");
    }

    #[test]
    fn test_multi_line_span() {
        let span = Span::new(Position::at(1, 4), Position::at(3, 3));
        assert!(span.is_ordered());
        assert!(!span.is_single_line());
    }
}
