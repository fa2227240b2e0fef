//! Index-wise comparison of two token streams and the mismatch report

use regex_tokenizer::{Token, TokenStream};
use std::fmt;

/// Label of the default reference in reports
pub const DEFAULT_REFERENCE_LABEL: &str = "python -m tokenize";

/// First disagreement between the two streams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub index: usize,
    /// Source line of our token, or of theirs when ours ran out
    pub line: i64,
    /// One token before the mismatch (when there is one), then two from it
    pub ours: Vec<Token>,
    pub theirs: Vec<Token>,
}

impl Mismatch {
    fn at(ours: &TokenStream, theirs: &TokenStream, index: usize) -> Self {
        let ours_token = ours.at(index);
        let line = if ours_token.is_sentinel() {
            theirs.at(index).start().line
        } else {
            ours_token.start().line
        };

        Self {
            index,
            line,
            ours: surrounding(ours, index),
            theirs: surrounding(theirs, index),
        }
    }
}

fn surrounding(stream: &TokenStream, index: usize) -> Vec<Token> {
    let first = index.saturating_sub(1);
    (first..=index + 1).map(|i| stream.at(i)).collect()
}

/// Outcome of comparing our tokens with a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub reference: String,
    pub ours_len: usize,
    pub theirs_len: usize,
    pub mismatch: Option<Mismatch>,
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        self.mismatch.is_none()
    }

    pub fn with_reference(mut self, label: impl Into<String>) -> Self {
        self.reference = label.into();
        self
    }

    /// Report for this comparison; `silent` leaves out the mismatch rows
    pub fn report(&self, silent: bool) -> Report<'_> {
        Report {
            comparison: self,
            silent,
        }
    }

    pub fn render(&self, silent: bool) -> String {
        self.report(silent).to_string()
    }
}

/// Printable verdict, preceded by the mismatch rows unless silent
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    comparison: &'a Comparison,
    silent: bool,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let comparison = self.comparison;

        if let Some(mismatch) = comparison.mismatch.as_ref().filter(|_| !self.silent) {
            writeln!(f)?;
            writeln!(f, "Tokens did not match on line: {}", mismatch.line)?;
            writeln!(f, "mine:")?;
            for token in &mismatch.ours {
                writeln!(f, "{}", token)?;
            }
            writeln!(f, "theirs:")?;
            for token in &mismatch.theirs {
                writeln!(f, "{}", token)?;
            }
        }

        writeln!(f)?;
        if comparison.is_match() {
            writeln!(f, "Tokens match '{}'", comparison.reference)
        } else {
            writeln!(f, "Tokens DID NOT match '{}'", comparison.reference)
        }
    }
}

/// Compare by `(kind, text)` across the longer stream; missing entries are sentinels
pub fn compare_tokens(ours: &TokenStream, theirs: &TokenStream) -> Comparison {
    let longest = ours.len().max(theirs.len());
    let mismatch = (0..longest)
        .find(|&i| ours.at(i) != theirs.at(i))
        .map(|i| Mismatch::at(ours, theirs, i));

    Comparison {
        reference: DEFAULT_REFERENCE_LABEL.to_string(),
        ours_len: ours.len(),
        theirs_len: theirs.len(),
        mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex_tokenizer::{Position, TokenKind};

    fn token(kind: TokenKind, text: &str, line: usize, column: usize) -> Token {
        Token::new(
            kind,
            text,
            Position::at(line, column),
            Position::at(line, column + text.chars().count()),
        )
    }

    fn stream(tokens: &[Token]) -> TokenStream {
        TokenStream::new(tokens.to_vec())
    }

    fn sample() -> Vec<Token> {
        vec![
            Token::new(TokenKind::Encoding, "utf-8", Position::origin(), Position::origin()),
            token(TokenKind::Name, "x", 1, 0),
            token(TokenKind::Op, "=", 1, 2),
            token(TokenKind::Number, "1", 1, 4),
            token(TokenKind::Newline, "\n", 1, 5),
            Token::new(TokenKind::EndMarker, "", Position::at(2, 0), Position::at(2, 0)),
        ]
    }

    #[test]
    fn test_equal_streams_match() {
        let mut theirs = sample();
        // Position differences do not matter
        theirs[3] = token(TokenKind::Number, "1", 7, 9);

        let comparison = compare_tokens(&stream(&sample()), &stream(&theirs));
        assert!(comparison.is_match());
        assert_eq!(
            comparison.render(false),
            "\nTokens match 'python -m tokenize'\n"
        );
    }

    #[test]
    fn test_first_mismatch_with_context() {
        let mut theirs = sample();
        theirs[2] = token(TokenKind::Op, "==", 1, 2);

        let comparison = compare_tokens(&stream(&sample()), &stream(&theirs));
        let mismatch = comparison.mismatch.clone().unwrap();
        assert_eq!(mismatch.index, 2);
        assert_eq!(mismatch.line, 1);
        assert_eq!(mismatch.ours.len(), 3);
        assert_eq!(mismatch.ours[1].text(), "=");
        assert_eq!(mismatch.theirs[1].text(), "==");

        let report = comparison.render(false);
        assert!(report.starts_with("\nTokens did not match on line: 1\nmine:\n"));
        assert!(report.contains("\ntheirs:\n"));
        assert!(report.ends_with("\nTokens DID NOT match 'python -m tokenize'\n"));
        assert_eq!(report.lines().count(), 12);
    }

    #[test]
    fn test_mismatch_at_start_has_no_previous_row() {
        let theirs = vec![token(TokenKind::Name, "y", 1, 0)];
        let comparison = compare_tokens(&stream(&sample()), &stream(&theirs));

        let mismatch = comparison.mismatch.unwrap();
        assert_eq!(mismatch.index, 0);
        assert_eq!(mismatch.ours.len(), 2);
        assert!(mismatch.theirs[1].is_sentinel());
    }

    #[test]
    fn test_length_difference_is_a_mismatch() {
        let mut theirs = sample();
        theirs.push(token(TokenKind::Name, "extra", 3, 0));

        let comparison = compare_tokens(&stream(&sample()), &stream(&theirs));
        let mismatch = comparison.mismatch.clone().unwrap();
        assert_eq!(mismatch.index, 6);
        assert_eq!(mismatch.line, 3);
        assert!(mismatch.ours[1].is_sentinel());
        assert_eq!((comparison.ours_len, comparison.theirs_len), (6, 7));
    }

    #[test]
    fn test_silent_render() {
        let comparison = compare_tokens(&stream(&sample()), &stream(&[])).with_reference("fake");
        assert_eq!(comparison.render(true), "\nTokens DID NOT match 'fake'\n");
        assert_eq!(comparison.report(true).to_string(), comparison.render(true));
        assert!(comparison.report(false).to_string().contains("theirs:\n"));
    }
}
