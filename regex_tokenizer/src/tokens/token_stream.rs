//! Read-only token sequence with a sequential retrieval cursor
//!
//! The stream never changes after construction. The only mutable state is
//! the cursor used by [`TokenStream::next_token`]; random access through
//! [`TokenStream::at`] is independent of it and never fails.

use crate::tokens::token::Token;

/// Token stream retrieval errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenStreamError {
    #[error("next_token() with no tokens remaining (stream length {len})")]
    CursorExhausted { len: usize },
}

/// Finished token sequence with a retrieval cursor
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Return the token at the cursor and advance past it
    pub fn next_token(&mut self) -> Result<Token, TokenStreamError> {
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.cursor += 1;
                Ok(token.clone())
            }
            None => Err(TokenStreamError::CursorExhausted {
                len: self.tokens.len(),
            }),
        }
    }

    /// Random access; out-of-range indices yield [`Token::sentinel`]
    pub fn at(&self, index: usize) -> Token {
        self.tokens
            .get(index)
            .cloned()
            .unwrap_or_else(Token::sentinel)
    }

    /// Signed variant of [`TokenStream::at`] so callers can probe `i - 1`
    pub fn at_offset(&self, index: isize) -> Token {
        if index < 0 {
            Token::sentinel()
        } else {
            self.at(index as usize)
        }
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.tokens.len().saturating_sub(self.cursor)
    }

    /// Tokens not yet returned by `next_token`
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.cursor.min(self.tokens.len())..]
    }

    /// Rewind the cursor to the first token
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Window of `before` tokens ahead of `index` through `after` tokens past it.
    ///
    /// Positions outside the stream are filled with the sentinel so the
    /// window always has `before + 1 + after` entries.
    pub fn context(&self, index: usize, before: usize, after: usize) -> Vec<Token> {
        let first = index as isize - before as isize;
        let last = index as isize + after as isize;
        (first..=last).map(|i| self.at_offset(i)).collect()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Structural checks over finished token sequences
pub mod validation {
    use super::*;

    /// Every token must start no later than it ends
    pub fn validate_span_order(tokens: &[Token]) -> Result<(), String> {
        for (i, token) in tokens.iter().enumerate() {
            if !token.span().is_ordered() {
                return Err(format!(
                    "Token {} ({}) starts after it ends: {}",
                    i,
                    token.kind(),
                    token.span()
                ));
            }
        }
        Ok(())
    }

    /// Token starts must never move backwards through the stream
    pub fn validate_monotonic_starts(tokens: &[Token]) -> Result<(), String> {
        for (i, pair) in tokens.windows(2).enumerate() {
            if pair[1].start() < pair[0].start() {
                return Err(format!(
                    "Token {} starts at {} before token {} at {}",
                    i + 1,
                    pair[1].start(),
                    i,
                    pair[0].start()
                ));
            }
        }
        Ok(())
    }
}
