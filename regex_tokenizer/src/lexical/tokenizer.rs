//! Line-oriented tokenizer engine
//!
//! A [`Tokenizer`] is built from already-split source lines and tokenizes
//! them eagerly, in one pass, inside construction. Each line is an immutable
//! `&str` scanned with an explicit byte offset and a parallel character
//! column. Per line the engine checks, in priority order:
//!
//! 1. an open multi-line string (search the raw line for its closing delimiter)
//! 2. bracket depth above zero (skip indentation, implicit continuation)
//! 3. an ordinary logical line (indentation, then the pattern table)
//!
//! Exactly one terminator follows each line's content unless the line
//! leaves a multi-line string open.

use super::error::LexerError;
use super::metrics::LexicalMetrics;
use super::operators::{is_close_bracket, is_open_bracket, OperatorSet};
use super::patterns::{find_closing_delimiter, PatternRole, PatternTable, TripleQuote};
use crate::config::runtime::LexicalPreferences;
use crate::tokens::{Token, TokenKind, TokenStream, TokenStreamError};
use crate::utils::Position;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Text of the leading `ENCODING` token
pub const ENCODING_NAME: &str = "utf-8";

const LINE_TERMINATOR: &str = "\n";

/// What to do with constructs still open when the input ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfInputPolicy {
    /// Fail with `UnterminatedString` or `UnclosedBracket`
    #[default]
    Strict,
    /// Finish the stream and report the open constructs via [`EndOfInput`]
    Lenient,
}

impl EndOfInputPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "strict" => Some(EndOfInputPolicy::Strict),
            "lenient" => Some(EndOfInputPolicy::Lenient),
            _ => None,
        }
    }
}

/// Constructs left open at end of input under [`EndOfInputPolicy::Lenient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EndOfInput {
    /// Start of a multi-line string that never closed; its text is dropped
    pub unterminated_string: Option<Position>,
    pub open_brackets: usize,
}

impl EndOfInput {
    pub fn is_clean(&self) -> bool {
        self.unterminated_string.is_none() && self.open_brackets == 0
    }
}

/// Tokenized source with sequential and random access
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stream: TokenStream,
    metrics: LexicalMetrics,
    end_of_input: EndOfInput,
}

impl Tokenizer {
    /// Tokenize with the core operator set and the strict end-of-input policy
    pub fn new<S: AsRef<str>>(lines: &[S]) -> Result<Self, LexerError> {
        let table = PatternTable::standard()?;
        Self::with_table(lines, &table, EndOfInputPolicy::Strict)
    }

    pub fn with_preferences<S: AsRef<str>>(
        lines: &[S],
        preferences: &LexicalPreferences,
    ) -> Result<Self, LexerError> {
        let operators = OperatorSet::from_preset(preferences.operator_preset)
            .with_operators(&preferences.extra_operators);
        let table = PatternTable::new(&operators)?;
        Self::with_table(lines, &table, preferences.end_of_input)
    }

    pub fn with_table<S: AsRef<str>>(
        lines: &[S],
        table: &PatternTable,
        policy: EndOfInputPolicy,
    ) -> Result<Self, LexerError> {
        let mut engine = Engine::new(table);
        engine.emit(Token::new(
            TokenKind::Encoding,
            ENCODING_NAME,
            Position::origin(),
            Position::origin(),
        ));

        for (index, line) in lines.iter().enumerate() {
            engine.process_line(index + 1, line.as_ref())?;
        }

        let end_of_input = engine.finish(lines.len(), policy)?;

        Ok(Self {
            stream: TokenStream::new(engine.tokens),
            metrics: engine.metrics,
            end_of_input,
        })
    }

    /// Token at the cursor; advances the cursor
    pub fn next_token(&mut self) -> Result<Token, TokenStreamError> {
        self.stream.next_token()
    }

    /// Token at `index`, or the sentinel when out of range
    pub fn at(&self, index: usize) -> Token {
        self.stream.at(index)
    }

    pub fn len(&self) -> usize {
        self.stream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        self.stream.tokens()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.stream.iter()
    }

    pub fn reset(&mut self) {
        self.stream.reset()
    }

    pub fn remaining(&self) -> &[Token] {
        self.stream.remaining()
    }

    pub fn context(&self, index: usize, before: usize, after: usize) -> Vec<Token> {
        self.stream.context(index, before, after)
    }

    pub fn stream(&self) -> &TokenStream {
        &self.stream
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn end_of_input(&self) -> &EndOfInput {
        &self.end_of_input
    }

    /// Write every token as a fixed-width row, one per line
    pub fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for token in self.stream.iter() {
            writeln!(out, "{}", token)?;
        }
        Ok(())
    }

    pub fn into_stream(self) -> TokenStream {
        self.stream
    }
}

impl<'a> IntoIterator for &'a Tokenizer {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.stream.iter()
    }
}

#[derive(Debug)]
struct PendingString {
    quote: TripleQuote,
    buffer: String,
    line: usize,
    column: usize,
}

/// Where ordinary scanning starts after indentation handling
enum LineStart {
    /// Blank or comment-only line; already fully emitted
    Done,
    Scan { offset: usize, column: usize },
}

struct Engine<'t> {
    table: &'t PatternTable,
    tokens: Vec<Token>,
    indent_stack: Vec<usize>,
    bracket_depth: usize,
    string_state: Option<PendingString>,
    metrics: LexicalMetrics,
}

impl<'t> Engine<'t> {
    fn new(table: &'t PatternTable) -> Self {
        Self {
            table,
            tokens: Vec::new(),
            indent_stack: vec![0],
            bracket_depth: 0,
            string_state: None,
            metrics: LexicalMetrics::default(),
        }
    }

    fn emit(&mut self, token: Token) {
        self.metrics.record_token(&token);
        self.tokens.push(token);
    }

    fn process_line(&mut self, line_no: usize, line: &str) -> Result<(), LexerError> {
        self.metrics.lines_processed += 1;
        let length = line.chars().count();

        let (offset, column) = if let Some(mut pending) = self.string_state.take() {
            match find_closing_delimiter(line, pending.quote) {
                Some(found) => {
                    let end = found + pending.quote.delimiter().len();
                    pending.buffer.push_str(&line[..end]);
                    let column = line[..end].chars().count();
                    self.metrics.multiline_strings += 1;
                    self.emit(Token::new(
                        TokenKind::String,
                        pending.buffer,
                        Position::at(pending.line, pending.column),
                        Position::at(line_no, column),
                    ));
                    (end, column)
                }
                None => {
                    pending.buffer.push_str(line);
                    pending.buffer.push('\n');
                    self.string_state = Some(pending);
                    return Ok(());
                }
            }
        } else if self.bracket_depth > 0 {
            (0, 0)
        } else {
            match self.indentation(line_no, line, length)? {
                LineStart::Done => return Ok(()),
                LineStart::Scan { offset, column } => (offset, column),
            }
        };

        self.scan(line_no, line, offset, column)?;
        self.terminate(line_no, length);
        Ok(())
    }

    fn indentation(
        &mut self,
        line_no: usize,
        line: &str,
        length: usize,
    ) -> Result<LineStart, LexerError> {
        let indent_bytes = line
            .bytes()
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count();
        let width = indent_bytes;
        let rest = &line[indent_bytes..];

        if rest.trim_start_matches(is_inline_space).is_empty() {
            self.emit_terminator(TokenKind::Nl, line_no, length);
            return Ok(LineStart::Done);
        }

        if rest.starts_with('#') {
            self.emit(Token::new(
                TokenKind::Comment,
                rest,
                Position::at(line_no, width),
                Position::at(line_no, length),
            ));
            self.emit_terminator(TokenKind::Nl, line_no, length);
            return Ok(LineStart::Done);
        }

        let top = self.top();
        if width > top {
            self.indent_stack.push(width);
            self.metrics.record_indent_depth(self.indent_stack.len() - 1);
            self.emit(Token::new(
                TokenKind::Indent,
                &line[..indent_bytes],
                Position::at(line_no, 0),
                Position::at(line_no, width),
            ));
        } else if width < top {
            while self.top() > width {
                self.indent_stack.pop();
                self.emit(Token::new(
                    TokenKind::Dedent,
                    "",
                    Position::at(line_no, width),
                    Position::at(line_no, width),
                ));
            }
            if self.top() != width {
                return Err(LexerError::IndentationError {
                    line: line_no,
                    width,
                });
            }
        }

        Ok(LineStart::Scan {
            offset: indent_bytes,
            column: width,
        })
    }

    fn scan(
        &mut self,
        line_no: usize,
        line: &str,
        mut offset: usize,
        mut column: usize,
    ) -> Result<(), LexerError> {
        let table = self.table;
        loop {
            let skipped = line[offset..]
                .chars()
                .take_while(|c| is_inline_space(*c))
                .count();
            // Inline whitespace is single-byte
            offset += skipped;
            column += skipped;

            if offset >= line.len() {
                return Ok(());
            }

            let remainder = &line[offset..];
            let classified =
                table
                    .classify(remainder)
                    .ok_or_else(|| LexerError::PatternMismatch {
                        line: line_no,
                        column,
                        text: remainder.to_string(),
                    })?;

            let width = classified.text.chars().count();
            match classified.role {
                PatternRole::Token => {
                    self.track_bracket(classified.kind, classified.text, line_no, column)?;
                    self.emit(Token::new(
                        classified.kind,
                        classified.text,
                        Position::at(line_no, column),
                        Position::at(line_no, column + width),
                    ));
                }
                PatternRole::OpensString(quote) => {
                    let mut buffer = String::with_capacity(classified.text.len() + 1);
                    buffer.push_str(classified.text);
                    buffer.push('\n');
                    self.string_state = Some(PendingString {
                        quote,
                        buffer,
                        line: line_no,
                        column,
                    });
                }
            }

            offset += classified.text.len();
            column += width;
        }
    }

    fn track_bracket(
        &mut self,
        kind: TokenKind,
        text: &str,
        line_no: usize,
        column: usize,
    ) -> Result<(), LexerError> {
        if kind != TokenKind::Op {
            return Ok(());
        }
        if is_open_bracket(text) {
            self.bracket_depth += 1;
            self.metrics.record_bracket_depth(self.bracket_depth);
        } else if is_close_bracket(text) {
            if self.bracket_depth == 0 {
                return Err(LexerError::BracketUnderflow {
                    line: line_no,
                    column,
                    bracket: text.chars().next().unwrap_or(')'),
                });
            }
            self.bracket_depth -= 1;
        }
        Ok(())
    }

    fn terminate(&mut self, line_no: usize, length: usize) {
        if self.string_state.is_some() {
            return;
        }
        let kind = if self.bracket_depth > 0 {
            TokenKind::Nl
        } else {
            TokenKind::Newline
        };
        self.emit_terminator(kind, line_no, length);
    }

    fn emit_terminator(&mut self, kind: TokenKind, line_no: usize, length: usize) {
        self.emit(Token::new(
            kind,
            LINE_TERMINATOR,
            Position::at(line_no, length),
            Position::at(line_no, length + 1),
        ));
    }

    fn finish(
        &mut self,
        line_count: usize,
        policy: EndOfInputPolicy,
    ) -> Result<EndOfInput, LexerError> {
        let mut outcome = EndOfInput {
            unterminated_string: None,
            open_brackets: self.bracket_depth,
        };

        if let Some(pending) = self.string_state.take() {
            if policy == EndOfInputPolicy::Strict {
                return Err(LexerError::UnterminatedString {
                    line: pending.line,
                    column: pending.column,
                });
            }
            outcome.unterminated_string = Some(Position::at(pending.line, pending.column));
        }

        if self.bracket_depth > 0 && policy == EndOfInputPolicy::Strict {
            return Err(LexerError::UnclosedBracket {
                depth: self.bracket_depth,
                line: line_count,
            });
        }

        let end = Position::at(line_count + 1, 0);
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.emit(Token::new(TokenKind::Dedent, "", end, end));
        }
        self.emit(Token::new(TokenKind::EndMarker, "", end, end));

        Ok(outcome)
    }

    fn top(&self) -> usize {
        self.indent_stack.last().copied().unwrap_or(0)
    }
}

fn is_inline_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}
