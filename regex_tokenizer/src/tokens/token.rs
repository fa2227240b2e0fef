//! Token value type produced by the tokenizer engine
//!
//! A token is a kind, its literal source text and a span. Equality and
//! hashing look only at `(kind, text)` so streams from different producers
//! can be compared even when their position bookkeeping differs.
use crate::utils::{Position, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Token categories emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// Leading marker naming the assumed source encoding
    Encoding,
    Name,
    Number,
    String,
    Comment,
    Op,
    Indent,
    Dedent,
    /// End of a logical line
    Newline,
    /// End of a line with no logical content
    Nl,
    #[serde(rename = "ENDMARKER")]
    EndMarker,
    /// Kind of the out-of-range retrieval sentinel; never emitted
    #[serde(rename = "unknown")]
    Unknown,
}

impl TokenKind {
    /// Every kind the engine can emit, in declaration order
    pub const EMITTED: [TokenKind; 11] = [
        TokenKind::Encoding,
        TokenKind::Name,
        TokenKind::Number,
        TokenKind::String,
        TokenKind::Comment,
        TokenKind::Op,
        TokenKind::Indent,
        TokenKind::Dedent,
        TokenKind::Newline,
        TokenKind::Nl,
        TokenKind::EndMarker,
    ];

    /// Name as printed by the reference tokenizer
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Encoding => "ENCODING",
            TokenKind::Name => "NAME",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Comment => "COMMENT",
            TokenKind::Op => "OP",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Nl => "NL",
            TokenKind::EndMarker => "ENDMARKER",
            TokenKind::Unknown => "unknown",
        }
    }

    /// Parse a printed kind name; names this engine never emits map to `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ENCODING" => Some(TokenKind::Encoding),
            "NAME" => Some(TokenKind::Name),
            "NUMBER" => Some(TokenKind::Number),
            "STRING" => Some(TokenKind::String),
            "COMMENT" => Some(TokenKind::Comment),
            "OP" => Some(TokenKind::Op),
            "INDENT" => Some(TokenKind::Indent),
            "DEDENT" => Some(TokenKind::Dedent),
            "NEWLINE" => Some(TokenKind::Newline),
            "NL" => Some(TokenKind::Nl),
            "ENDMARKER" => Some(TokenKind::EndMarker),
            "unknown" => Some(TokenKind::Unknown),
            _ => None,
        }
    }

    /// Whether this kind closes a physical line
    pub fn is_line_terminator(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Nl)
    }

    /// Whether this kind is synthesized rather than matched from source text
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self,
            TokenKind::Encoding
                | TokenKind::Indent
                | TokenKind::Dedent
                | TokenKind::Newline
                | TokenKind::Nl
                | TokenKind::EndMarker
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Immutable token with kind, literal text and source span
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    kind: TokenKind,
    text: String,
    span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            span: Span::new(start, end),
        }
    }

    pub fn with_span(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// The value returned for out-of-range random access
    pub fn sentinel() -> Self {
        Self {
            kind: TokenKind::Unknown,
            text: "undefined".to_string(),
            span: Span::sentinel(),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn start(&self) -> Position {
        self.span.start
    }

    pub fn end(&self) -> Position {
        self.span.end
    }

    pub fn is_sentinel(&self) -> bool {
        self.kind == TokenKind::Unknown && self.span == Span::sentinel()
    }

    /// Quote character used when rendering the text.
    ///
    /// Double quotes are used only when the text holds a single quote and no
    /// double quote; everything else is wrapped in single quotes.
    pub fn quote_char(&self) -> char {
        if self.text.contains('\'') && !self.text.contains('"') {
            '"'
        } else {
            '\''
        }
    }

    /// Text wrapped in quotes with control characters escaped
    pub fn quoted_text(&self) -> String {
        let quote = self.quote_char();
        let mut out = String::with_capacity(self.text.len() + 2);
        out.push(quote);
        for ch in self.text.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                    out.push_str(&format!("\\x{:02x}", c as u32));
                }
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }

    /// Fixed-width row: position range, kind, quoted value
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.text.hash(state);
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::sentinel()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = format!("{}:", self.span);
        write!(
            f,
            "{:<20}{:<15}{:<15}",
            range,
            self.kind.as_str(),
            self.quoted_text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn tok(kind: TokenKind, text: &str, line: usize, col: usize) -> Token {
        Token::new(
            kind,
            text,
            Position::at(line, col),
            Position::at(line, col + text.chars().count()),
        )
    }

    #[test]
    fn test_equality_ignores_position() {
        let a = tok(TokenKind::Name, "x", 1, 0);
        let b = tok(TokenKind::Name, "x", 7, 12);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_equality_distinguishes_kind_and_text() {
        assert_ne!(tok(TokenKind::Name, "x", 1, 0), tok(TokenKind::Op, "x", 1, 0));
        assert_ne!(tok(TokenKind::Name, "x", 1, 0), tok(TokenKind::Name, "y", 1, 0));
    }

    #[test]
    fn test_sentinel_shape() {
        let sentinel = Token::sentinel();
        assert_eq!(sentinel.kind().as_str(), "unknown");
        assert_eq!(sentinel.text(), "undefined");
        assert_eq!(sentinel.start(), Position::new(-1, -1));
        assert_eq!(sentinel.end(), Position::new(-1, -1));
        assert!(sentinel.is_sentinel());
    }

    #[test]
    fn test_render_fixed_width_row() {
        let row = tok(TokenKind::Name, "x", 1, 0).render();
        assert_eq!(row, format!("{:<20}{:<15}{:<15}", "1,0-1,1:", "NAME", "'x'"));
        assert_eq!(row.len(), 50);
    }

    #[test]
    fn test_quote_selection() {
        assert_eq!(tok(TokenKind::String, "'a'", 1, 0).quoted_text(), "\"'a'\"");
        assert_eq!(tok(TokenKind::String, "\"a\"", 1, 0).quoted_text(), "'\"a\"'");
        assert_eq!(
            tok(TokenKind::String, "'a\"", 1, 0).quoted_text(),
            "'\\'a\"'"
        );
    }

    #[test]
    fn test_control_characters_are_escaped() {
        let newline = Token::new(
            TokenKind::Newline,
            "\n",
            Position::at(1, 5),
            Position::at(1, 6),
        );
        assert_eq!(newline.quoted_text(), "'\\n'");
        assert!(newline.render().starts_with("1,5-1,6:"));

        let backslash = tok(TokenKind::String, "'\\t'", 1, 0);
        assert_eq!(backslash.quoted_text(), "\"'\\\\t'\"");
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in TokenKind::EMITTED {
            assert_eq!(TokenKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(TokenKind::from_name("FSTRING_START"), None);
    }

    #[test]
    fn test_kind_display_honours_width() {
        assert_eq!(format!("{:<6}|", TokenKind::Op), "OP    |");
    }
}
