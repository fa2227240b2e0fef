//! Ordered pattern table
//!
//! Entries are evaluated strictly top to bottom against the unconsumed
//! remainder of a line and the first match wins. Order is precedence:
//! brackets, leading-dot numbers, operators (longest first), triple-quoted
//! strings (same-line closure before multi-line opening), quoted strings,
//! comments, numbers, identifiers. Every pattern is anchored and matches one or more
//! characters.

use super::error::LexerError;
use super::operators::{OperatorSet, CLOSE_BRACKETS, OPEN_BRACKETS};
use crate::tokens::TokenKind;
use regex::Regex;

/// Optional string prefix (`r`, `b`, `u`, `f` and their two-letter combinations)
const STRING_PREFIX: &str = "(?:[rRbBuUfF]{1,2})?";

const COMMENT_PATTERN: &str = r"^#.*";
const NUMBER_PATTERN: &str = r"^-?(?:0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|[0-9][0-9_]*(?:\.[0-9_]*)?(?:[eE][+-]?[0-9_]+)?[jJ]?)";
/// `.5`, `.5e3`, `.5j`; must precede the `.` operator
const DOT_NUMBER_PATTERN: &str = r"^\.[0-9][0-9_]*(?:[eE][+-]?[0-9_]+)?[jJ]?";
const NAME_PATTERN: &str = r"^\w+";

/// Triple-quote delimiter flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripleQuote {
    Double,
    Single,
}

impl TripleQuote {
    pub fn delimiter(self) -> &'static str {
        match self {
            TripleQuote::Double => "\"\"\"",
            TripleQuote::Single => "'''",
        }
    }
}

/// What the engine does with a match beyond emitting it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRole {
    /// Emit the matched text as one token
    Token,
    /// Matched an opening triple quote that does not close on this line
    OpensString(TripleQuote),
}

/// One `(kind, matcher)` row of the table
#[derive(Debug, Clone)]
pub struct PatternEntry {
    kind: TokenKind,
    role: PatternRole,
    matcher: Regex,
}

impl PatternEntry {
    fn compile(kind: TokenKind, role: PatternRole, pattern: &str) -> Result<Self, LexerError> {
        let matcher = Regex::new(pattern).map_err(|e| LexerError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            kind,
            role,
            matcher,
        })
    }

    fn literal(kind: TokenKind, text: &str) -> Result<Self, LexerError> {
        Self::compile(
            kind,
            PatternRole::Token,
            &format!("^{}", regex::escape(text)),
        )
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn role(&self) -> PatternRole {
        self.role
    }

    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }
}

/// Result of classifying the head of a remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub role: PatternRole,
}

/// Ordered, first-match-wins classifier
#[derive(Debug, Clone)]
pub struct PatternTable {
    entries: Vec<PatternEntry>,
}

impl PatternTable {
    /// Build the table around the given operator set
    pub fn new(operators: &OperatorSet) -> Result<Self, LexerError> {
        let mut entries = Vec::new();

        for bracket in OPEN_BRACKETS.iter().zip(CLOSE_BRACKETS.iter()) {
            entries.push(PatternEntry::literal(TokenKind::Op, bracket.0)?);
            entries.push(PatternEntry::literal(TokenKind::Op, bracket.1)?);
        }

        entries.push(PatternEntry::compile(
            TokenKind::Number,
            PatternRole::Token,
            DOT_NUMBER_PATTERN,
        )?);

        for op in operators.match_order() {
            entries.push(PatternEntry::literal(TokenKind::Op, op)?);
        }

        for quote in [TripleQuote::Double, TripleQuote::Single] {
            let delim = regex::escape(quote.delimiter());
            entries.push(PatternEntry::compile(
                TokenKind::String,
                PatternRole::Token,
                &format!(r"^{STRING_PREFIX}{delim}(?:\\.|[^\\])*?{delim}"),
            )?);
            entries.push(PatternEntry::compile(
                TokenKind::String,
                PatternRole::OpensString(quote),
                &format!(r"^{STRING_PREFIX}{delim}.*"),
            )?);
        }

        entries.push(PatternEntry::compile(
            TokenKind::String,
            PatternRole::Token,
            &format!(r#"^{STRING_PREFIX}"(?:[^"\\]|\\.)*""#),
        )?);
        entries.push(PatternEntry::compile(
            TokenKind::String,
            PatternRole::Token,
            &format!(r"^{STRING_PREFIX}'(?:[^'\\]|\\.)*'"),
        )?);

        entries.push(PatternEntry::compile(
            TokenKind::Comment,
            PatternRole::Token,
            COMMENT_PATTERN,
        )?);
        entries.push(PatternEntry::compile(
            TokenKind::Number,
            PatternRole::Token,
            NUMBER_PATTERN,
        )?);
        entries.push(PatternEntry::compile(
            TokenKind::Name,
            PatternRole::Token,
            NAME_PATTERN,
        )?);

        Ok(Self { entries })
    }

    /// Table over the core operator set
    pub fn standard() -> Result<Self, LexerError> {
        Self::new(&OperatorSet::core())
    }

    /// First entry matching a non-empty prefix of `remainder`
    pub fn classify<'a>(&self, remainder: &'a str) -> Option<Classified<'a>> {
        self.entries.iter().find_map(|entry| {
            entry
                .matcher
                .find(remainder)
                .filter(|m| m.start() == 0 && !m.as_str().is_empty())
                .map(|m| Classified {
                    kind: entry.kind,
                    text: m.as_str(),
                    role: entry.role,
                })
        })
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Byte offset of the first unescaped closing delimiter in `text`
pub fn find_closing_delimiter(text: &str, quote: TripleQuote) -> Option<usize> {
    let delimiter = quote.delimiter();
    let mut from = 0;
    while let Some(found) = text[from..].find(delimiter) {
        let offset = from + found;
        let backslashes = text[..offset]
            .bytes()
            .rev()
            .take_while(|b| *b == b'\\')
            .count();
        if backslashes % 2 == 0 {
            return Some(offset);
        }
        // Delimiters are ASCII so the next byte is a char boundary
        from = offset + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PatternTable {
        PatternTable::standard().unwrap()
    }

    fn classify(input: &str) -> Option<(TokenKind, &str, PatternRole)> {
        table()
            .classify(input)
            .map(|c| (c.kind, c.text, c.role))
            .map(|(k, t, r)| (k, &input[..t.len()], r))
    }

    #[test]
    fn test_first_match_wins_for_operators() {
        assert_eq!(classify("== 1").map(|c| c.1), Some("=="));
        assert_eq!(classify("= 1").map(|c| c.1), Some("="));
        assert_eq!(classify("**2").map(|c| c.1), Some("**"));
        assert_eq!(classify("//2").map(|c| c.1), Some("//"));
    }

    #[test]
    fn test_same_line_triple_quote_is_one_string() {
        let (kind, text, role) = classify(r#""""abc""" + x"#).unwrap();
        assert_eq!(kind, TokenKind::String);
        assert_eq!(text, r#""""abc""""#);
        assert_eq!(role, PatternRole::Token);
    }

    #[test]
    fn test_unclosed_triple_quote_opens_string() {
        let (kind, text, role) = classify("'''start of doc").unwrap();
        assert_eq!(kind, TokenKind::String);
        assert_eq!(text, "'''start of doc");
        assert_eq!(role, PatternRole::OpensString(TripleQuote::Single));
    }

    #[test]
    fn test_escaped_triple_quote_does_not_close() {
        // Only `""` follows the escaped quote
        let (_, _, role) = classify(r#""""a\""""#).unwrap();
        assert_eq!(role, PatternRole::OpensString(TripleQuote::Double));

        let (_, text, role) = classify(r#""""a\"""" + 1"#).unwrap();
        assert_eq!(role, PatternRole::Token);
        assert_eq!(text, r#""""a\"""""#);

        let (_, text, role) = classify(r#""""a\"""  "#).unwrap();
        assert_eq!(role, PatternRole::OpensString(TripleQuote::Double));
        assert_eq!(text, r#""""a\"""  "#);
    }

    #[test]
    fn test_prefixed_strings() {
        assert_eq!(classify(r#"rb"\d+" x"#).map(|c| c.1), Some(r#"rb"\d+""#));
        assert_eq!(classify("f'{x}'").map(|c| c.0), Some(TokenKind::String));
        // Identifier that merely starts like a prefix
        assert_eq!(classify("rate = 1").map(|c| (c.0, c.1)), Some((TokenKind::Name, "rate")));
    }

    #[test]
    fn test_numbers_and_names() {
        assert_eq!(classify("3.14)").map(|c| (c.0, c.1)), Some((TokenKind::Number, "3.14")));
        assert_eq!(classify("0xff").map(|c| c.1), Some("0xff"));
        assert_eq!(classify("1,").map(|c| c.1), Some("1"));
        assert_eq!(classify(".5)").map(|c| (c.0, c.1)), Some((TokenKind::Number, ".5")));
        assert_eq!(classify(".5e-3j").map(|c| c.1), Some(".5e-3j"));
        assert_eq!(classify(".real").map(|c| (c.0, c.1)), Some((TokenKind::Op, ".")));
        assert_eq!(classify("_id9 ").map(|c| (c.0, c.1)), Some((TokenKind::Name, "_id9")));
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        assert_eq!(
            classify("# note (x)").map(|c| (c.0, c.1)),
            Some((TokenKind::Comment, "# note (x)"))
        );
    }

    #[test]
    fn test_unmatched_text() {
        assert!(classify("$").is_none());
        assert!(classify("\"unterminated").is_none());
        assert!(table().classify("").is_none());
    }

    #[test]
    fn test_operator_set_extends_table() {
        let core = PatternTable::standard().unwrap();
        assert!(core.classify("!= y").is_none());

        let extended = PatternTable::new(&OperatorSet::core().with_operator("!=")).unwrap();
        let hit = extended.classify("!= y").unwrap();
        assert_eq!((hit.kind, hit.text), (TokenKind::Op, "!="));
    }

    #[test]
    fn test_brackets_lead_the_table() {
        let t = table();
        let leading: Vec<&str> = t.entries()[..6].iter().map(|e| e.pattern()).collect();
        assert_eq!(leading, vec![r"^\(", r"^\)", r"^\[", r"^\]", r"^\{", r"^\}"]);
        assert_eq!(t.entries()[6].kind(), TokenKind::Number);
        assert_eq!(t.entries()[7].kind(), TokenKind::Op);
    }

    #[test]
    fn test_find_closing_delimiter() {
        assert_eq!(find_closing_delimiter(r#"end""" + 1"#, TripleQuote::Double), Some(3));
        assert_eq!(find_closing_delimiter(r#"a\""" b""""#, TripleQuote::Double), Some(7));
        assert_eq!(find_closing_delimiter(r#"a\\""""#, TripleQuote::Double), Some(3));
        assert_eq!(find_closing_delimiter(r#"\""""#, TripleQuote::Double), None);
        assert_eq!(find_closing_delimiter(r#"\"""""#, TripleQuote::Double), Some(2));
        assert_eq!(find_closing_delimiter("no close", TripleQuote::Single), None);
    }
}
