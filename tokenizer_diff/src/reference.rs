//! Reference tokenizer: running it and parsing its printed rows
//!
//! Rows look like `1,0-1,5:            NAME           'print'`: a position
//! range, the kind name, and the Python `repr` of the token text.

use crate::config::ReferencePreferences;
use crate::executor::ReferenceExecutor;
use crate::DiffError;
use regex_tokenizer::{Position, Token, TokenKind};
use std::path::Path;

/// Anything that prints `python -m tokenize` style rows for a file
pub trait ReferenceTokenizer {
    /// Label used in reports
    fn name(&self) -> &str;

    /// Raw printed output for `path`
    fn tokenize_file(&self, path: &Path) -> Result<String, DiffError>;
}

/// `<program> -m tokenize <file>` run through a [`ReferenceExecutor`]
#[derive(Debug, Clone)]
pub struct PythonTokenize {
    program: String,
    launch_args: Vec<String>,
    executor: ReferenceExecutor,
}

impl PythonTokenize {
    pub fn new(preferences: &ReferencePreferences) -> Self {
        let mut executor =
            ReferenceExecutor::new(preferences.timeout(), preferences.max_output_bytes);
        executor.allow_program(preferences.program.clone());
        Self {
            program: preferences.program.clone(),
            launch_args: vec!["-m".to_string(), "tokenize".to_string()],
            executor,
        }
    }

    /// Replace the arguments placed before the file path
    pub fn with_launch_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.launch_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for PythonTokenize {
    fn default() -> Self {
        Self::new(&ReferencePreferences::default())
    }
}

impl ReferenceTokenizer for PythonTokenize {
    fn name(&self) -> &str {
        "python -m tokenize"
    }

    fn tokenize_file(&self, path: &Path) -> Result<String, DiffError> {
        let file = path.to_string_lossy();
        let mut args: Vec<&str> = self.launch_args.iter().map(String::as_str).collect();
        args.push(file.as_ref());

        let output = self.executor.execute(&self.program, &args, None)?;
        if !output.success() {
            return Err(DiffError::ReferenceFailed {
                exit_code: output.exit_code,
                stderr: output.stderr.trim_end().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// Parse every non-blank row of reference output into tokens
pub fn parse_reference_output(output: &str) -> Result<Vec<Token>, DiffError> {
    output
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_row(line).ok_or_else(|| DiffError::MalformedReferenceLine {
                line_number: index + 1,
                line: line.to_string(),
            })
        })
        .collect()
}

fn parse_row(line: &str) -> Option<Token> {
    let (range, rest) = line.split_once(':')?;
    let (start, end) = range.trim().split_once('-')?;
    let start = parse_position(start)?;
    let end = parse_position(end)?;

    let rest = rest.trim_start();
    let kind_end = rest.find(char::is_whitespace)?;
    let (kind_name, value) = rest.split_at(kind_end);
    let text = unescape_repr(value.trim())?;

    // Kinds this engine never produces (ERRORTOKEN, FSTRING_*) compare as unknown
    let kind = TokenKind::from_name(kind_name).unwrap_or(TokenKind::Unknown);
    Some(Token::new(kind, text, start, end))
}

fn parse_position(text: &str) -> Option<Position> {
    let (line, column) = text.split_once(',')?;
    Some(Position::new(
        line.trim().parse().ok()?,
        column.trim().parse().ok()?,
    ))
}

/// Undo Python's `repr` of a `str`: either quote style, common escapes,
/// `\xHH`, `\uHHHH` and `\UHHHHHHHH`
pub fn unescape_repr(repr: &str) -> Option<String> {
    let quote = repr.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    if repr.len() < 2 || !repr.ends_with(quote) {
        return None;
    }
    let body = &repr[1..repr.len() - 1];

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'x' => out.push(hex_char(&mut chars, 2)?),
            'u' => out.push(hex_char(&mut chars, 4)?),
            'U' => out.push(hex_char(&mut chars, 8)?),
            _ => return None,
        }
    }
    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    char::from_u32(u32::from_str_radix(&hex, 16).ok()?)
}
