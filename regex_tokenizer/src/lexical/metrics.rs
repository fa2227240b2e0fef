use crate::tokens::{Token, TokenKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters gathered during a single tokenization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub kind_counts: BTreeMap<TokenKind, usize>,
    pub lines_processed: usize,
    pub max_indent_depth: usize,
    pub max_bracket_depth: usize,
    pub multiline_strings: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;
        *self.kind_counts.entry(token.kind()).or_insert(0) += 1;
    }

    pub(crate) fn record_indent_depth(&mut self, depth: usize) {
        self.max_indent_depth = self.max_indent_depth.max(depth);
    }

    pub(crate) fn record_bracket_depth(&mut self, depth: usize) {
        self.max_bracket_depth = self.max_bracket_depth.max(depth);
    }

    pub fn count(&self, kind: TokenKind) -> usize {
        self.kind_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Short `KIND=n` listing for log context
    pub fn kind_summary(&self) -> String {
        self.kind_counts
            .iter()
            .map(|(kind, n)| format!("{}={}", kind.as_str(), n))
            .collect::<Vec<_>>()
            .join(",")
    }
}
