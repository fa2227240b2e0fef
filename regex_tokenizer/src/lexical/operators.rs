//! Configurable operator set for the pattern table

use serde::{Deserialize, Serialize};

/// Bracket characters; always present in a pattern table and always first
pub const OPEN_BRACKETS: [&str; 3] = ["(", "[", "{"];
pub const CLOSE_BRACKETS: [&str; 3] = [")", "]", "}"];

const CORE_OPERATORS: &[&str] = &["==", "=", "**", "*", "//", "/", ":", "+", "-", ",", "."];

const EXTENDED_OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "%=", "@=",
    "&=", "|=", "^=", ":=", "->", "<<", ">>", "<", ">", "%", "@", "&", "|", "^", "~", ";",
];

/// Named operator presets selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorPreset {
    /// Assignment, arithmetic, `:`, `,` and `.`
    Core,
    /// Core plus comparisons, augmented assignment, bitwise and punctuation
    #[default]
    Extended,
}

impl OperatorPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorPreset::Core => "core",
            OperatorPreset::Extended => "extended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "core" => Some(OperatorPreset::Core),
            "extended" | "full" => Some(OperatorPreset::Extended),
            _ => None,
        }
    }
}

/// Literal, non-bracket operators recognized as `OP`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorSet {
    operators: Vec<String>,
}

impl OperatorSet {
    pub fn core() -> Self {
        Self::from_literals(CORE_OPERATORS)
    }

    pub fn extended() -> Self {
        let mut set = Self::core();
        for op in EXTENDED_OPERATORS {
            set.insert(op);
        }
        set
    }

    pub fn from_preset(preset: OperatorPreset) -> Self {
        match preset {
            OperatorPreset::Core => Self::core(),
            OperatorPreset::Extended => Self::extended(),
        }
    }

    fn from_literals(literals: &[&str]) -> Self {
        let mut set = Self {
            operators: Vec::with_capacity(literals.len()),
        };
        for op in literals {
            set.insert(op);
        }
        set
    }

    /// Add an operator; brackets, blanks and duplicates are ignored
    pub fn with_operator(mut self, op: impl AsRef<str>) -> Self {
        self.insert(op.as_ref());
        self
    }

    pub fn with_operators<I, S>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for op in ops {
            self.insert(op.as_ref());
        }
        self
    }

    fn insert(&mut self, op: &str) {
        let op = op.trim();
        if op.is_empty()
            || is_open_bracket(op)
            || is_close_bracket(op)
            || self.operators.iter().any(|o| o == op)
        {
            return;
        }
        self.operators.push(op.to_string());
    }

    pub fn contains(&self, op: &str) -> bool {
        self.operators.iter().any(|o| o == op)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Operators in match order: longer first, insertion order within a length
    pub fn match_order(&self) -> Vec<&str> {
        let mut ordered: Vec<&str> = self.operators.iter().map(String::as_str).collect();
        ordered.sort_by_key(|op| std::cmp::Reverse(op.chars().count()));
        ordered
    }
}

impl Default for OperatorSet {
    fn default() -> Self {
        Self::core()
    }
}

pub fn is_open_bracket(text: &str) -> bool {
    OPEN_BRACKETS.contains(&text)
}

pub fn is_close_bracket(text: &str) -> bool {
    CLOSE_BRACKETS.contains(&text)
}
