//! Positioned diagnostics.
//!
//! Malformed grammars and malformed input are first-class outcomes: every
//! problem is recorded here and accumulated in order, never thrown. The kind
//! enums carry the message texts; a [Diagnostic] is the flattened,
//! position-carrying record handed to callers.

use crate::scanner::Location;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Compile time: the grammar itself is unusable.
    GrammarError,
    /// Parse time: no automaton action for the current state and token.
    ParseError,
    /// Scan time: no scanner matched, or a lexeme is incomplete.
    ScanError,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, location: Location, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            severity,
            location,
            message: message.into(),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let kind = match self.severity {
            Severity::GrammarError => "grammar error",
            Severity::ParseError => "parse error",
            Severity::ScanError => "scan error",
        };
        write!(f, "{kind} at {}: {}", self.location, self.message)
    }
}

/// A scan failure, produced by an individual scanner or by the lexer when no
/// scanner matches.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScanErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unterminated regular expression")]
    UnterminatedRegex,
    #[error("invalid regular expression: {0}")]
    InvalidRegex(String),
    #[error("line continuation is not followed by a line break")]
    MissingLineBreak,
    #[error("character literal must contain exactly one character")]
    InvalidCharLiteral,
    #[error("number is too large for every candidate type")]
    NumberOverflow,
    #[error("malformed number literal")]
    InvalidNumber,
    #[error("malformed escape sequence")]
    InvalidEscape,
    #[error("cannot convert \"{text}\" to {target}")]
    ValueConversion { text: String, target: &'static str },
    #[error("field is shorter than the declared width {0}")]
    ShortField(usize),
    #[error("unexpected character(s) \"{0}\"")]
    UnexpectedInput(String),
    #[error("closing bracket \"{found}\" does not match opening bracket \"{expected}\"")]
    MismatchedBracket { found: String, expected: String },
}

/// A grammar-level defect found during compilation. Fatal: when any of these
/// are reported, no automaton is produced.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GrammarDefect {
    #[error("non-terminal `{0}` has no productions")]
    NoProductions(String),
    #[error("symbol `{0}` is not reachable from the root")]
    Unreachable(String),
    #[error(
        "shift/reduce conflict on `{on}` between shifting and reducing `{production}`; \
         add a precedence declaration or a hint"
    )]
    ShiftReduce { on: String, production: String },
    #[error("reduce/reduce conflict on `{on}` between `{first}` and `{second}`; add a hint")]
    ReduceReduce {
        on: String,
        first: String,
        second: String,
    },
    #[error("operator `{0}` is non-associative; operands cannot chain")]
    NonAssociative(String),
    #[error("hint at position {position} of `{production}` does not address any conflict")]
    UselessHint { production: String, position: usize },
}

impl GrammarDefect {
    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::new(Severity::GrammarError, Location::default(), self.to_string())
    }
}
