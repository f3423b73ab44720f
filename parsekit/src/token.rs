//! Tokens and their typed values.
//!
//! A token is immutable once produced: a scanner call creates it, the parse
//! engine consumes it exactly once, and the parse tree then owns it as a leaf
//! payload.

use crate::grammar::TermId;
use crate::grammar::TokenCategory;
use crate::scanner::Date;
use crate::scanner::Location;
use crate::scanner::Span;
use regex::Regex;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// The typed value a scanner attached to a token.
///
/// Keyword and punctuation tokens carry [TokenValue::None]; literal tokens
/// carry the decoded value in the narrowest type their scanner selected.
#[derive(Clone, Debug)]
pub enum TokenValue {
    None,
    Str(String),
    Char(char),
    I16(i16),
    I32(i32),
    I64(i64),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// An integer too wide for every fixed-width candidate type, carried as
    /// its decimal digit text.
    BigInt(String),
    Date(Date),
    Regex(Regex),
}

impl TokenValue {
    /// The value widened to `f64`, for numeric tokens.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TokenValue::I16(v) => Some(f64::from(*v)),
            TokenValue::I32(v) => Some(f64::from(*v)),
            TokenValue::I64(v) => Some(*v as f64),
            TokenValue::U16(v) => Some(f64::from(*v)),
            TokenValue::U32(v) => Some(f64::from(*v)),
            TokenValue::U64(v) => Some(*v as f64),
            TokenValue::F32(v) => Some(f64::from(*v)),
            TokenValue::F64(v) => Some(*v),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for TokenValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TokenValue::None, TokenValue::None) => true,
            (TokenValue::Str(a), TokenValue::Str(b)) => a == b,
            (TokenValue::Char(a), TokenValue::Char(b)) => a == b,
            (TokenValue::I16(a), TokenValue::I16(b)) => a == b,
            (TokenValue::I32(a), TokenValue::I32(b)) => a == b,
            (TokenValue::I64(a), TokenValue::I64(b)) => a == b,
            (TokenValue::U16(a), TokenValue::U16(b)) => a == b,
            (TokenValue::U32(a), TokenValue::U32(b)) => a == b,
            (TokenValue::U64(a), TokenValue::U64(b)) => a == b,
            (TokenValue::F32(a), TokenValue::F32(b)) => a == b,
            (TokenValue::F64(a), TokenValue::F64(b)) => a == b,
            (TokenValue::BigInt(a), TokenValue::BigInt(b)) => a == b,
            (TokenValue::Date(a), TokenValue::Date(b)) => a == b,
            // Compiled programs are compared by their source pattern.
            (TokenValue::Regex(a), TokenValue::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The terminal that produced this token. Virtual ids are used for the
    /// end-of-input token and for error tokens.
    pub term: TermId,
    pub category: TokenCategory,
    /// The raw lexeme, exactly as it appears in the source.
    pub text: String,
    pub value: TokenValue,
    pub span: Span,
    pub location: Location,
}

impl Token {
    pub fn is_error(&self) -> bool {
        self.category == TokenCategory::Error
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" at {}", self.text, self.location)
    }
}
