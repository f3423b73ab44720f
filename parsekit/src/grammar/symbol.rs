//! Symbols of the grammar graph: terminals, non-terminals, productions, and
//! the identifiers that index them.
//!
//! Terminals, non-terminals, and productions are each densely numbered from
//! zero, so the compiler and the engine address them by plain index instead
//! of by name.

use crate::scanner::ScannerKind;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NtId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProdId(pub(crate) usize);

impl TermId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl NtId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl ProdId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A reference to either side of the symbol graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolId {
    Terminal(TermId),
    NonTerminal(NtId),
}

impl From<TermId> for SymbolId {
    fn from(id: TermId) -> SymbolId {
        SymbolId::Terminal(id)
    }
}

impl From<NtId> for SymbolId {
    fn from(id: NtId) -> SymbolId {
        SymbolId::NonTerminal(id)
    }
}

/// What kind of token a terminal produces.
///
/// `Comment` and `Outline` tokens are recorded in the token list; whether
/// they reach the parser depends on the terminal being registered as a
/// non-grammar terminal. `Error` is reserved for tokens synthesized from
/// scan failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenCategory {
    Normal,
    Comment,
    Outline,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
    Neutral,
}

/// An operator precedence band. Higher levels bind tighter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precedence {
    pub level: i32,
    pub assoc: Associativity,
}

/// An author-supplied directive for one ambiguous automaton position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    PreferShift,
    PreferReduce,
}

pub struct Terminal {
    pub name: String,
    pub category: TokenCategory,
    pub scanner: ScannerKind,
    /// Tie-breaker between scanners matching the same length; reserved
    /// keywords sit above identifiers.
    pub priority: i16,
}

pub struct NonTerminal {
    pub name: String,
    /// Production ids, in declaration order.
    pub productions: Vec<ProdId>,
    /// The synchronization tail evaluated when no ordinary action applies;
    /// see [crate::grammar::GrammarBuilder::error_rule].
    pub recovery: Option<RecoveryRule>,
    /// Set by the star/plus rule helpers; reductions splice the recursive
    /// child's children instead of nesting lists.
    pub is_list: bool,
}

/// One ordered alternative of a non-terminal.
pub struct Production {
    pub head: NtId,
    pub body: Vec<SymbolId>,
}

/// An error-recovery production: an implicit synchronization marker followed
/// by the ordinary symbols to consume before resuming.
pub struct RecoveryRule {
    pub tail: Vec<SymbolId>,
}

impl Display for TermId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl Display for NtId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}
