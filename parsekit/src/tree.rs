//! The parse tree.

use crate::grammar::SymbolId;
use crate::scanner::Span;
use crate::token::Token;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// One node of the parse tree.
///
/// Terminal nodes hold their [Token] and no children; non-terminal nodes
/// hold their children in input order. Transient symbols are collapsed
/// during reduction and never appear in the finished tree; punctuation
/// tokens are dropped.
#[derive(Debug)]
pub struct ParseTreeNode {
    pub symbol: SymbolId,
    pub span: Span,
    pub token: Option<Token>,
    pub children: Vec<ParseTreeNode>,
    /// True for nodes synthesized by error recovery.
    pub recovered: bool,
}

impl ParseTreeNode {
    pub(crate) fn leaf(symbol: SymbolId, token: Token) -> ParseTreeNode {
        ParseTreeNode {
            symbol,
            span: token.span,
            token: Some(token),
            children: vec![],
            recovered: false,
        }
    }
    pub fn is_terminal(&self) -> bool {
        self.token.is_some()
    }
    /// The token text of a terminal node, or an empty string.
    pub fn text(&self) -> &str {
        self.token.as_ref().map(|t| t.text.as_str()).unwrap_or("")
    }
    fn write_indented(&self, f: &mut Formatter<'_>, names: &dyn Fn(SymbolId) -> String, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            write!(f, "  ")?;
        }
        match &self.token {
            Some(token) => writeln!(f, "{} \"{}\"", names(self.symbol), token.text)?,
            None => writeln!(f, "{}", names(self.symbol))?,
        }
        for child in &self.children {
            child.write_indented(f, names, depth + 1)?;
        }
        Ok(())
    }
    /// Render the tree with indentation, resolving symbol names through
    /// `names`.
    pub fn dump(&self, names: &dyn Fn(SymbolId) -> String) -> String {
        struct Dump<'a> {
            node: &'a ParseTreeNode,
            names: &'a dyn Fn(SymbolId) -> String,
        }
        impl Display for Dump<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.node.write_indented(f, self.names, 0)
            }
        }
        format!("{}", Dump { node: self, names })
    }
}
