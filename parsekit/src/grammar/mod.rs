//! The grammar model: an immutable, id-indexed symbol graph.
//!
//! A [Grammar] is only ever obtained from [GrammarBuilder::build], so every
//! value handed to the compiler is frozen; there is no way to mutate a
//! grammar after compilation has seen it.

mod builder;
mod symbol;

pub use builder::GrammarBuilder;
pub use symbol::Associativity;
pub use symbol::Hint;
pub use symbol::NonTerminal;
pub use symbol::NtId;
pub use symbol::Precedence;
pub use symbol::ProdId;
pub use symbol::Production;
pub use symbol::RecoveryRule;
pub use symbol::SymbolId;
pub use symbol::Terminal;
pub use symbol::TermId;
pub use symbol::TokenCategory;

use std::collections::HashMap;
use std::collections::HashSet;

pub struct Grammar {
    pub(crate) terminals: Vec<Terminal>,
    pub(crate) nonterminals: Vec<NonTerminal>,
    pub(crate) productions: Vec<Production>,
    pub(crate) root: NtId,
    pub(crate) precedence: HashMap<TermId, Precedence>,
    pub(crate) hints: HashMap<(ProdId, usize), Hint>,
    pub(crate) transient: HashSet<NtId>,
    pub(crate) punctuation: HashSet<TermId>,
    pub(crate) brace_pairs: Vec<(TermId, TermId)>,
    pub(crate) non_grammar: HashSet<TermId>,
    pub(crate) case_sensitive: bool,
    pub(crate) skip_whitespace: bool,
}

impl Grammar {
    pub fn root(&self) -> NtId {
        self.root
    }
    pub fn terminal(&self, id: TermId) -> &Terminal {
        &self.terminals[id.0]
    }
    pub fn nonterminal(&self, id: NtId) -> &NonTerminal {
        &self.nonterminals[id.0]
    }
    pub fn production(&self, id: ProdId) -> &Production {
        &self.productions[id.0]
    }
    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }
    pub fn nonterminal_count(&self) -> usize {
        self.nonterminals.len()
    }
    pub fn production_count(&self) -> usize {
        self.productions.len()
    }
    pub fn precedence_of(&self, id: TermId) -> Option<Precedence> {
        self.precedence.get(&id).copied()
    }
    pub fn is_transient(&self, id: NtId) -> bool {
        self.transient.contains(&id)
    }
    pub fn is_punctuation(&self, id: TermId) -> bool {
        self.punctuation.contains(&id)
    }
    pub fn is_non_grammar(&self, id: TermId) -> bool {
        self.non_grammar.contains(&id)
    }
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
    pub fn symbol_name(&self, symbol: SymbolId) -> &str {
        match symbol {
            SymbolId::Terminal(t) => &self.terminals[t.0].name,
            SymbolId::NonTerminal(n) => &self.nonterminals[n.0].name,
        }
    }
    /// Renders a production as `head → body…`, for diagnostics.
    pub fn production_text(&self, id: ProdId) -> String {
        let prod = &self.productions[id.0];
        let head = &self.nonterminals[prod.head.0].name;
        if prod.body.is_empty() {
            return format!("{head} → <empty>");
        }
        let body = prod
            .body
            .iter()
            .map(|s| self.symbol_name(*s))
            .collect::<Vec<&str>>()
            .join(" ");
        format!("{head} → {body}")
    }
    /// The registered closing bracket for `open`, if `open` is one half of a
    /// registered pair.
    pub(crate) fn closing_bracket(&self, open: TermId) -> Option<TermId> {
        self.brace_pairs
            .iter()
            .find(|(o, _)| *o == open)
            .map(|(_, c)| *c)
    }
    pub(crate) fn is_closing_bracket(&self, id: TermId) -> bool {
        self.brace_pairs.iter().any(|(_, c)| *c == id)
    }
}
