//! The grammar authoring surface.
//!
//! The builder is the only mutable form of a grammar. [GrammarBuilder::build]
//! checks the structural rules that count as programming misuse (no root, a
//! hint outside its production, a recovery rule that cannot synchronize) and
//! freezes everything else for the compiler, which reports grammar-level
//! problems as diagnostics instead.

use crate::grammar::Associativity;
use crate::grammar::Grammar;
use crate::grammar::Hint;
use crate::grammar::NonTerminal;
use crate::grammar::NtId;
use crate::grammar::Precedence;
use crate::grammar::ProdId;
use crate::grammar::Production;
use crate::grammar::RecoveryRule;
use crate::grammar::SymbolId;
use crate::grammar::Terminal;
use crate::grammar::TermId;
use crate::grammar::TokenCategory;
use crate::scanner::KeywordScanner;
use crate::scanner::ScannerKind;
use anyhow::bail;
use anyhow::Result;
use std::collections::HashMap;
use std::collections::HashSet;

/// Priority given to keyword terminals, so that a keyword wins a same-length
/// tie against a literal scanner declared earlier.
const KEYWORD_PRIORITY: i16 = 10;
/// Priority given to reserved words, so that they also win against
/// identifiers.
const RESERVED_PRIORITY: i16 = 100;

pub struct GrammarBuilder {
    terminals: Vec<Terminal>,
    keywords: HashMap<String, TermId>,
    nonterminals: Vec<NonTerminal>,
    productions: Vec<Production>,
    root: Option<NtId>,
    precedence: HashMap<TermId, Precedence>,
    hints: HashMap<(ProdId, usize), Hint>,
    symbol_hints: Vec<(NtId, Hint)>,
    transient: HashSet<NtId>,
    punctuation: HashSet<TermId>,
    brace_pairs: Vec<(TermId, TermId)>,
    non_grammar: HashSet<TermId>,
    case_sensitive: bool,
    skip_whitespace: bool,
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        GrammarBuilder::new()
    }
}

impl GrammarBuilder {
    pub fn new() -> GrammarBuilder {
        GrammarBuilder {
            terminals: vec![],
            keywords: HashMap::new(),
            nonterminals: vec![],
            productions: vec![],
            root: None,
            precedence: HashMap::new(),
            hints: HashMap::new(),
            symbol_hints: vec![],
            transient: HashSet::new(),
            punctuation: HashSet::new(),
            brace_pairs: vec![],
            non_grammar: HashSet::new(),
            case_sensitive: true,
            skip_whitespace: true,
        }
    }
    /// Match keywords without regard to case.
    pub fn case_insensitive(&mut self) -> &mut Self {
        self.case_sensitive = false;
        self
    }
    /// Stop skipping whitespace between tokens. Grammars over raw text (free
    /// text fields, fixed-width records) need every character delivered.
    pub fn keep_whitespace(&mut self) -> &mut Self {
        self.skip_whitespace = false;
        self
    }
    /// Declare a terminal with an explicit scanner. The token category is
    /// derived from the scanner kind.
    pub fn terminal(&mut self, name: &str, scanner: ScannerKind) -> TermId {
        let id = TermId(self.terminals.len());
        self.terminals.push(Terminal {
            name: name.to_string(),
            category: scanner.category(),
            scanner,
            priority: 0,
        });
        id
    }
    /// Declare (or re-use) a keyword terminal matching `text` literally.
    pub fn keyword(&mut self, text: &str) -> TermId {
        if let Some(id) = self.keywords.get(text) {
            return *id;
        }
        let id = TermId(self.terminals.len());
        self.terminals.push(Terminal {
            name: text.to_string(),
            category: TokenCategory::Normal,
            scanner: ScannerKind::Keyword(KeywordScanner::new(text)),
            priority: KEYWORD_PRIORITY,
        });
        self.keywords.insert(text.to_string(), id);
        id
    }
    /// Mark keywords as reserved words: they win against any identifier
    /// matching the same text.
    pub fn reserve(&mut self, terms: &[TermId]) -> &mut Self {
        for term in terms {
            self.terminals[term.0].priority = RESERVED_PRIORITY;
        }
        self
    }
    pub fn nonterminal(&mut self, name: &str) -> NtId {
        let id = NtId(self.nonterminals.len());
        self.nonterminals.push(NonTerminal {
            name: name.to_string(),
            productions: vec![],
            recovery: None,
            is_list: false,
        });
        id
    }
    /// Attach one production (one alternative) to `head`. Call repeatedly
    /// for alternation. An empty body is an epsilon production.
    pub fn rule(&mut self, head: NtId, body: &[SymbolId]) -> ProdId {
        let id = ProdId(self.productions.len());
        self.productions.push(Production {
            head,
            body: body.to_vec(),
        });
        self.nonterminals[head.0].productions.push(id);
        id
    }
    /// `list → <empty> | list item` — zero or more `item`s, spliced flat.
    pub fn star_rule(&mut self, list: NtId, item: SymbolId) -> &mut Self {
        self.rule(list, &[]);
        self.rule(list, &[list.into(), item]);
        self.nonterminals[list.0].is_list = true;
        self
    }
    /// `list → item | list item` — one or more `item`s, spliced flat.
    pub fn plus_rule(&mut self, list: NtId, item: SymbolId) -> &mut Self {
        self.rule(list, &[item]);
        self.rule(list, &[list.into(), item]);
        self.nonterminals[list.0].is_list = true;
        self
    }
    /// Declare a precedence band. Higher levels bind tighter; terminals in
    /// one call share the level and associativity.
    pub fn operators(&mut self, level: i32, assoc: Associativity, terms: &[TermId]) -> &mut Self {
        for term in terms {
            self.precedence.insert(*term, Precedence { level, assoc });
        }
        self
    }
    /// Consumed during parsing but dropped from the tree.
    pub fn punctuation(&mut self, terms: &[TermId]) -> &mut Self {
        self.punctuation.extend(terms.iter().copied());
        self
    }
    /// Collapsed out of the tree: a single child replaces the node, several
    /// children are spliced into the parent.
    pub fn transient(&mut self, nts: &[NtId]) -> &mut Self {
        self.transient.extend(nts.iter().copied());
        self
    }
    /// Register a matching bracket pair; the lexer reports mismatched
    /// closing brackets as scan errors.
    pub fn brace_pair(&mut self, open: TermId, close: TermId) -> &mut Self {
        self.brace_pairs.push((open, close));
        self
    }
    /// Scan this terminal but never feed it to the parser (comments, line
    /// continuations).
    pub fn non_grammar_terminal(&mut self, term: TermId) -> &mut Self {
        self.non_grammar.insert(term);
        self
    }
    /// Attach the error-recovery production for `nt`: an implicit
    /// synchronization marker followed by `tail`. The first tail symbol must
    /// be a terminal — it is what the engine discards input towards.
    pub fn error_rule(&mut self, nt: NtId, tail: &[SymbolId]) -> &mut Self {
        self.nonterminals[nt.0].recovery = Some(RecoveryRule {
            tail: tail.to_vec(),
        });
        self
    }
    /// A positional hint: disambiguate the conflict at `position` inside
    /// `prod`. `PreferShift` names the position of the symbol to shift;
    /// `PreferReduce` names the production end (`position == body length`).
    pub fn hint(&mut self, prod: ProdId, position: usize, hint: Hint) -> &mut Self {
        self.hints.insert((prod, position), hint);
        self
    }
    /// A symbol-level hint: applied at the end position of every production
    /// of `nt`. Expanded when the grammar is built.
    pub fn hint_symbol(&mut self, nt: NtId, hint: Hint) -> &mut Self {
        self.symbol_hints.push((nt, hint));
        self
    }
    pub fn root(&mut self, nt: NtId) -> &mut Self {
        self.root = Some(nt);
        self
    }
    /// Freeze the grammar. Structural misuse fails here; everything the
    /// grammar *means* is judged later by [crate::compile].
    pub fn build(mut self) -> Result<Grammar> {
        let Some(root) = self.root else {
            bail!("grammar has no root symbol");
        };
        for (prod, position) in self.hints.keys() {
            let len = self.productions[prod.0].body.len();
            if *position > len {
                bail!(
                    "hint position {position} is outside production `{}` (length {len})",
                    self.nonterminals[self.productions[prod.0].head.0].name
                );
            }
        }
        for (nt, hint) in std::mem::take(&mut self.symbol_hints) {
            for prod in self.nonterminals[nt.0].productions.clone() {
                let end = self.productions[prod.0].body.len();
                self.hints.insert((prod, end), hint);
            }
        }
        for nt in &self.nonterminals {
            if let Some(recovery) = &nt.recovery {
                match recovery.tail.first() {
                    Some(SymbolId::Terminal(_)) => {}
                    _ => bail!(
                        "recovery rule of `{}` must start with a terminal synchronization symbol",
                        nt.name
                    ),
                }
            }
        }
        Ok(Grammar {
            terminals: self.terminals,
            nonterminals: self.nonterminals,
            productions: self.productions,
            root,
            precedence: self.precedence,
            hints: self.hints,
            transient: self.transient,
            punctuation: self.punctuation,
            brace_pairs: self.brace_pairs,
            non_grammar: self.non_grammar,
            case_sensitive: self.case_sensitive,
            skip_whitespace: self.skip_whitespace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::IdentifierScanner;

    #[test]
    fn build_requires_a_root() {
        let mut builder = GrammarBuilder::new();
        let id = builder.terminal(
            "id",
            ScannerKind::Identifier(IdentifierScanner::new()),
        );
        let stmt = builder.nonterminal("stmt");
        builder.rule(stmt, &[id.into()]);
        assert!(builder.build().is_err());
    }

    #[test]
    fn keywords_are_interned() {
        let mut builder = GrammarBuilder::new();
        let a = builder.keyword("+");
        let b = builder.keyword("+");
        assert_eq!(a, b);
        assert_eq!(builder.terminals.len(), 1);
    }

    #[test]
    fn symbol_hints_expand_to_production_ends() {
        let mut builder = GrammarBuilder::new();
        let kw = builder.keyword("private");
        let m = builder.nonterminal("modifier");
        let p = builder.rule(m, &[kw.into()]);
        builder.hint_symbol(m, Hint::PreferReduce);
        builder.root(m);
        let grammar = builder.build().unwrap();
        assert_eq!(grammar.hints.get(&(p, 1)), Some(&Hint::PreferReduce));
    }

    #[test]
    fn recovery_rule_must_synchronize_on_a_terminal() {
        let mut builder = GrammarBuilder::new();
        let kw = builder.keyword(";");
        let stmt = builder.nonterminal("stmt");
        let other = builder.nonterminal("other");
        builder.rule(other, &[kw.into()]);
        builder.rule(stmt, &[kw.into()]);
        builder.error_rule(stmt, &[other.into()]);
        builder.root(stmt);
        assert!(builder.build().is_err());
    }
}
