//! Nullable, FIRST, and FOLLOW analysis over the symbol graph.

use crate::grammar::Grammar;
use crate::grammar::SymbolId;
use crate::grammar::TermId;
use std::collections::BTreeSet;

pub(crate) struct Analysis {
    nullable: Vec<bool>,
    first: Vec<BTreeSet<TermId>>,
    follow: Vec<BTreeSet<TermId>>,
}

impl Analysis {
    pub fn compute(grammar: &Grammar, eof: TermId) -> Analysis {
        let n = grammar.nonterminal_count();
        let mut nullable = vec![false; n];
        let mut changed = true;
        while changed {
            changed = false;
            for index in 0..grammar.production_count() {
                let prod = grammar.production(crate::grammar::ProdId(index));
                if nullable[prod.head.index()] {
                    continue;
                }
                let all_nullable = prod.body.iter().all(|s| match s {
                    SymbolId::Terminal(_) => false,
                    SymbolId::NonTerminal(nt) => nullable[nt.index()],
                });
                if all_nullable {
                    nullable[prod.head.index()] = true;
                    changed = true;
                }
            }
        }
        let mut first: Vec<BTreeSet<TermId>> = vec![BTreeSet::new(); n];
        let mut changed = true;
        while changed {
            changed = false;
            for index in 0..grammar.production_count() {
                let prod = grammar.production(crate::grammar::ProdId(index));
                let head = prod.head.index();
                for symbol in &prod.body {
                    match symbol {
                        SymbolId::Terminal(t) => {
                            changed |= first[head].insert(*t);
                            break;
                        }
                        SymbolId::NonTerminal(nt) => {
                            let add: Vec<TermId> = first[nt.index()].iter().copied().collect();
                            for t in add {
                                changed |= first[head].insert(t);
                            }
                            if !nullable[nt.index()] {
                                break;
                            }
                        }
                    }
                }
            }
        }
        let mut follow: Vec<BTreeSet<TermId>> = vec![BTreeSet::new(); n];
        follow[grammar.root().index()].insert(eof);
        let mut changed = true;
        while changed {
            changed = false;
            for index in 0..grammar.production_count() {
                let prod = grammar.production(crate::grammar::ProdId(index));
                for (position, symbol) in prod.body.iter().enumerate() {
                    let SymbolId::NonTerminal(nt) = symbol else {
                        continue;
                    };
                    let mut rest_nullable = true;
                    for rest in &prod.body[position + 1..] {
                        match rest {
                            SymbolId::Terminal(t) => {
                                changed |= follow[nt.index()].insert(*t);
                                rest_nullable = false;
                                break;
                            }
                            SymbolId::NonTerminal(other) => {
                                let add: Vec<TermId> =
                                    first[other.index()].iter().copied().collect();
                                for t in add {
                                    changed |= follow[nt.index()].insert(t);
                                }
                                if !nullable[other.index()] {
                                    rest_nullable = false;
                                    break;
                                }
                            }
                        }
                    }
                    if rest_nullable {
                        let add: Vec<TermId> =
                            follow[prod.head.index()].iter().copied().collect();
                        for t in add {
                            changed |= follow[nt.index()].insert(t);
                        }
                    }
                }
            }
        }
        Analysis {
            nullable,
            first,
            follow,
        }
    }
    pub fn is_nullable(&self, nt: usize) -> bool {
        self.nullable[nt]
    }
    pub fn follow(&self, nt: usize) -> &BTreeSet<TermId> {
        &self.follow[nt]
    }
    /// FIRST of a symbol sequence followed by a known lookahead terminal.
    pub fn first_of(&self, symbols: &[SymbolId], lookahead: TermId) -> BTreeSet<TermId> {
        let mut out = BTreeSet::new();
        for symbol in symbols {
            match symbol {
                SymbolId::Terminal(t) => {
                    out.insert(*t);
                    return out;
                }
                SymbolId::NonTerminal(nt) => {
                    out.extend(self.first[nt.index()].iter().copied());
                    if !self.nullable[nt.index()] {
                        return out;
                    }
                }
            }
        }
        out.insert(lookahead);
        out
    }
}
