//! Canonical LR item sets.
//!
//! States are built by closure and goto over an augmented start production,
//! with lookaheads merged per core (LALR-style) to bound the state count:
//! a goto target landing on an existing core contributes its lookaheads to
//! that state, and the enlarged state is re-processed until nothing changes.

use crate::compiler::sets::Analysis;
use crate::grammar::Grammar;
use crate::grammar::ProdId;
use crate::grammar::SymbolId;
use crate::grammar::TermId;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::VecDeque;

/// One LR(1) item: a production position plus one lookahead terminal. The
/// production index `grammar.production_count()` denotes the augmented
/// start production `start' → root`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Item {
    pub prod: usize,
    pub dot: usize,
    pub la: TermId,
}

pub(crate) type ItemSet = BTreeSet<Item>;
type Core = BTreeSet<(usize, usize)>;

pub(crate) struct StateGraph {
    pub states: Vec<ItemSet>,
    pub transitions: Vec<BTreeMap<SymbolId, usize>>,
}

pub(crate) struct StateBuilder<'g> {
    grammar: &'g Grammar,
    analysis: &'g Analysis,
    aug_body: [SymbolId; 1],
    eof: TermId,
}

impl<'g> StateBuilder<'g> {
    pub fn new(grammar: &'g Grammar, analysis: &'g Analysis, eof: TermId) -> StateBuilder<'g> {
        StateBuilder {
            aug_body: [SymbolId::NonTerminal(grammar.root())],
            grammar,
            analysis,
            eof,
        }
    }
    pub fn augmented_production(&self) -> usize {
        self.grammar.production_count()
    }
    pub fn body(&self, prod: usize) -> &[SymbolId] {
        if prod == self.augmented_production() {
            &self.aug_body
        } else {
            &self.grammar.production(ProdId(prod)).body
        }
    }
    fn close(&self, set: &mut ItemSet) {
        let mut work: VecDeque<Item> = set.iter().copied().collect();
        while let Some(item) = work.pop_front() {
            let body = self.body(item.prod);
            let Some(SymbolId::NonTerminal(nt)) = body.get(item.dot) else {
                continue;
            };
            let lookaheads = self.analysis.first_of(&body[item.dot + 1..], item.la);
            for prod in &self.grammar.nonterminal(*nt).productions {
                for la in &lookaheads {
                    let new = Item {
                        prod: prod.index(),
                        dot: 0,
                        la: *la,
                    };
                    if set.insert(new) {
                        work.push_back(new);
                    }
                }
            }
        }
    }
    fn goto_kernel(&self, set: &ItemSet, symbol: SymbolId) -> ItemSet {
        set.iter()
            .filter(|item| self.body(item.prod).get(item.dot) == Some(&symbol))
            .map(|item| Item {
                prod: item.prod,
                dot: item.dot + 1,
                la: item.la,
            })
            .collect()
    }
    fn core(set: &ItemSet) -> Core {
        set.iter().map(|item| (item.prod, item.dot)).collect()
    }
    /// Build all states reachable from the augmented start item.
    pub fn build(&self) -> StateGraph {
        let mut start = ItemSet::new();
        start.insert(Item {
            prod: self.augmented_production(),
            dot: 0,
            la: self.eof,
        });
        self.close(&mut start);

        let mut states = vec![start.clone()];
        let mut transitions: Vec<BTreeMap<SymbolId, usize>> = vec![BTreeMap::new()];
        let mut cores: HashMap<Core, usize> = HashMap::new();
        cores.insert(StateBuilder::core(&start), 0);
        let mut work: VecDeque<usize> = VecDeque::from([0]);

        while let Some(index) = work.pop_front() {
            let items = states[index].clone();
            let symbols: BTreeSet<SymbolId> = items
                .iter()
                .filter_map(|item| self.body(item.prod).get(item.dot).copied())
                .collect();
            for symbol in symbols {
                let mut target = self.goto_kernel(&items, symbol);
                self.close(&mut target);
                let core = StateBuilder::core(&target);
                let target_index = match cores.get(&core) {
                    Some(existing) => {
                        let merged: ItemSet = states[*existing].union(&target).copied().collect();
                        if merged != states[*existing] {
                            states[*existing] = merged;
                            if !work.contains(existing) {
                                work.push_back(*existing);
                            }
                        }
                        *existing
                    }
                    None => {
                        states.push(target);
                        transitions.push(BTreeMap::new());
                        cores.insert(core, states.len() - 1);
                        work.push_back(states.len() - 1);
                        states.len() - 1
                    }
                };
                transitions[index].insert(symbol, target_index);
            }
        }
        StateGraph {
            states,
            transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::sets::Analysis;
    use crate::grammar::GrammarBuilder;
    use crate::scanner::IdentifierScanner;
    use crate::scanner::ScannerKind;

    #[test]
    fn builds_the_states_of_a_tiny_grammar() {
        // root → id ;
        let mut builder = GrammarBuilder::new();
        let id = builder.terminal("id", ScannerKind::Identifier(IdentifierScanner::new()));
        let semi = builder.keyword(";");
        let root = builder.nonterminal("root");
        builder.rule(root, &[id.into(), semi.into()]);
        builder.root(root);
        let grammar = builder.build().unwrap();
        let eof = TermId(grammar.terminal_count());
        let analysis = Analysis::compute(&grammar, eof);
        let graph = StateBuilder::new(&grammar, &analysis, eof).build();

        // start, after-id, after-semi, after-root: four states.
        assert_eq!(graph.states.len(), 4);
        assert_eq!(
            graph.transitions[0].get(&SymbolId::Terminal(id)),
            Some(&1)
        );
        // The completed item carries the end-of-input lookahead.
        let completed = graph
            .states
            .iter()
            .flat_map(|state| state.iter())
            .find(|item| item.dot == 2)
            .copied()
            .unwrap();
        assert_eq!(completed.la, eof);
    }
}
