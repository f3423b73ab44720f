//! Action and goto tables, and compile-time conflict resolution.
//!
//! Resolution order is fixed: operator precedence first, explicit hints
//! second, shift-over-reduce last. Whatever remains is a fatal grammar
//! error. Operator conflicts whose reduce production carries no terminal
//! with a declared precedence (operators reached through a transient
//! non-terminal) are emitted as [Action::Precedence] and arbitrated at
//! parse time against the most recent operator on the stack.

use crate::compiler::items::ItemSet;
use crate::compiler::items::StateGraph;
use crate::compiler::sets::Analysis;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::GrammarDefect;
use crate::grammar::Associativity;
use crate::grammar::Grammar;
use crate::grammar::Hint;
use crate::grammar::NtId;
use crate::grammar::Precedence;
use crate::grammar::ProdId;
use crate::grammar::SymbolId;
use crate::grammar::TermId;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(ProdId),
    Accept,
    /// A shift/reduce pair arbitrated at parse time by operator precedence.
    Precedence { shift: usize, reduce: ProdId },
}

/// How one conflict was settled at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Static precedence comparison decided.
    Precedence,
    /// Deferred to the runtime precedence comparison.
    RuntimePrecedence,
    /// An explicit hint decided.
    Hint,
    /// The default: shift over reduce.
    DefaultShift,
}

#[derive(Clone, Debug)]
pub struct ConflictRecord {
    pub state: usize,
    pub on: String,
    pub production: String,
    pub resolution: ConflictResolution,
}

/// The immutable product of compilation. Safe to share read-only across
/// threads; every parse call keeps its own state.
pub struct CompiledAutomaton {
    grammar: Grammar,
    actions: Vec<HashMap<TermId, Action>>,
    gotos: Vec<HashMap<NtId, usize>>,
    conflicts: Vec<ConflictRecord>,
    eof: TermId,
    error: TermId,
}

impl std::fmt::Debug for CompiledAutomaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledAutomaton")
            .field("states", &self.actions.len())
            .field("conflicts", &self.conflicts.len())
            .field("eof", &self.eof)
            .field("error", &self.error)
            .finish()
    }
}

impl CompiledAutomaton {
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
    pub fn state_count(&self) -> usize {
        self.actions.len()
    }
    /// The virtual terminal id delivered at end of input.
    pub fn eof_term(&self) -> TermId {
        self.eof
    }
    /// The virtual terminal id carried by error tokens.
    pub fn error_term(&self) -> TermId {
        self.error
    }
    /// Conflicts that were resolved at compile time.
    pub fn conflicts(&self) -> &[ConflictRecord] {
        &self.conflicts
    }
    pub(crate) fn action(&self, state: usize, term: TermId) -> Option<Action> {
        self.actions[state].get(&term).copied()
    }
    pub(crate) fn goto(&self, state: usize, nt: NtId) -> Option<usize> {
        self.gotos[state].get(&nt).copied()
    }
    /// The terminals the automaton would accept in `state`, by name.
    pub(crate) fn expected_in(&self, state: usize) -> Vec<String> {
        let mut names: Vec<String> = self.actions[state]
            .keys()
            .map(|t| {
                if *t == self.eof {
                    "<end of input>".to_string()
                } else {
                    self.grammar.terminal(*t).name.clone()
                }
            })
            .collect();
        names.sort();
        names
    }
}

/// A display name that is also safe for the virtual end-of-input id.
fn terminal_name(grammar: &Grammar, term: TermId, eof: TermId) -> String {
    if term == eof {
        "<end of input>".to_string()
    } else {
        grammar.terminal(term).name.clone()
    }
}

/// The precedence of a production: the precedence of the last terminal in
/// its body that has a declaration.
fn production_precedence(grammar: &Grammar, prod: ProdId) -> Option<Precedence> {
    grammar
        .production(prod)
        .body
        .iter()
        .rev()
        .find_map(|symbol| match symbol {
            SymbolId::Terminal(t) => grammar.precedence_of(*t),
            SymbolId::NonTerminal(_) => None,
        })
}

pub(crate) fn emit(
    grammar: Grammar,
    analysis: &Analysis,
    graph: &StateGraph,
    eof: TermId,
    error: TermId,
) -> Result<CompiledAutomaton, Vec<Diagnostic>> {
    let augmented = grammar.production_count();
    let mut errors: Vec<Diagnostic> = vec![];
    let mut conflicts: Vec<ConflictRecord> = vec![];
    let mut used_hints: HashSet<(ProdId, usize)> = HashSet::new();
    let mut actions: Vec<HashMap<TermId, Action>> = vec![HashMap::new(); graph.states.len()];
    let mut gotos: Vec<HashMap<NtId, usize>> = vec![HashMap::new(); graph.states.len()];

    for (state, items) in graph.states.iter().enumerate() {
        let mut shifts: BTreeMap<TermId, usize> = BTreeMap::new();
        for (symbol, target) in &graph.transitions[state] {
            match symbol {
                SymbolId::Terminal(t) => {
                    shifts.insert(*t, *target);
                }
                SymbolId::NonTerminal(nt) => {
                    gotos[state].insert(*nt, *target);
                }
            }
        }
        let mut accepts = false;
        let mut reduces: BTreeMap<TermId, Vec<ProdId>> = BTreeMap::new();
        for item in items {
            if item.prod == augmented {
                if item.dot == 1 {
                    accepts = true;
                }
                continue;
            }
            let prod = ProdId(item.prod);
            if item.dot < grammar.production(prod).body.len() {
                continue;
            }
            debug_assert!(
                analysis
                    .follow(grammar.production(prod).head.index())
                    .contains(&item.la),
                "reduce lookahead must stay within FOLLOW of the production head"
            );
            let entry = reduces.entry(item.la).or_default();
            if !entry.contains(&prod) {
                entry.push(prod);
            }
        }
        if accepts {
            actions[state].insert(eof, Action::Accept);
        }
        let lookaheads: Vec<TermId> = shifts
            .keys()
            .chain(reduces.keys())
            .copied()
            .collect::<std::collections::BTreeSet<TermId>>()
            .into_iter()
            .collect();
        for la in lookaheads {
            if accepts && la == eof {
                continue;
            }
            let shift = shifts.get(&la).copied();
            let mut candidates = reduces.get(&la).cloned().unwrap_or_default();
            // Reduce/reduce: a hint may single out one candidate.
            if candidates.len() > 1 {
                let hinted: Vec<ProdId> = candidates
                    .iter()
                    .copied()
                    .filter(|p| {
                        let end = grammar.production(*p).body.len();
                        grammar.hints.get(&(*p, end)) == Some(&Hint::PreferReduce)
                    })
                    .collect();
                if hinted.len() == 1 {
                    used_hints.insert((hinted[0], grammar.production(hinted[0]).body.len()));
                    conflicts.push(ConflictRecord {
                        state,
                        on: terminal_name(&grammar, la, eof),
                        production: grammar.production_text(hinted[0]),
                        resolution: ConflictResolution::Hint,
                    });
                    candidates = hinted;
                } else {
                    errors.push(
                        GrammarDefect::ReduceReduce {
                            on: terminal_name(&grammar, la, eof),
                            first: grammar.production_text(candidates[0]),
                            second: grammar.production_text(candidates[1]),
                        }
                        .into_diagnostic(),
                    );
                    continue;
                }
            }
            let action = match (shift, candidates.first().copied()) {
                (Some(target), None) => Action::Shift(target),
                (None, Some(prod)) => Action::Reduce(prod),
                (None, None) => continue,
                (Some(target), Some(prod)) => {
                    match resolve_shift_reduce(
                        &grammar,
                        items,
                        state,
                        la,
                        eof,
                        target,
                        prod,
                        &mut used_hints,
                    ) {
                        Ok((action, record)) => {
                            conflicts.push(record);
                            action
                        }
                        Err(defect) => {
                            errors.push(defect.into_diagnostic());
                            continue;
                        }
                    }
                }
            };
            actions[state].insert(la, action);
        }
    }

    // A hint that never took part in resolving a conflict points at a
    // position that is not ambiguous.
    let mut unused: Vec<(ProdId, usize)> = grammar
        .hints
        .keys()
        .copied()
        .filter(|key| !used_hints.contains(key))
        .collect();
    unused.sort();
    for (prod, position) in unused {
        errors.push(
            GrammarDefect::UselessHint {
                production: grammar.production_text(prod),
                position,
            }
            .into_diagnostic(),
        );
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    debug!(
        "compiled {} states, {} resolved conflicts",
        graph.states.len(),
        conflicts.len()
    );
    Ok(CompiledAutomaton {
        grammar,
        actions,
        gotos,
        conflicts,
        eof,
        error,
    })
}

/// Settle one shift/reduce conflict: precedence, then hints, then the
/// default shift.
#[allow(clippy::too_many_arguments)]
fn resolve_shift_reduce(
    grammar: &Grammar,
    items: &ItemSet,
    state: usize,
    la: TermId,
    eof: TermId,
    shift: usize,
    reduce: ProdId,
    used_hints: &mut HashSet<(ProdId, usize)>,
) -> Result<(Action, ConflictRecord), GrammarDefect> {
    let record = |action: Action, resolution: ConflictResolution| {
        (
            action,
            ConflictRecord {
                state,
                on: terminal_name(grammar, la, eof),
                production: grammar.production_text(reduce),
                resolution,
            },
        )
    };
    if let Some(token_prec) = grammar.precedence_of(la) {
        match production_precedence(grammar, reduce) {
            Some(prod_prec) => {
                if prod_prec.level > token_prec.level {
                    return Ok(record(Action::Reduce(reduce), ConflictResolution::Precedence));
                }
                if prod_prec.level < token_prec.level {
                    return Ok(record(Action::Shift(shift), ConflictResolution::Precedence));
                }
                return match prod_prec.assoc {
                    Associativity::Left => {
                        Ok(record(Action::Reduce(reduce), ConflictResolution::Precedence))
                    }
                    Associativity::Right => {
                        Ok(record(Action::Shift(shift), ConflictResolution::Precedence))
                    }
                    Associativity::Neutral => Err(GrammarDefect::NonAssociative(
                        terminal_name(grammar, la, eof),
                    )),
                };
            }
            None => {
                return Ok(record(
                    Action::Precedence {
                        shift,
                        reduce,
                    },
                    ConflictResolution::RuntimePrecedence,
                ));
            }
        }
    }
    let shift_hints: Vec<(ProdId, usize)> = items
        .iter()
        .filter(|item| {
            item.prod < grammar.production_count()
                && grammar.production(ProdId(item.prod)).body.get(item.dot)
                    == Some(&SymbolId::Terminal(la))
                && grammar.hints.get(&(ProdId(item.prod), item.dot)) == Some(&Hint::PreferShift)
        })
        .map(|item| (ProdId(item.prod), item.dot))
        .collect();
    let shift_hinted = !shift_hints.is_empty();
    let end = grammar.production(reduce).body.len();
    let reduce_hinted = grammar.hints.get(&(reduce, end)) == Some(&Hint::PreferReduce);
    match (shift_hinted, reduce_hinted) {
        (true, false) => {
            used_hints.extend(shift_hints);
            Ok(record(Action::Shift(shift), ConflictResolution::Hint))
        }
        (false, true) => {
            used_hints.insert((reduce, end));
            Ok(record(Action::Reduce(reduce), ConflictResolution::Hint))
        }
        (true, true) => Err(GrammarDefect::ShiftReduce {
            on: terminal_name(grammar, la, eof),
            production: grammar.production_text(reduce),
        }),
        (false, false) => Ok(record(Action::Shift(shift), ConflictResolution::DefaultShift)),
    }
}
