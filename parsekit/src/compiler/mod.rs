//! The grammar compiler.
//!
//! Consumes a [Grammar] once and produces the immutable [CompiledAutomaton],
//! or the full list of grammar errors when the grammar cannot be made
//! deterministic. Same grammar, same tables, same conflict set — compilation
//! has no hidden state.

mod items;
mod sets;
mod tables;

pub use tables::Action;
pub use tables::CompiledAutomaton;
pub use tables::ConflictRecord;
pub use tables::ConflictResolution;

use crate::diagnostics::Diagnostic;
use crate::diagnostics::GrammarDefect;
use crate::grammar::Grammar;
use crate::grammar::NtId;
use crate::grammar::SymbolId;
use crate::grammar::TermId;
use items::StateBuilder;
use sets::Analysis;
use std::collections::HashSet;
use std::collections::VecDeque;
use tracing::debug;

/// Structural checks that precede automaton construction.
fn validate(grammar: &Grammar) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for index in 0..grammar.nonterminal_count() {
        let nt = grammar.nonterminal(NtId(index));
        if nt.productions.is_empty() {
            errors.push(GrammarDefect::NoProductions(nt.name.clone()).into_diagnostic());
        }
    }
    if !errors.is_empty() {
        return errors;
    }
    // Reachability from the root, through production bodies and recovery
    // tails. Non-grammar terminals are scanned without appearing in any
    // production, so they are exempt.
    let mut seen_nts: HashSet<usize> = HashSet::new();
    let mut seen_terms: HashSet<usize> = HashSet::new();
    let mut work = VecDeque::from([grammar.root()]);
    seen_nts.insert(grammar.root().index());
    while let Some(nt) = work.pop_front() {
        let mut visit = |symbols: &[SymbolId]| -> Vec<NtId> {
            let mut next = vec![];
            for symbol in symbols {
                match symbol {
                    SymbolId::Terminal(t) => {
                        seen_terms.insert(t.index());
                    }
                    SymbolId::NonTerminal(n) => {
                        next.push(*n);
                    }
                }
            }
            next
        };
        let nonterminal = grammar.nonterminal(nt);
        let mut found = vec![];
        for prod in &nonterminal.productions {
            found.extend(visit(&grammar.production(*prod).body));
        }
        if let Some(recovery) = &nonterminal.recovery {
            found.extend(visit(&recovery.tail));
        }
        for next in found {
            if seen_nts.insert(next.index()) {
                work.push_back(next);
            }
        }
    }
    for index in 0..grammar.nonterminal_count() {
        if !seen_nts.contains(&index) {
            errors.push(
                GrammarDefect::Unreachable(grammar.nonterminal(NtId(index)).name.clone())
                    .into_diagnostic(),
            );
        }
    }
    for index in 0..grammar.terminal_count() {
        let id = TermId(index);
        if !seen_terms.contains(&index) && !grammar.is_non_grammar(id) {
            errors.push(
                GrammarDefect::Unreachable(grammar.terminal(id).name.clone()).into_diagnostic(),
            );
        }
    }
    errors
}

/// Compile a grammar into its parsing automaton.
///
/// On failure every detected grammar error is returned; none of them are
/// recoverable by the caller other than by fixing the grammar.
pub fn compile(grammar: Grammar) -> Result<CompiledAutomaton, Vec<Diagnostic>> {
    let errors = validate(&grammar);
    if !errors.is_empty() {
        return Err(errors);
    }
    let eof = TermId(grammar.terminal_count());
    let error = TermId(grammar.terminal_count() + 1);
    let analysis = Analysis::compute(&grammar, eof);
    let graph = StateBuilder::new(&grammar, &analysis, eof).build();
    debug!("constructed {} LR states", graph.states.len());
    tables::emit(grammar, &analysis, &graph, eof, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;
    use crate::scanner::IdentifierScanner;
    use crate::scanner::ScannerKind;

    #[test]
    fn unreachable_symbols_are_grammar_errors() {
        let mut builder = GrammarBuilder::new();
        let id = builder.terminal("id", ScannerKind::Identifier(IdentifierScanner::new()));
        let orphan = builder.terminal(
            "orphan",
            ScannerKind::Identifier(IdentifierScanner::new()),
        );
        let root = builder.nonterminal("root");
        builder.rule(root, &[id.into()]);
        builder.root(root);
        let _ = orphan;
        let errors = compile(builder.build().unwrap()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("orphan"));
    }

    #[test]
    fn a_plain_grammar_compiles() {
        let mut builder = GrammarBuilder::new();
        let id = builder.terminal("id", ScannerKind::Identifier(IdentifierScanner::new()));
        let semi = builder.keyword(";");
        let stmt = builder.nonterminal("stmt");
        let list = builder.nonterminal("list");
        builder.rule(stmt, &[id.into(), semi.into()]);
        builder.star_rule(list, stmt.into());
        builder.root(list);
        let automaton = compile(builder.build().unwrap()).unwrap();
        assert!(automaton.conflicts().is_empty());
        assert!(automaton.state_count() > 3);
    }
}
