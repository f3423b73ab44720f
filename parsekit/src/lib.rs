//! parsekit is a grammar-driven parsing toolkit.
//!
//! A language is described declaratively: terminals (each carrying a
//! configurable scanner for its literal form), non-terminals with their
//! productions, operator precedence bands, and disambiguation hints. The
//! toolkit compiles that description once into a deterministic parsing
//! automaton, and then drives the automaton and the tokenizer over input text
//! to produce a parse tree plus an ordered list of positioned diagnostics.
//!
//! The pipeline has three stages:
//!
//! 1. Authoring: [GrammarBuilder] assembles a mutable symbol graph and
//!    freezes it into an immutable [Grammar]. Nothing downstream ever
//!    accepts the mutable form.
//! 2. Compilation: [compile] turns the grammar into a [CompiledAutomaton] —
//!    LR item sets with merged lookaheads, conflict-free shift/reduce/goto
//!    tables. Ambiguities are resolved by operator precedence first, explicit
//!    hints second, and shift-over-reduce last; anything left is reported as
//!    a grammar error and no automaton is produced.
//! 3. Parsing: [CompiledAutomaton::parse] scans and parses one input text.
//!    The automaton is immutable and can be shared across threads; every
//!    parse call owns its own stack, token buffer, and diagnostics.
//!
//! Malformed input is an expected outcome, not an exceptional one: scan and
//! parse failures are recorded as [Diagnostic] values and, where the grammar
//! defines a recovery rule, parsing resynchronizes and continues. Only
//! programming misuse (an unfinished grammar, an invalid scanner
//! configuration) fails eagerly.
//!
//! ```
//! use parsekit::compile;
//! use parsekit::GrammarBuilder;
//! use parsekit::scanner::NumberScanner;
//! use parsekit::ScannerKind;
//!
//! let mut builder = GrammarBuilder::new();
//! let number = builder.terminal("Number", ScannerKind::Number(NumberScanner::new()));
//! let plus = builder.keyword("+");
//! let sum = builder.nonterminal("Sum");
//! builder.rule(sum, &[number.into()]);
//! builder.rule(sum, &[sum.into(), plus.into(), number.into()]);
//! builder.root(sum);
//!
//! let automaton = compile(builder.build().unwrap()).unwrap();
//! let output = automaton.parse("1 + 2 + 3");
//! assert!(!output.has_errors());
//! ```

pub mod compiler;
pub mod diagnostics;
pub mod grammar;
pub mod parser;
pub mod scanner;
#[cfg(feature = "test-utils")]
pub mod tester;
pub mod token;
pub mod tree;

pub use compiler::compile;
pub use compiler::Action;
pub use compiler::CompiledAutomaton;
pub use diagnostics::Diagnostic;
pub use diagnostics::Severity;
pub use grammar::Associativity;
pub use grammar::Grammar;
pub use grammar::GrammarBuilder;
pub use grammar::Hint;
pub use grammar::NtId;
pub use grammar::ProdId;
pub use grammar::SymbolId;
pub use grammar::TermId;
pub use grammar::TokenCategory;
pub use parser::ParseOutput;
pub use parser::ParseStatus;
pub use scanner::CaseRestriction;
pub use scanner::ScannerKind;
pub use token::Token;
pub use token::TokenValue;
pub use tree::ParseTreeNode;
