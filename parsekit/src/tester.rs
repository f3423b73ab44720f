//! Test scaffolding, compiled behind the `test-utils` feature.
//!
//! Most scanner behavior is exercised through a skeleton grammar holding a
//! single terminal followed by an optional reserved `end` keyword, so that
//! tokens travel the whole scan-and-parse pipeline instead of being produced
//! by scanner calls in isolation.

use crate::compile;
use crate::compiler::CompiledAutomaton;
use crate::grammar::GrammarBuilder;
use crate::parser::ParseOutput;
use crate::scanner::ScannerKind;
use crate::token::Token;
use tracing::Level;

/// Initialize the subscriber for the tests.
///
/// Cannot take options, since the tests run concurrently.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .without_time()
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// A grammar of one terminal, optionally followed by the reserved word
/// `end`.
pub struct TerminalHarness {
    automaton: CompiledAutomaton,
    terminator: bool,
}

impl TerminalHarness {
    /// The terminal followed by the reserved terminator `end`.
    pub fn new(name: &str, scanner: ScannerKind) -> TerminalHarness {
        TerminalHarness::build(name, scanner, true, true)
    }
    /// Just the terminal, no terminator.
    pub fn bare(name: &str, scanner: ScannerKind) -> TerminalHarness {
        TerminalHarness::build(name, scanner, false, true)
    }
    /// No terminator and no whitespace skipping, for scanners that own
    /// their whitespace (free text, fixed-width fields).
    pub fn raw(name: &str, scanner: ScannerKind) -> TerminalHarness {
        TerminalHarness::build(name, scanner, false, false)
    }
    fn build(
        name: &str,
        scanner: ScannerKind,
        terminator: bool,
        skip_whitespace: bool,
    ) -> TerminalHarness {
        let mut builder = GrammarBuilder::new();
        if !skip_whitespace {
            builder.keep_whitespace();
        }
        let terminal = builder.terminal(name, scanner);
        let root = builder.nonterminal("Root");
        if terminator {
            let end = builder.keyword("end");
            builder.reserve(&[end]);
            builder.rule(root, &[terminal.into(), end.into()]);
        } else {
            builder.rule(root, &[terminal.into()]);
        }
        builder.root(root);
        let grammar = builder.build().expect("harness grammar must build");
        let automaton = match compile(grammar) {
            Ok(automaton) => automaton,
            Err(errors) => {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                panic!("harness grammar must compile:\n{}", messages.join("\n"));
            }
        };
        TerminalHarness {
            automaton,
            terminator,
        }
    }
    pub fn automaton(&self) -> &CompiledAutomaton {
        &self.automaton
    }
    pub fn output(&self, input: &str) -> ParseOutput {
        self.automaton.parse(input)
    }
    /// Parse `input` (with the ` end` terminator appended when the harness
    /// has one) and return the first token. When the first token is an
    /// error token, that is the expected result and it is returned as-is;
    /// otherwise the terminator must have scanned as the second-to-last
    /// token.
    pub fn parse_input(&self, input: &str) -> Token {
        let text = if self.terminator {
            format!("{input} end")
        } else {
            input.to_string()
        };
        let output = self.automaton.parse(&text);
        let first = output
            .tokens
            .first()
            .cloned()
            .expect("scanning always yields at least the end-of-input token");
        if first.is_error() {
            return first;
        }
        if self.terminator {
            let count = output.tokens.len();
            assert!(
                count >= 3,
                "expected terminal, terminator and end-of-input for {input:?}"
            );
            assert_eq!(
                output.tokens[count - 2].text, "end",
                "terminator not found as second-to-last token for {input:?}"
            );
        }
        first
    }
    /// Parse `input` exactly as given and return the first token.
    pub fn parse_raw(&self, input: &str) -> Token {
        let output = self.automaton.parse(input);
        output
            .tokens
            .first()
            .cloned()
            .expect("scanning always yields at least the end-of-input token")
    }
}
