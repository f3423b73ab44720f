//! The parse engine: a table-driven driver over the compiled automaton.
//!
//! Each call owns its whole state (stack, lookahead, token buffer,
//! diagnostics); the automaton itself is only read. Malformed input never
//! aborts the engine — scan failures arrive as error-category tokens, parse
//! failures go through error recovery, and everything is reported in the
//! returned diagnostics.

use crate::compiler::Action;
use crate::compiler::CompiledAutomaton;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::Severity;
use crate::grammar::Associativity;
use crate::grammar::NtId;
use crate::grammar::ProdId;
use crate::grammar::SymbolId;
use crate::scanner::Lexer;
use crate::scanner::Span;
use crate::token::Token;
use crate::tree::ParseTreeNode;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseStatus {
    /// The input parsed without a single diagnostic.
    Parsed,
    /// The input parsed to the end, with recovered errors along the way.
    ParsedWithErrors,
    /// Parsing halted before the end of input; the tree is partial.
    Failed,
}

/// Everything one parse call produces.
pub struct ParseOutput {
    pub root: Option<ParseTreeNode>,
    /// Every token scanned, in input order — including comment, outline,
    /// and error tokens.
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
    pub status: ParseStatus,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
    pub fn error_count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl CompiledAutomaton {
    /// Parse one input text.
    pub fn parse(&self, text: &str) -> ParseOutput {
        ParseSession::new(self, text).run()
    }
    /// Scan one input text without parsing it: the token-stream entry point
    /// for callers that only need lexical analysis.
    pub fn tokenize(&self, text: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut lexer = Lexer::new(self, text);
        let mut tokens = vec![];
        let mut diagnostics = vec![];
        loop {
            let token = lexer.next(&mut diagnostics);
            let done = token.term == self.eof_term();
            tokens.push(token);
            if done {
                return (tokens, diagnostics);
            }
        }
    }
}

struct StackEntry {
    state: usize,
    node: Option<ParseTreeNode>,
}

struct ParseSession<'a> {
    automaton: &'a CompiledAutomaton,
    lexer: Lexer<'a>,
    stack: Vec<StackEntry>,
    lookahead: Option<Token>,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ParseSession<'a> {
    fn new(automaton: &'a CompiledAutomaton, text: &'a str) -> ParseSession<'a> {
        ParseSession {
            automaton,
            lexer: Lexer::new(automaton, text),
            stack: vec![StackEntry {
                state: 0,
                node: None,
            }],
            lookahead: None,
            tokens: vec![],
            diagnostics: vec![],
        }
    }
    fn state(&self) -> usize {
        self.stack.last().unwrap().state
    }
    /// The next token the automaton should see. Non-grammar terminals
    /// (comments, line continuations) are recorded and skipped.
    fn next_parse_token(&mut self) -> Token {
        loop {
            let token = self.lexer.next(&mut self.diagnostics);
            self.tokens.push(token.clone());
            if !self.automaton.grammar().is_non_grammar(token.term) {
                return token;
            }
        }
    }
    fn take_token(&mut self) -> Token {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.next_parse_token(),
        }
    }
    fn run(mut self) -> ParseOutput {
        let root = loop {
            let token = self.take_token();
            match self.automaton.action(self.state(), token.term) {
                Some(Action::Shift(target)) => self.shift(token, target),
                Some(Action::Reduce(prod)) => {
                    self.reduce(prod, token.span.start);
                    self.lookahead = Some(token);
                }
                Some(Action::Accept) => {
                    let entry = self.stack.pop().unwrap();
                    break entry.node;
                }
                Some(Action::Precedence { shift, reduce }) => {
                    if self.should_shift(&token) {
                        self.shift(token, shift);
                    } else {
                        self.reduce(reduce, token.span.start);
                        self.lookahead = Some(token);
                    }
                }
                None => {
                    self.report_syntax_error(&token);
                    if !self.recover(token) {
                        return self.finish(None, ParseStatus::Failed);
                    }
                }
            }
        };
        let status = if self.diagnostics.is_empty() {
            ParseStatus::Parsed
        } else {
            ParseStatus::ParsedWithErrors
        };
        self.finish(root, status)
    }
    fn finish(mut self, root: Option<ParseTreeNode>, status: ParseStatus) -> ParseOutput {
        // On failure the deepest completed subtree is the partial result.
        let root = match root {
            Some(root) => Some(root),
            None => self
                .stack
                .iter_mut()
                .rev()
                .find_map(|entry| entry.node.take()),
        };
        ParseOutput {
            root,
            tokens: self.tokens,
            diagnostics: self.diagnostics,
            status,
        }
    }
    fn shift(&mut self, token: Token, target: usize) {
        trace!("shift \"{}\"", token.text);
        let node = ParseTreeNode::leaf(SymbolId::Terminal(token.term), token);
        self.stack.push(StackEntry {
            state: target,
            node: Some(node),
        });
    }
    /// Fold one child into the node under construction: punctuation tokens
    /// are dropped, list-recursive and transient children are spliced.
    fn absorb(&self, head: NtId, child: ParseTreeNode, out: &mut Vec<ParseTreeNode>) {
        let grammar = self.automaton.grammar();
        if let Some(token) = &child.token {
            if grammar.is_punctuation(token.term) {
                return;
            }
            out.push(child);
            return;
        }
        match child.symbol {
            SymbolId::NonTerminal(nt)
                if nt == head && grammar.nonterminal(head).is_list =>
            {
                out.extend(child.children);
            }
            SymbolId::NonTerminal(nt) if grammar.is_transient(nt) => {
                out.extend(child.children);
            }
            _ => out.push(child),
        }
    }
    fn reduce(&mut self, prod: ProdId, at: usize) {
        let grammar = self.automaton.grammar();
        let head = grammar.production(prod).head;
        let arity = grammar.production(prod).body.len();
        trace!("reduce {}", grammar.production_text(prod));
        let popped = self.stack.split_off(self.stack.len() - arity);
        let mut children: Vec<ParseTreeNode> = vec![];
        for entry in popped {
            if let Some(node) = entry.node {
                self.absorb(head, node, &mut children);
            }
        }
        let span = children
            .iter()
            .map(|c| c.span)
            .reduce(|a, b| a.cover(b))
            .unwrap_or(Span::new(at, at));
        let node = if grammar.is_transient(head) && children.len() == 1 {
            children.pop().unwrap()
        } else {
            ParseTreeNode {
                symbol: SymbolId::NonTerminal(head),
                span,
                token: None,
                children,
                recovered: false,
            }
        };
        let base = self.state();
        let target = self
            .automaton
            .goto(base, head)
            .unwrap_or_else(|| unreachable!("no goto after reducing to {}", grammar.nonterminal(head).name));
        self.stack.push(StackEntry {
            state: target,
            node: Some(node),
        });
    }
    /// Runtime arbitration of an operator conflict: compare the lookahead
    /// against the most recent operator token on the stack. A tighter
    /// lookahead shifts; a tighter (or equally tight, left-associative)
    /// stack operator reduces. With no stack operator, shift.
    fn should_shift(&self, token: &Token) -> bool {
        let grammar = self.automaton.grammar();
        let Some(incoming) = grammar.precedence_of(token.term) else {
            return true;
        };
        for entry in self.stack.iter().rev() {
            let Some(node) = &entry.node else { continue };
            let Some(stack_token) = &node.token else {
                continue;
            };
            let Some(on_stack) = grammar.precedence_of(stack_token.term) else {
                continue;
            };
            if incoming.level != on_stack.level {
                return incoming.level > on_stack.level;
            }
            return matches!(on_stack.assoc, Associativity::Right);
        }
        true
    }
    fn report_syntax_error(&mut self, token: &Token) {
        let found = if token.term == self.automaton.eof_term() {
            "<end of input>".to_string()
        } else {
            format!("\"{}\"", token.text)
        };
        let expected = self.automaton.expected_in(self.state()).join(", ");
        let message = if expected.is_empty() {
            format!("syntax error: unexpected {found}")
        } else {
            format!("syntax error: unexpected {found}, expected one of: {expected}")
        };
        self.diagnostics.push(Diagnostic::new(
            Severity::ParseError,
            token.location,
            message,
        ));
    }
    /// Resynchronize after a syntax error.
    ///
    /// Finds the innermost stack position offering a goto on a non-terminal
    /// with a recovery rule, discards input up to the rule's synchronization
    /// terminal, consumes the tail, and pushes an error-flagged node for the
    /// recovered non-terminal. Returns false when no recovery applies or the
    /// input ends first.
    fn recover(&mut self, mut token: Token) -> bool {
        let grammar = self.automaton.grammar();
        let mut found: Option<(usize, NtId)> = None;
        'stack: for index in (0..self.stack.len()).rev() {
            let state = self.stack[index].state;
            for nt_index in 0..grammar.nonterminal_count() {
                let nt = NtId(nt_index);
                if grammar.nonterminal(nt).recovery.is_some()
                    && self.automaton.goto(state, nt).is_some()
                {
                    found = Some((index, nt));
                    break 'stack;
                }
            }
        }
        let Some((index, nt)) = found else {
            return false;
        };
        let tail = grammar.nonterminal(nt).recovery.as_ref().unwrap().tail.clone();
        let SymbolId::Terminal(sync) = tail[0] else {
            unreachable!("recovery rules synchronize on a terminal");
        };
        loop {
            if token.term == self.automaton.eof_term() {
                return false;
            }
            if token.term == sync {
                break;
            }
            token = self.next_parse_token();
        }
        trace!("recovered at \"{}\"", token.text);
        let span = token.span;
        for symbol in &tail[1..] {
            let next = self.next_parse_token();
            let matches_tail = matches!(symbol, SymbolId::Terminal(t) if *t == next.term);
            if !matches_tail {
                self.lookahead = Some(next);
                break;
            }
        }
        self.stack.truncate(index + 1);
        let base = self.stack[index].state;
        let target = self.automaton.goto(base, nt).unwrap();
        self.stack.push(StackEntry {
            state: target,
            node: Some(ParseTreeNode {
                symbol: SymbolId::NonTerminal(nt),
                span,
                token: None,
                children: vec![],
                recovered: true,
            }),
        });
        true
    }
}
