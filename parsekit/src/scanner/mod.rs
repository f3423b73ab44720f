//! The tokenizer framework.
//!
//! Every terminal owns one scanner: a pure function from (source, position)
//! to a match, a non-match, or a scan failure, driven entirely by
//! configuration fixed at construction. Scanners never see each other; the
//! [Lexer] tries each terminal at the current position and keeps the best
//! match (longest lexeme, then highest priority, then declaration order).
//!
//! New literal kinds are added as new [ScannerKind] variants implementing
//! [Scan] — a closed union, dispatched exhaustively.

mod comment;
mod data;
mod free_text;
mod identifier;
mod keyword;
mod number;
mod regex;
mod source;
mod string;

pub use comment::CommentScanner;
pub use comment::LineContinuationScanner;
pub use data::Date;
pub use data::DsvScanner;
pub use data::FixedLengthScanner;
pub use data::QuotedValueScanner;
pub use data::ValueKind;
pub use free_text::FreeTextScanner;
pub use identifier::CaseRestriction;
pub use identifier::IdentifierScanner;
pub use keyword::KeywordScanner;
pub use number::FloatKind;
pub use number::IntKind;
pub use number::NumberScanner;
pub use number::NumKind;
pub use regex::RegexScanner;
pub use source::Location;
pub use source::Span;
pub use string::StringScanner;

pub(crate) use source::char_at;
pub(crate) use source::match_at;

use crate::compiler::CompiledAutomaton;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::ScanErrorKind;
use crate::diagnostics::Severity;
use crate::grammar::TermId;
use crate::grammar::TokenCategory;
use crate::token::Token;
use crate::token::TokenValue;
use tracing::trace;

/// Per-parse facts a scanner may consult. Scanners hold no state of their
/// own beyond construction-time configuration.
#[derive(Clone, Copy)]
pub struct ScanContext {
    pub case_sensitive: bool,
}

/// A successful scan: the decoded value and the lexeme length in bytes.
#[derive(Debug, PartialEq)]
pub struct ScanMatch {
    pub len: usize,
    pub value: TokenValue,
}

/// A failed scan of a lexeme this scanner does own (an unterminated string,
/// an overflowing number). `len` is how much input the failure spans.
#[derive(Debug, PartialEq)]
pub struct ScanFailure {
    pub len: usize,
    pub kind: ScanErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ScanOutcome {
    Matched(ScanMatch),
    NoMatch,
    Failed(ScanFailure),
}

impl ScanOutcome {
    pub(crate) fn matched(len: usize, value: TokenValue) -> ScanOutcome {
        ScanOutcome::Matched(ScanMatch { len, value })
    }
    pub(crate) fn failed(len: usize, kind: ScanErrorKind) -> ScanOutcome {
        ScanOutcome::Failed(ScanFailure { len, kind })
    }
}

/// The scanning contract every literal kind implements.
pub trait Scan {
    /// Try to scan one token at byte offset `at` of `text`. Must not look
    /// behind `at` and must not consume input on [ScanOutcome::NoMatch].
    fn try_scan(&self, text: &str, at: usize, ctx: &ScanContext) -> ScanOutcome;
}

/// The closed union of literal scanners.
pub enum ScannerKind {
    Keyword(KeywordScanner),
    Number(NumberScanner),
    String(StringScanner),
    Identifier(IdentifierScanner),
    FreeText(FreeTextScanner),
    Comment(CommentScanner),
    LineContinuation(LineContinuationScanner),
    Dsv(DsvScanner),
    FixedLength(FixedLengthScanner),
    QuotedValue(QuotedValueScanner),
    Regex(RegexScanner),
}

impl ScannerKind {
    /// The token category terminals of this kind produce.
    pub fn category(&self) -> TokenCategory {
        match self {
            ScannerKind::Comment(_) => TokenCategory::Comment,
            ScannerKind::LineContinuation(_) => TokenCategory::Outline,
            _ => TokenCategory::Normal,
        }
    }
}

impl Scan for ScannerKind {
    fn try_scan(&self, text: &str, at: usize, ctx: &ScanContext) -> ScanOutcome {
        match self {
            ScannerKind::Keyword(s) => s.try_scan(text, at, ctx),
            ScannerKind::Number(s) => s.try_scan(text, at, ctx),
            ScannerKind::String(s) => s.try_scan(text, at, ctx),
            ScannerKind::Identifier(s) => s.try_scan(text, at, ctx),
            ScannerKind::FreeText(s) => s.try_scan(text, at, ctx),
            ScannerKind::Comment(s) => s.try_scan(text, at, ctx),
            ScannerKind::LineContinuation(s) => s.try_scan(text, at, ctx),
            ScannerKind::Dsv(s) => s.try_scan(text, at, ctx),
            ScannerKind::FixedLength(s) => s.try_scan(text, at, ctx),
            ScannerKind::QuotedValue(s) => s.try_scan(text, at, ctx),
            ScannerKind::Regex(s) => s.try_scan(text, at, ctx),
        }
    }
}

const WHITESPACE: &str = " \t\r\n\x0b\x0c";

/// Drives the scanners over one input text, producing the token stream.
///
/// The lexer owns all per-input scanning state: position, line/column
/// tracking, and the bracket stack for registered brace pairs. Scan failures
/// are appended to `diagnostics` and surface as error-category tokens so the
/// parser sees malformed lexemes too.
pub(crate) struct Lexer<'a> {
    automaton: &'a CompiledAutomaton,
    text: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    brackets: Vec<TermId>,
}

impl<'a> Lexer<'a> {
    pub fn new(automaton: &'a CompiledAutomaton, text: &'a str) -> Lexer<'a> {
        Lexer {
            automaton,
            text,
            pos: 0,
            line: 0,
            column: 0,
            brackets: vec![],
        }
    }
    fn location(&self) -> Location {
        Location::new(self.line, self.column, self.pos)
    }
    fn advance(&mut self, len: usize) {
        for c in self.text[self.pos..self.pos + len].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.pos += len;
    }
    fn skip_whitespace(&mut self) {
        if !self.automaton.grammar().skip_whitespace {
            return;
        }
        while let Some(c) = char_at(self.text, self.pos) {
            if !WHITESPACE.contains(c) {
                break;
            }
            self.advance(c.len_utf8());
        }
    }
    fn make_token(&self, term: TermId, category: TokenCategory, len: usize, value: TokenValue) -> Token {
        Token {
            term,
            category,
            text: self.text[self.pos..self.pos + len].to_string(),
            value,
            span: Span::new(self.pos, self.pos + len),
            location: self.location(),
        }
    }
    fn eof_token(&self) -> Token {
        Token {
            term: self.automaton.eof_term(),
            category: TokenCategory::Normal,
            text: String::new(),
            value: TokenValue::None,
            span: Span::new(self.pos, self.pos),
            location: self.location(),
        }
    }
    /// How much input an unmatchable region spans: up to the next whitespace
    /// character, at least one character.
    fn error_len(&self) -> usize {
        let rest = &self.text[self.pos..];
        let mut len = 0;
        for c in rest.chars() {
            if len > 0 && WHITESPACE.contains(c) {
                break;
            }
            len += c.len_utf8();
        }
        len.max(rest.chars().next().map_or(1, char::len_utf8))
    }
    fn check_brackets(&mut self, term: TermId, diagnostics: &mut Vec<Diagnostic>) {
        let grammar = self.automaton.grammar();
        if grammar.closing_bracket(term).is_some() {
            self.brackets.push(term);
            return;
        }
        if !grammar.is_closing_bracket(term) {
            return;
        }
        let expected = self
            .brackets
            .pop()
            .and_then(|open| grammar.closing_bracket(open));
        if expected != Some(term) {
            let kind = ScanErrorKind::MismatchedBracket {
                found: grammar.terminal(term).name.clone(),
                expected: expected
                    .map(|t| grammar.terminal(t).name.clone())
                    .unwrap_or_else(|| "<none>".to_string()),
            };
            diagnostics.push(Diagnostic::new(
                Severity::ScanError,
                self.location(),
                kind.to_string(),
            ));
        }
    }
    /// Produce the next token. Always succeeds; scan failures become
    /// error-category tokens with a recorded diagnostic. Past the end of
    /// input, returns end-of-input tokens indefinitely.
    pub fn next(&mut self, diagnostics: &mut Vec<Diagnostic>) -> Token {
        self.skip_whitespace();
        if self.pos >= self.text.len() {
            return self.eof_token();
        }
        let grammar = self.automaton.grammar();
        let ctx = ScanContext {
            case_sensitive: grammar.case_sensitive,
        };
        let mut best: Option<(TermId, ScanMatch, i16)> = None;
        let mut failure: Option<ScanFailure> = None;
        for index in 0..grammar.terminal_count() {
            let id = TermId(index);
            let terminal = grammar.terminal(id);
            match terminal.scanner.try_scan(self.text, self.pos, &ctx) {
                ScanOutcome::Matched(m) => {
                    let better = match &best {
                        None => true,
                        Some((_, b, priority)) => {
                            m.len > b.len || (m.len == b.len && terminal.priority > *priority)
                        }
                    };
                    if better {
                        best = Some((id, m, terminal.priority));
                    }
                }
                ScanOutcome::Failed(f) => {
                    if failure.is_none() {
                        failure = Some(f);
                    }
                }
                ScanOutcome::NoMatch => {}
            }
        }
        if let Some((term, m, _)) = best {
            let terminal = grammar.terminal(term);
            trace!("scanned {} \"{}\"", terminal.name, &self.text[self.pos..self.pos + m.len]);
            let token = self.make_token(term, terminal.category, m.len, m.value);
            self.check_brackets(term, diagnostics);
            self.advance(m.len);
            return token;
        }
        let (len, kind) = match failure {
            Some(f) => (f.len.max(1), f.kind),
            None => {
                let len = self.error_len();
                (
                    len,
                    ScanErrorKind::UnexpectedInput(self.text[self.pos..self.pos + len].to_string()),
                )
            }
        };
        diagnostics.push(Diagnostic::new(
            Severity::ScanError,
            self.location(),
            kind.to_string(),
        ));
        let token = self.make_token(
            self.automaton.error_term(),
            TokenCategory::Error,
            len,
            TokenValue::None,
        );
        self.advance(len);
        token
    }
}
