//! Free-text literals: scan until a terminator string (or end of input,
//! when admitted), applying an escape table along the way.

use crate::scanner::match_at;
use crate::scanner::char_at;
use crate::scanner::Scan;
use crate::scanner::ScanContext;
use crate::scanner::ScanOutcome;
use crate::token::TokenValue;

pub struct FreeTextScanner {
    terminators: Vec<String>,
    escapes: Vec<(String, String)>,
    /// Strings the text must begin with; consumed, but excluded from the
    /// value.
    firsts: Vec<String>,
    allow_eof: bool,
}

impl FreeTextScanner {
    pub fn new(terminators: &[&str]) -> FreeTextScanner {
        FreeTextScanner {
            terminators: terminators.iter().map(|t| t.to_string()).collect(),
            escapes: vec![],
            firsts: vec![],
            allow_eof: false,
        }
    }
    /// End of input counts as a terminator.
    pub fn allow_eof(mut self) -> Self {
        self.allow_eof = true;
        self
    }
    pub fn with_escape(mut self, from: &str, to: &str) -> Self {
        self.escapes.push((from.to_string(), to.to_string()));
        self
    }
    pub fn with_first(mut self, text: &str) -> Self {
        self.firsts.push(text.to_string());
        self
    }
}

impl Scan for FreeTextScanner {
    fn try_scan(&self, text: &str, at: usize, _ctx: &ScanContext) -> ScanOutcome {
        let mut i = 0;
        if !self.firsts.is_empty() {
            match self.firsts.iter().find(|f| match_at(text, at, f, true)) {
                Some(first) => i += first.len(),
                None => return ScanOutcome::NoMatch,
            }
        }
        let mut out = String::new();
        'outer: loop {
            if at + i >= text.len() {
                if self.allow_eof {
                    return ScanOutcome::matched(i, TokenValue::Str(out));
                }
                return ScanOutcome::NoMatch;
            }
            for (from, to) in &self.escapes {
                if match_at(text, at + i, from, true) {
                    out.push_str(to);
                    i += from.len();
                    continue 'outer;
                }
            }
            // The terminator itself stays in the input for the next scanner.
            if self.terminators.iter().any(|t| match_at(text, at + i, t, true)) {
                return ScanOutcome::matched(i, TokenValue::Str(out));
            }
            let c = char_at(text, at + i).unwrap();
            out.push(c);
            i += c.len_utf8();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ScanContext {
        ScanContext {
            case_sensitive: true,
        }
    }

    #[test]
    fn escapes_hide_terminators() {
        let scanner = FreeTextScanner::new(&[",", ")"])
            .with_escape("\\\\", "\\")
            .with_escape("\\,", ",")
            .with_escape("\\)", ")");
        let outcome = scanner.try_scan("abc\\\\de\\,\\)fg,", 0, &ctx());
        assert_eq!(
            outcome,
            ScanOutcome::matched(13, TokenValue::Str("abc\\de,)fg".to_string()))
        );
    }

    #[test]
    fn firsts_are_consumed_but_not_part_of_the_value() {
        let scanner = FreeTextScanner::new(&["END_VAR"]).with_first("VAR");
        let outcome = scanner.try_scan("VAR x;END_VAR", 0, &ctx());
        assert_eq!(
            outcome,
            ScanOutcome::matched(6, TokenValue::Str(" x;".to_string()))
        );
    }

    #[test]
    fn eof_terminates_when_allowed() {
        let scanner = FreeTextScanner::new(&[";"]).allow_eof();
        let outcome = scanner.try_scan("abcdefg", 0, &ctx());
        assert_eq!(
            outcome,
            ScanOutcome::matched(7, TokenValue::Str("abcdefg".to_string()))
        );
        let strict = FreeTextScanner::new(&[";"]);
        assert_eq!(strict.try_scan("abcdefg", 0, &ctx()), ScanOutcome::NoMatch);
    }
}
