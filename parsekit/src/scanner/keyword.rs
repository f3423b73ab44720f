//! Fixed-text terminals: keywords, operators, punctuation marks.

use crate::scanner::match_at;
use crate::scanner::Scan;
use crate::scanner::ScanContext;
use crate::scanner::ScanOutcome;
use crate::token::TokenValue;

pub struct KeywordScanner {
    text: String,
}

impl KeywordScanner {
    pub fn new(text: &str) -> KeywordScanner {
        assert!(!text.is_empty(), "keyword text must not be empty");
        KeywordScanner {
            text: text.to_string(),
        }
    }
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Scan for KeywordScanner {
    fn try_scan(&self, text: &str, at: usize, ctx: &ScanContext) -> ScanOutcome {
        if match_at(text, at, &self.text, ctx.case_sensitive) {
            ScanOutcome::matched(self.text.len(), TokenValue::None)
        } else {
            ScanOutcome::NoMatch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(case_sensitive: bool) -> ScanContext {
        ScanContext { case_sensitive }
    }

    #[test]
    fn matches_literal_text() {
        let kw = KeywordScanner::new("end");
        assert_eq!(
            kw.try_scan("end", 0, &ctx(true)),
            ScanOutcome::matched(3, TokenValue::None)
        );
        assert_eq!(kw.try_scan("En", 0, &ctx(true)), ScanOutcome::NoMatch);
    }

    #[test]
    fn case_sensitivity_follows_the_grammar() {
        let kw = KeywordScanner::new("End");
        assert_eq!(kw.try_scan("END", 0, &ctx(true)), ScanOutcome::NoMatch);
        assert_eq!(
            kw.try_scan("END", 0, &ctx(false)),
            ScanOutcome::matched(3, TokenValue::None)
        );
    }
}
