//! Identifier terminals: character-class rules for first and subsequent
//! characters, case-restriction policies, and unicode escape decoding.

use crate::scanner::char_at;
use crate::scanner::Scan;
use crate::scanner::ScanContext;
use crate::scanner::ScanOutcome;
use crate::token::TokenValue;

/// The case pattern an identifier lexeme must satisfy. Uncased characters
/// (digits, underscores) are neutral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseRestriction {
    None,
    FirstUpper,
    FirstLower,
    AllUpper,
    AllLower,
}

pub struct IdentifierScanner {
    extra_first: String,
    extra_rest: String,
    case_restriction: CaseRestriction,
    unicode_escapes: bool,
}

impl Default for IdentifierScanner {
    fn default() -> Self {
        IdentifierScanner::new()
    }
}

impl IdentifierScanner {
    /// Alphabetic first character, alphanumeric rest, underscore allowed in
    /// both positions.
    pub fn new() -> IdentifierScanner {
        IdentifierScanner {
            extra_first: "_".to_string(),
            extra_rest: "_".to_string(),
            case_restriction: CaseRestriction::None,
            unicode_escapes: false,
        }
    }
    /// C-family identifiers: also decodes `\u`/`\U` escapes inside the
    /// lexeme.
    pub fn c_like() -> IdentifierScanner {
        IdentifierScanner::new().with_unicode_escapes()
    }
    pub fn with_extra_chars(mut self, first: &str, rest: &str) -> Self {
        self.extra_first = first.to_string();
        self.extra_rest = rest.to_string();
        self
    }
    pub fn with_case_restriction(mut self, restriction: CaseRestriction) -> Self {
        self.case_restriction = restriction;
        self
    }
    pub fn with_unicode_escapes(mut self) -> Self {
        self.unicode_escapes = true;
        self
    }

    fn case_ok(&self, decoded: &str) -> bool {
        let mut chars = decoded.chars();
        match self.case_restriction {
            CaseRestriction::None => true,
            CaseRestriction::FirstUpper => chars.next().is_some_and(|c| !c.is_lowercase()),
            CaseRestriction::FirstLower => chars.next().is_some_and(|c| !c.is_uppercase()),
            CaseRestriction::AllUpper => chars.all(|c| !c.is_lowercase()),
            CaseRestriction::AllLower => chars.all(|c| !c.is_uppercase()),
        }
    }
    /// Decode a `\uXXXX`/`\UXXXXXXXX` escape at `at` (pointing at the
    /// backslash). Returns the char and the bytes consumed.
    fn decode_unicode(text: &str, at: usize) -> Option<(char, usize)> {
        let marker = char_at(text, at + 1)?;
        let width = match marker {
            'u' => 4,
            'U' => 8,
            _ => return None,
        };
        let digits = text.get(at + 2..at + 2 + width)?;
        let code = u32::from_str_radix(digits, 16).ok()?;
        char::from_u32(code).map(|c| (c, 2 + width))
    }
}

impl Scan for IdentifierScanner {
    fn try_scan(&self, text: &str, at: usize, _ctx: &ScanContext) -> ScanOutcome {
        let mut i = 0;
        let mut decoded = String::new();
        loop {
            let unit = if self.unicode_escapes && char_at(text, at + i) == Some('\\') {
                IdentifierScanner::decode_unicode(text, at + i)
            } else {
                None
            };
            let (c, consumed) = match unit {
                Some(u) => u,
                None => match char_at(text, at + i) {
                    Some(c) => (c, c.len_utf8()),
                    None => break,
                },
            };
            let ok = if decoded.is_empty() {
                c.is_alphabetic() || self.extra_first.contains(c)
            } else {
                c.is_alphanumeric() || self.extra_rest.contains(c)
            };
            if !ok {
                break;
            }
            decoded.push(c);
            i += consumed;
        }
        if decoded.is_empty() {
            return ScanOutcome::NoMatch;
        }
        if !self.case_ok(&decoded) {
            return ScanOutcome::NoMatch;
        }
        ScanOutcome::matched(i, TokenValue::Str(decoded))
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
    fn decodes_unicode_escapes() {
        let id = IdentifierScanner::c_like();
        let outcome = id.try_scan("_\\u0061bc ", 0, &ctx());
        assert_eq!(
            outcome,
            ScanOutcome::matched(9, TokenValue::Str("_abc".to_string()))
        );
    }

    #[test]
    fn digits_cannot_start_an_identifier() {
        let id = IdentifierScanner::new();
        assert_eq!(id.try_scan("0abc", 0, &ctx()), ScanOutcome::NoMatch);
    }

    #[test]
    fn case_restrictions() {
        let id = IdentifierScanner::new().with_case_restriction(CaseRestriction::AllUpper);
        assert_eq!(id.try_scan("EFg", 0, &ctx()), ScanOutcome::NoMatch);
        assert_eq!(
            id.try_scan("EFG", 0, &ctx()),
            ScanOutcome::matched(3, TokenValue::Str("EFG".to_string()))
        );
    }
}
