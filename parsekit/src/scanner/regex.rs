//! Regular-expression literals: `/pattern/flags`.

use crate::diagnostics::ScanErrorKind;
use crate::scanner::char_at;
use crate::scanner::Scan;
use crate::scanner::ScanContext;
use crate::scanner::ScanOutcome;
use crate::token::TokenValue;
use regex::RegexBuilder;

pub struct RegexScanner {
    delimiter: char,
}

impl Default for RegexScanner {
    fn default() -> Self {
        RegexScanner::new()
    }
}

impl RegexScanner {
    pub fn new() -> RegexScanner {
        RegexScanner { delimiter: '/' }
    }
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Scan for RegexScanner {
    fn try_scan(&self, text: &str, at: usize, _ctx: &ScanContext) -> ScanOutcome {
        if char_at(text, at) != Some(self.delimiter) {
            return ScanOutcome::NoMatch;
        }
        let mut i = self.delimiter.len_utf8();
        let pattern_start = i;
        let pattern_end;
        loop {
            match char_at(text, at + i) {
                None | Some('\n') => {
                    return ScanOutcome::failed(i, ScanErrorKind::UnterminatedRegex)
                }
                Some('\\') => {
                    i += 1;
                    match char_at(text, at + i) {
                        Some(c) => i += c.len_utf8(),
                        None => return ScanOutcome::failed(i, ScanErrorKind::UnterminatedRegex),
                    }
                }
                Some(c) if c == self.delimiter => {
                    pattern_end = i;
                    i += c.len_utf8();
                    break;
                }
                Some(c) => i += c.len_utf8(),
            }
        }
        let mut builder = RegexBuilder::new(&text[at + pattern_start..at + pattern_end]);
        while let Some(flag) = char_at(text, at + i) {
            if !flag.is_ascii_alphabetic() {
                break;
            }
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                // Flags with no counterpart here (e.g. `g`) are accepted and
                // ignored.
                _ => &mut builder,
            };
            i += 1;
        }
        match builder.build() {
            Ok(regex) => ScanOutcome::matched(i, TokenValue::Regex(regex)),
            Err(e) => ScanOutcome::failed(i, ScanErrorKind::InvalidRegex(e.to_string())),
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
    fn escaped_slash_stays_in_the_pattern() {
        let scanner = RegexScanner::new();
        let outcome = scanner.try_scan("/abc\\\\\\/de/gm  ", 0, &ctx());
        let ScanOutcome::Matched(m) = outcome else {
            panic!("expected a match");
        };
        assert_eq!(m.len, 13);
        let TokenValue::Regex(regex) = m.value else {
            panic!("expected a regex value");
        };
        let found = regex.find("00abc\\/de00").unwrap();
        assert_eq!(found.start(), 2);
    }

    #[test]
    fn unterminated_regex_fails() {
        let scanner = RegexScanner::new();
        assert!(matches!(
            scanner.try_scan("/abc", 0, &ctx()),
            ScanOutcome::Failed(_)
        ));
    }
}
