//! Comment and line-continuation terminals.

use crate::diagnostics::ScanErrorKind;
use crate::scanner::char_at;
use crate::scanner::match_at;
use crate::scanner::Scan;
use crate::scanner::ScanContext;
use crate::scanner::ScanOutcome;
use crate::token::TokenValue;

pub struct CommentScanner {
    start: String,
    ends: Vec<String>,
    /// Line comments may end at end of input.
    eof_ends: bool,
}

impl CommentScanner {
    /// A block comment: `start … end`, end required.
    pub fn block(start: &str, end: &str) -> CommentScanner {
        CommentScanner {
            start: start.to_string(),
            ends: vec![end.to_string()],
            eof_ends: false,
        }
    }
    /// A line comment: `start` to the end of the line or input.
    pub fn line(start: &str) -> CommentScanner {
        CommentScanner {
            start: start.to_string(),
            ends: vec!["\n".to_string()],
            eof_ends: true,
        }
    }
}

impl Scan for CommentScanner {
    fn try_scan(&self, text: &str, at: usize, _ctx: &ScanContext) -> ScanOutcome {
        if !match_at(text, at, &self.start, true) {
            return ScanOutcome::NoMatch;
        }
        let mut i = self.start.len();
        while at + i < text.len() {
            if let Some(end) = self.ends.iter().find(|e| match_at(text, at + i, e, true)) {
                let body = text[at + self.start.len()..at + i].to_string();
                return ScanOutcome::matched(i + end.len(), TokenValue::Str(body));
            }
            i += char_at(text, at + i).unwrap().len_utf8();
        }
        if self.eof_ends {
            let body = text[at + self.start.len()..at + i].to_string();
            return ScanOutcome::matched(i, TokenValue::Str(body));
        }
        ScanOutcome::failed(i, ScanErrorKind::UnterminatedComment)
    }
}

/// Characters that end a line for continuation purposes.
const LINE_BREAKS: &str = "\n\r\x0b";
/// Whitespace allowed between the continuation symbol and the line break.
const INLINE_WHITESPACE: &str = " \t";

pub struct LineContinuationScanner {
    /// Continuation symbols, kept sorted longest-first.
    starts: Vec<String>,
}

impl Default for LineContinuationScanner {
    fn default() -> Self {
        LineContinuationScanner::new()
    }
}

impl LineContinuationScanner {
    /// The default continuation symbols `\` and `_`.
    pub fn new() -> LineContinuationScanner {
        LineContinuationScanner::with_starts(&["\\", "_"])
    }
    pub fn with_starts(starts: &[&str]) -> LineContinuationScanner {
        let mut starts: Vec<String> = starts.iter().map(|s| s.to_string()).collect();
        starts.sort_by(|a, b| b.len().cmp(&a.len()));
        LineContinuationScanner { starts }
    }
}

impl Scan for LineContinuationScanner {
    fn try_scan(&self, text: &str, at: usize, _ctx: &ScanContext) -> ScanOutcome {
        let Some(start) = self.starts.iter().find(|s| match_at(text, at, s, true)) else {
            return ScanOutcome::NoMatch;
        };
        let mut i = start.len();
        while char_at(text, at + i).is_some_and(|c| INLINE_WHITESPACE.contains(c)) {
            i += 1;
        }
        match char_at(text, at + i) {
            Some(c) if LINE_BREAKS.contains(c) => i += c.len_utf8(),
            _ => return ScanOutcome::failed(i, ScanErrorKind::MissingLineBreak),
        }
        // Consume the indentation of the continued line as well.
        while let Some(c) = char_at(text, at + i) {
            if !INLINE_WHITESPACE.contains(c) && !LINE_BREAKS.contains(c) {
                break;
            }
            i += c.len_utf8();
        }
        ScanOutcome::matched(i, TokenValue::None)
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
    fn block_comment_requires_its_end() {
        let comment = CommentScanner::block("/*", "*/");
        assert_eq!(
            comment.try_scan("/* abc */", 0, &ctx()),
            ScanOutcome::matched(9, TokenValue::Str(" abc ".to_string()))
        );
        assert_eq!(
            comment.try_scan("/* abc", 0, &ctx()),
            ScanOutcome::failed(6, ScanErrorKind::UnterminatedComment)
        );
    }

    #[test]
    fn line_comment_ends_at_newline_or_eof() {
        let comment = CommentScanner::line("//");
        assert_eq!(
            comment.try_scan("// abc\nrest", 0, &ctx()),
            ScanOutcome::matched(7, TokenValue::Str(" abc".to_string()))
        );
        assert_eq!(
            comment.try_scan("// abc", 0, &ctx()),
            ScanOutcome::matched(6, TokenValue::Str(" abc".to_string()))
        );
    }

    #[test]
    fn continuation_requires_a_line_break() {
        let cont = LineContinuationScanner::new();
        assert_eq!(
            cont.try_scan("\\\r\t", 0, &ctx()),
            ScanOutcome::matched(3, TokenValue::None)
        );
        assert_eq!(
            cont.try_scan("\\   garbage", 0, &ctx()),
            ScanOutcome::failed(4, ScanErrorKind::MissingLineBreak)
        );
        assert_eq!(
            cont.try_scan("_", 0, &ctx()),
            ScanOutcome::failed(1, ScanErrorKind::MissingLineBreak)
        );
    }

    #[test]
    fn longest_continuation_symbol_wins() {
        let cont = LineContinuationScanner::with_starts(&["\\continue", "\\cont", "++CONTINUE++"]);
        assert_eq!(
            cont.try_scan("\\cont   \r\n    ", 0, &ctx()),
            ScanOutcome::matched(14, TokenValue::None)
        );
    }
}
