//! Quoted string and character literals.
//!
//! Configuration covers the dialect space: several delimiter pairs (longest
//! matched first, triple-quoted pairs marking multi-line mode), an escape
//! character with a substitution table, unicode/hex/octal escape options,
//! raw prefixes that disable escape processing, the doubled-delimiter escape
//! (`""` inside a `"`-string), char mode, and char suffixes.

use crate::diagnostics::ScanErrorKind;
use crate::scanner::char_at;
use crate::scanner::match_at;
use crate::scanner::Scan;
use crate::scanner::ScanContext;
use crate::scanner::ScanOutcome;
use crate::token::TokenValue;

#[derive(Clone)]
struct Delimiter {
    start: String,
    end: String,
    multiline: bool,
}

#[derive(Clone)]
struct RawPrefix {
    text: String,
    allow_newline: bool,
}

pub struct StringScanner {
    delimiters: Vec<Delimiter>,
    escape_char: Option<char>,
    escapes: Vec<(char, char)>,
    unicode_escapes: bool,
    hex_escapes: bool,
    octal_escapes: bool,
    raw_prefixes: Vec<RawPrefix>,
    doubled_delimiter: bool,
    char_mode: bool,
    char_suffixes: Vec<String>,
}

/// The escape table shared by the C and Python dialects. An escaped line
/// break decodes to the line break itself.
fn standard_escapes() -> Vec<(char, char)> {
    vec![
        ('a', '\x07'),
        ('b', '\x08'),
        ('f', '\x0c'),
        ('n', '\n'),
        ('r', '\r'),
        ('t', '\t'),
        ('v', '\x0b'),
        ('0', '\0'),
        ('\'', '\''),
        ('"', '"'),
        ('\\', '\\'),
        ('\n', '\n'),
    ]
}

impl StringScanner {
    /// A single delimiter pair with standard escapes.
    pub fn new(quote: &str) -> StringScanner {
        StringScanner {
            delimiters: vec![Delimiter {
                start: quote.to_string(),
                end: quote.to_string(),
                multiline: false,
            }],
            escape_char: Some('\\'),
            escapes: standard_escapes(),
            unicode_escapes: false,
            hex_escapes: false,
            octal_escapes: false,
            raw_prefixes: vec![],
            doubled_delimiter: false,
            char_mode: false,
            char_suffixes: vec![],
        }
    }
    /// Add a delimiter pair; `multiline` admits raw line breaks inside.
    pub fn with_delimiter(mut self, start: &str, end: &str, multiline: bool) -> Self {
        self.delimiters.push(Delimiter {
            start: start.to_string(),
            end: end.to_string(),
            multiline,
        });
        self.delimiters.sort_by(|a, b| b.start.len().cmp(&a.start.len()));
        self
    }
    pub fn with_raw_prefix(mut self, text: &str, allow_newline: bool) -> Self {
        self.raw_prefixes.push(RawPrefix {
            text: text.to_string(),
            allow_newline,
        });
        self
    }
    pub fn with_unicode_escapes(mut self) -> Self {
        self.unicode_escapes = true;
        self
    }
    pub fn with_hex_escapes(mut self) -> Self {
        self.hex_escapes = true;
        self
    }
    pub fn with_octal_escapes(mut self) -> Self {
        self.octal_escapes = true;
        self
    }
    /// No escape character at all (the Basic family).
    pub fn without_escapes(mut self) -> Self {
        self.escape_char = None;
        self.escapes = vec![];
        self
    }
    /// A doubled end delimiter decodes to one delimiter.
    pub fn with_doubled_delimiter(mut self) -> Self {
        self.doubled_delimiter = true;
        self
    }
    /// The decoded text must be exactly one character; the token value is a
    /// char.
    pub fn char_literal(mut self) -> Self {
        self.char_mode = true;
        self
    }
    /// A suffix converting the token to a char value (`"A"c`).
    pub fn with_char_suffix(mut self, text: &str) -> Self {
        self.char_suffixes.push(text.to_string());
        self
    }

    /// Python strings: `'…'`, `"…"`, triple-quoted multi-line variants, `r`
    /// raw prefix.
    pub fn python_like() -> StringScanner {
        StringScanner::new("'")
            .with_delimiter("\"", "\"", false)
            .with_delimiter("'''", "'''", true)
            .with_delimiter("\"\"\"", "\"\"\"", true)
            .with_raw_prefix("r", false)
    }
    /// C-family strings: `"…"` with unicode/hex/octal escapes and the `@`
    /// verbatim prefix.
    pub fn c_like() -> StringScanner {
        StringScanner::new("\"")
            .with_unicode_escapes()
            .with_hex_escapes()
            .with_octal_escapes()
            .with_raw_prefix("@", true)
    }
    /// C-family char literals: `'x'` with the same escapes, no prefixes.
    pub fn c_like_char() -> StringScanner {
        StringScanner::new("'")
            .with_unicode_escapes()
            .with_hex_escapes()
            .with_octal_escapes()
            .char_literal()
    }
    /// Basic-family strings: no escapes, `""` doubling, `c` char suffix.
    pub fn basic_like() -> StringScanner {
        StringScanner::new("\"")
            .without_escapes()
            .with_doubled_delimiter()
            .with_char_suffix("c")
    }

    /// Decode the escape sequence after the escape character. Returns the
    /// decoded char and the byte length consumed beyond the escape char.
    fn decode_escape(&self, text: &str, at: usize) -> Result<(char, usize), ScanErrorKind> {
        let Some(c) = char_at(text, at) else {
            return Err(ScanErrorKind::InvalidEscape);
        };
        if self.unicode_escapes && (c == 'u' || c == 'U') {
            let width = if c == 'u' { 4 } else { 8 };
            let Some(digits) = text.get(at + 1..at + 1 + width) else {
                return Err(ScanErrorKind::InvalidEscape);
            };
            let code = u32::from_str_radix(digits, 16).map_err(|_| ScanErrorKind::InvalidEscape)?;
            let decoded = char::from_u32(code).ok_or(ScanErrorKind::InvalidEscape)?;
            return Ok((decoded, 1 + width));
        }
        if self.hex_escapes && c == 'x' {
            let mut digits = String::new();
            while digits.len() < 4 {
                match char_at(text, at + 1 + digits.len()) {
                    Some(d) if d.is_ascii_hexdigit() => digits.push(d),
                    _ => break,
                }
            }
            if digits.is_empty() {
                return Err(ScanErrorKind::InvalidEscape);
            }
            let code = u32::from_str_radix(&digits, 16).map_err(|_| ScanErrorKind::InvalidEscape)?;
            let decoded = char::from_u32(code).ok_or(ScanErrorKind::InvalidEscape)?;
            return Ok((decoded, 1 + digits.len()));
        }
        if self.octal_escapes && ('0'..='7').contains(&c) {
            let mut digits = String::new();
            while digits.len() < 3 {
                match char_at(text, at + digits.len()) {
                    Some(d) if ('0'..='7').contains(&d) => digits.push(d),
                    _ => break,
                }
            }
            let code = u32::from_str_radix(&digits, 8).map_err(|_| ScanErrorKind::InvalidEscape)?;
            let decoded = char::from_u32(code).ok_or(ScanErrorKind::InvalidEscape)?;
            return Ok((decoded, digits.len()));
        }
        match self.escapes.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => Ok((*to, c.len_utf8())),
            // Unknown escapes pass the character through.
            None => Ok((c, c.len_utf8())),
        }
    }
}

impl Scan for StringScanner {
    fn try_scan(&self, text: &str, at: usize, _ctx: &ScanContext) -> ScanOutcome {
        let mut i = 0;
        let mut raw: Option<&RawPrefix> = None;
        for prefix in &self.raw_prefixes {
            if match_at(text, at, &prefix.text, false)
                && self
                    .delimiters
                    .iter()
                    .any(|d| match_at(text, at + prefix.text.len(), &d.start, true))
            {
                raw = Some(prefix);
                i += prefix.text.len();
                break;
            }
        }
        let Some(delimiter) = self
            .delimiters
            .iter()
            .find(|d| match_at(text, at + i, &d.start, true))
        else {
            return ScanOutcome::NoMatch;
        };
        i += delimiter.start.len();
        let allow_newline = delimiter.multiline || raw.is_some_and(|r| r.allow_newline);
        let mut out = String::new();
        loop {
            if at + i >= text.len() {
                return ScanOutcome::failed(text.len() - at, ScanErrorKind::UnterminatedString);
            }
            if self.doubled_delimiter
                && match_at(text, at + i, &delimiter.end, true)
                && match_at(text, at + i + delimiter.end.len(), &delimiter.end, true)
            {
                out.push_str(&delimiter.end);
                i += 2 * delimiter.end.len();
                continue;
            }
            if match_at(text, at + i, &delimiter.end, true) {
                i += delimiter.end.len();
                break;
            }
            let c = char_at(text, at + i).unwrap();
            if (c == '\n' || c == '\r') && !allow_newline {
                return ScanOutcome::failed(i, ScanErrorKind::UnterminatedString);
            }
            if raw.is_none() && self.escape_char == Some(c) {
                match self.decode_escape(text, at + i + c.len_utf8()) {
                    Ok((decoded, consumed)) => {
                        out.push(decoded);
                        i += c.len_utf8() + consumed;
                        continue;
                    }
                    Err(kind) => return ScanOutcome::failed(i + c.len_utf8(), kind),
                }
            }
            out.push(c);
            i += c.len_utf8();
        }
        let mut char_value = self.char_mode;
        for suffix in &self.char_suffixes {
            if match_at(text, at + i, suffix, false) {
                char_value = true;
                i += suffix.len();
                break;
            }
        }
        if char_value {
            let mut chars = out.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => ScanOutcome::matched(i, TokenValue::Char(c)),
                _ => ScanOutcome::failed(i, ScanErrorKind::InvalidCharLiteral),
            }
        } else {
            ScanOutcome::matched(i, TokenValue::Str(out))
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
    fn octal_escapes_are_greedy_up_to_three_digits() {
        let scanner = StringScanner::c_like();
        let outcome = scanner.try_scan("\"abc\\0601xyz\"", 0, &ctx());
        assert_eq!(
            outcome,
            ScanOutcome::matched(13, TokenValue::Str("abc01xyz".to_string()))
        );
    }

    #[test]
    fn unterminated_at_end_of_input() {
        let scanner = StringScanner::new("'");
        assert_eq!(
            scanner.try_scan("'", 0, &ctx()),
            ScanOutcome::failed(1, ScanErrorKind::UnterminatedString)
        );
    }

    #[test]
    fn triple_quotes_beat_single_quotes() {
        let scanner = StringScanner::python_like();
        let outcome = scanner.try_scan("'''a\nb'''", 0, &ctx());
        assert_eq!(
            outcome,
            ScanOutcome::matched(9, TokenValue::Str("a\nb".to_string()))
        );
    }
}
