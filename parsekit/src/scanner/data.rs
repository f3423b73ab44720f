//! Data literals: delimiter-separated fields, fixed-width fields, and
//! quoted values, each converted to a declared target type.

use crate::diagnostics::ScanErrorKind;
use crate::scanner::char_at;
use crate::scanner::match_at;
use crate::scanner::Scan;
use crate::scanner::ScanContext;
use crate::scanner::ScanOutcome;
use crate::token::TokenValue;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// A calendar date, the decoded value of date-typed data literals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub fn new(year: i32, month: u8, day: u8) -> Date {
        Date { year, month, day }
    }
    /// Parse the `month/day/year` numeric form.
    fn parse(text: &str) -> Option<Date> {
        let mut parts = text.split('/');
        let month: u8 = parts.next()?.trim().parse().ok()?;
        let day: u8 = parts.next()?.trim().parse().ok()?;
        let year: i32 = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Date { year, month, day })
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// The conversion target of a data literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    I32,
    I64,
    F64,
    Str,
    Date,
}

impl ValueKind {
    fn name(&self) -> &'static str {
        match self {
            ValueKind::I32 => "a 32-bit integer",
            ValueKind::I64 => "a 64-bit integer",
            ValueKind::F64 => "a float",
            ValueKind::Str => "a string",
            ValueKind::Date => "a date",
        }
    }
    fn convert(&self, text: &str) -> Result<TokenValue, ScanErrorKind> {
        let fail = || ScanErrorKind::ValueConversion {
            text: text.to_string(),
            target: self.name(),
        };
        match self {
            ValueKind::Str => Ok(TokenValue::Str(text.to_string())),
            ValueKind::I32 => text.parse().map(TokenValue::I32).map_err(|_| fail()),
            ValueKind::I64 => text.parse().map(TokenValue::I64).map_err(|_| fail()),
            ValueKind::F64 => text.parse().map(TokenValue::F64).map_err(|_| fail()),
            ValueKind::Date => Date::parse(text).map(TokenValue::Date).ok_or_else(fail),
        }
    }
}

/// A delimiter-separated field: text up to the separator (or line end),
/// converted to the target kind. The separator is consumed.
pub struct DsvScanner {
    target: ValueKind,
    separator: String,
}

impl DsvScanner {
    pub fn new(target: ValueKind, separator: &str) -> DsvScanner {
        assert!(!separator.is_empty(), "separator must not be empty");
        DsvScanner {
            target,
            separator: separator.to_string(),
        }
    }
}

impl Scan for DsvScanner {
    fn try_scan(&self, text: &str, at: usize, _ctx: &ScanContext) -> ScanOutcome {
        let mut i = 0;
        let mut end = None;
        while at + i < text.len() {
            if match_at(text, at + i, &self.separator, true) {
                end = Some(i + self.separator.len());
                break;
            }
            let c = char_at(text, at + i).unwrap();
            if c == '\n' {
                break;
            }
            i += c.len_utf8();
        }
        if i == 0 {
            return ScanOutcome::NoMatch;
        }
        let len = end.unwrap_or(i);
        match self.target.convert(&text[at..at + i]) {
            Ok(value) => ScanOutcome::matched(len, value),
            Err(kind) => ScanOutcome::failed(len, kind),
        }
    }
}

/// A fixed-width field: exactly `width` characters, converted to the target
/// kind.
pub struct FixedLengthScanner {
    target: ValueKind,
    width: usize,
}

impl FixedLengthScanner {
    pub fn new(target: ValueKind, width: usize) -> FixedLengthScanner {
        assert!(width > 0, "fixed-length field width must be positive");
        FixedLengthScanner { target, width }
    }
}

impl Scan for FixedLengthScanner {
    fn try_scan(&self, text: &str, at: usize, _ctx: &ScanContext) -> ScanOutcome {
        let mut i = 0;
        for _ in 0..self.width {
            match char_at(text, at + i) {
                Some(c) => i += c.len_utf8(),
                None => return ScanOutcome::failed(i, ScanErrorKind::ShortField(self.width)),
            }
        }
        match self.target.convert(&text[at..at + i]) {
            Ok(value) => ScanOutcome::matched(i, value),
            Err(kind) => ScanOutcome::failed(i, kind),
        }
    }
}

/// A wrapped value: `start … end`, the inner text converted to the target
/// kind.
pub struct QuotedValueScanner {
    target: ValueKind,
    start: String,
    end: String,
}

impl QuotedValueScanner {
    pub fn new(target: ValueKind, wrapper: &str) -> QuotedValueScanner {
        QuotedValueScanner {
            target,
            start: wrapper.to_string(),
            end: wrapper.to_string(),
        }
    }
}

impl Scan for QuotedValueScanner {
    fn try_scan(&self, text: &str, at: usize, _ctx: &ScanContext) -> ScanOutcome {
        if !match_at(text, at, &self.start, true) {
            return ScanOutcome::NoMatch;
        }
        let mut i = self.start.len();
        while at + i < text.len() {
            if match_at(text, at + i, &self.end, true) {
                let inner = &text[at + self.start.len()..at + i];
                let len = i + self.end.len();
                return match self.target.convert(inner) {
                    Ok(value) => ScanOutcome::matched(len, value),
                    Err(kind) => ScanOutcome::failed(len, kind),
                };
            }
            i += char_at(text, at + i).unwrap().len_utf8();
        }
        ScanOutcome::failed(i, ScanErrorKind::UnterminatedString)
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
    fn fixed_width_reads_exactly_its_width() {
        let field = FixedLengthScanner::new(ValueKind::I32, 2);
        assert_eq!(
            field.try_scan("1200", 0, &ctx()),
            ScanOutcome::matched(2, TokenValue::I32(12))
        );
    }

    #[test]
    #[should_panic]
    fn zero_width_field_is_misuse() {
        let _ = FixedLengthScanner::new(ValueKind::I32, 0);
    }

    #[test]
    fn dsv_consumes_its_separator() {
        let field = DsvScanner::new(ValueKind::I32, ",");
        assert_eq!(
            field.try_scan("12,", 0, &ctx()),
            ScanOutcome::matched(3, TokenValue::I32(12))
        );
    }

    #[test]
    fn quoted_date_value() {
        let field = QuotedValueScanner::new(ValueKind::Date, "#");
        assert_eq!(
            field.try_scan("#11/15/2009#", 0, &ctx()),
            ScanOutcome::matched(12, TokenValue::Date(Date::new(2009, 11, 15)))
        );
    }
}
