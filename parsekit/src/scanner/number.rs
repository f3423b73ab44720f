//! Numeric literals.
//!
//! One scanner covers every dialect through configuration: candidate integer
//! types tried in ascending width order with an optional big-integer
//! fallback, a single default float type, per-dialect exponent markers and
//! suffix tables, radix prefixes, sign/underscore handling. A fast path
//! converts single-digit inputs directly, without assembling digit buffers.

use crate::diagnostics::ScanErrorKind;
use crate::scanner::char_at;
use crate::scanner::match_at;
use crate::scanner::Scan;
use crate::scanner::ScanContext;
use crate::scanner::ScanOutcome;
use crate::token::TokenValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntKind {
    I16,
    I32,
    I64,
    U16,
    U32,
    U64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatKind {
    F32,
    F64,
}

/// A conversion target: one entry of a suffix's candidate list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumKind {
    Int(IntKind),
    Float(FloatKind),
}

pub struct NumberScanner {
    int_types: Vec<IntKind>,
    big_int_fallback: bool,
    float_type: FloatKind,
    /// Exponent markers with the float kind each one selects.
    exponents: Vec<(char, FloatKind)>,
    /// Type suffixes, kept sorted longest-first; matched case-insensitively.
    suffixes: Vec<(String, Vec<NumKind>)>,
    /// Radix prefixes such as `0x`; matched case-insensitively.
    prefixes: Vec<(String, u32)>,
    allow_sign: bool,
    allow_underscore: bool,
    allow_start_end_dot: bool,
}

impl Default for NumberScanner {
    fn default() -> Self {
        NumberScanner::new()
    }
}

impl NumberScanner {
    pub fn new() -> NumberScanner {
        NumberScanner {
            int_types: vec![IntKind::I32, IntKind::I64],
            big_int_fallback: false,
            float_type: FloatKind::F64,
            exponents: vec![('e', FloatKind::F64)],
            suffixes: vec![],
            prefixes: vec![],
            allow_sign: false,
            allow_underscore: false,
            allow_start_end_dot: false,
        }
    }
    pub fn with_int_types(mut self, kinds: &[IntKind]) -> Self {
        self.int_types = kinds.to_vec();
        self
    }
    pub fn with_big_int(mut self) -> Self {
        self.big_int_fallback = true;
        self
    }
    pub fn with_float_type(mut self, kind: FloatKind) -> Self {
        self.float_type = kind;
        self
    }
    /// Replace the exponent marker table.
    pub fn with_exponents(mut self, markers: &[(char, FloatKind)]) -> Self {
        self.exponents = markers.to_vec();
        self
    }
    pub fn with_suffix(mut self, text: &str, kinds: &[NumKind]) -> Self {
        self.suffixes.push((text.to_string(), kinds.to_vec()));
        self.suffixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }
    pub fn with_prefix(mut self, text: &str, radix: u32) -> Self {
        self.prefixes.push((text.to_string(), radix));
        self
    }
    pub fn allow_sign(mut self) -> Self {
        self.allow_sign = true;
        self
    }
    pub fn allow_underscore(mut self) -> Self {
        self.allow_underscore = true;
        self
    }
    /// Admit a leading or trailing decimal dot (`.5`, `123.`).
    pub fn allow_start_end_dot(mut self) -> Self {
        self.allow_start_end_dot = true;
        self
    }

    /// C-family numbers: `123`, `0x1f`, `1.5e3`, suffixes `u`/`l`/`ul`,
    /// `f`/`d`/`m`.
    pub fn c_like() -> NumberScanner {
        NumberScanner::new()
            .with_int_types(&[IntKind::I32, IntKind::U32, IntKind::I64, IntKind::U64])
            .with_prefix("0x", 16)
            .with_suffix("ul", &[NumKind::Int(IntKind::U64)])
            .with_suffix("lu", &[NumKind::Int(IntKind::U64)])
            .with_suffix("u", &[NumKind::Int(IntKind::U32), NumKind::Int(IntKind::U64)])
            .with_suffix("l", &[NumKind::Int(IntKind::I64), NumKind::Int(IntKind::U64)])
            .with_suffix("f", &[NumKind::Float(FloatKind::F32)])
            .with_suffix("d", &[NumKind::Float(FloatKind::F64)])
            .with_suffix("m", &[NumKind::Float(FloatKind::F64)])
    }
    /// Python-family numbers: leading/trailing dot, `l` suffix, hex and
    /// octal prefixes, unbounded integers.
    pub fn python_like() -> NumberScanner {
        NumberScanner::new()
            .with_big_int()
            .with_prefix("0x", 16)
            .with_prefix("0o", 8)
            .with_suffix("l", &[NumKind::Int(IntKind::I64)])
            .allow_start_end_dot()
    }
    /// Basic-family numbers: `&H`/`&O` prefixes and the suffix zoo
    /// (`S I % L & US UI UL` for integers, `R # F ! D @` for floats).
    pub fn basic_like() -> NumberScanner {
        NumberScanner::new()
            .with_prefix("&H", 16)
            .with_prefix("&O", 8)
            .with_suffix("us", &[NumKind::Int(IntKind::U16)])
            .with_suffix("ui", &[NumKind::Int(IntKind::U32)])
            .with_suffix("ul", &[NumKind::Int(IntKind::U64)])
            .with_suffix("s", &[NumKind::Int(IntKind::I16)])
            .with_suffix("i", &[NumKind::Int(IntKind::I32)])
            .with_suffix("%", &[NumKind::Int(IntKind::I32)])
            .with_suffix("l", &[NumKind::Int(IntKind::I64)])
            .with_suffix("&", &[NumKind::Int(IntKind::I64)])
            .with_suffix("r", &[NumKind::Float(FloatKind::F64)])
            .with_suffix("#", &[NumKind::Float(FloatKind::F64)])
            .with_suffix("f", &[NumKind::Float(FloatKind::F32)])
            .with_suffix("!", &[NumKind::Float(FloatKind::F32)])
            .with_suffix("d", &[NumKind::Float(FloatKind::F64)])
            .with_suffix("@", &[NumKind::Float(FloatKind::F64)])
    }
    /// Scheme-family numbers: exponent markers select the float kind
    /// (`e`/`d` for double, `s` for single).
    pub fn scheme_like() -> NumberScanner {
        NumberScanner::new().with_exponents(&[
            ('e', FloatKind::F64),
            ('s', FloatKind::F32),
            ('d', FloatKind::F64),
        ])
    }

    fn is_suffix_or_prefix_start(&self, c: char) -> bool {
        let lower = c.to_ascii_lowercase();
        self.suffixes
            .iter()
            .any(|(s, _)| s.chars().next().map(|f| f.to_ascii_lowercase()) == Some(lower))
            || self
                .prefixes
                .iter()
                .any(|(p, _)| p.chars().next().map(|f| f.to_ascii_lowercase()) == Some(lower))
    }
    fn read_digits(&self, text: &str, at: usize, i: &mut usize, radix: u32) -> String {
        let mut digits = String::new();
        while let Some(c) = char_at(text, at + *i) {
            if c.is_digit(radix) {
                digits.push(c);
                *i += 1;
            } else if c == '_'
                && self.allow_underscore
                && !digits.is_empty()
                && char_at(text, at + *i + 1).is_some_and(|n| n.is_digit(radix))
            {
                *i += 1;
            } else {
                break;
            }
        }
        digits
    }
    fn float_value(kind: FloatKind, text: &str, len: usize) -> ScanOutcome {
        match kind {
            FloatKind::F32 => match text.parse::<f32>() {
                Ok(v) => ScanOutcome::matched(len, TokenValue::F32(v)),
                Err(_) => ScanOutcome::failed(len, ScanErrorKind::InvalidNumber),
            },
            FloatKind::F64 => match text.parse::<f64>() {
                Ok(v) => ScanOutcome::matched(len, TokenValue::F64(v)),
                Err(_) => ScanOutcome::failed(len, ScanErrorKind::InvalidNumber),
            },
        }
    }
}

/// The magnitude converted into `kind`, if it fits; `None` asks the caller
/// to try the next candidate.
fn int_value(kind: IntKind, magnitude: u128, negative: bool) -> Option<TokenValue> {
    if negative {
        let signed = -i128::try_from(magnitude).ok()?;
        match kind {
            IntKind::I16 => i16::try_from(signed).ok().map(TokenValue::I16),
            IntKind::I32 => i32::try_from(signed).ok().map(TokenValue::I32),
            IntKind::I64 => i64::try_from(signed).ok().map(TokenValue::I64),
            IntKind::U16 | IntKind::U32 | IntKind::U64 => None,
        }
    } else {
        match kind {
            IntKind::I16 => i16::try_from(magnitude).ok().map(TokenValue::I16),
            IntKind::I32 => i32::try_from(magnitude).ok().map(TokenValue::I32),
            IntKind::I64 => i64::try_from(magnitude).ok().map(TokenValue::I64),
            IntKind::U16 => u16::try_from(magnitude).ok().map(TokenValue::U16),
            IntKind::U32 => u32::try_from(magnitude).ok().map(TokenValue::U32),
            IntKind::U64 => u64::try_from(magnitude).ok().map(TokenValue::U64),
        }
    }
}

impl Scan for NumberScanner {
    fn try_scan(&self, text: &str, at: usize, _ctx: &ScanContext) -> ScanOutcome {
        let Some(first) = char_at(text, at) else {
            return ScanOutcome::NoMatch;
        };
        // Fast path: a single digit followed by nothing that could extend
        // the literal.
        if first.is_ascii_digit() {
            let continuing = char_at(text, at + 1).is_some_and(|n| {
                n.is_ascii_alphanumeric()
                    || n == '.'
                    || n == '_'
                    || self.is_suffix_or_prefix_start(n)
            });
            if !continuing {
                let digit = first.to_digit(10).unwrap() as i32;
                return ScanOutcome::matched(1, TokenValue::I32(digit));
            }
        }
        let mut i = 0;
        let mut negative = false;
        if first == '+' || first == '-' {
            if !self.allow_sign {
                return ScanOutcome::NoMatch;
            }
            let next = char_at(text, at + 1);
            let digit_next = next.is_some_and(|c| c.is_ascii_digit());
            let dot_next = next == Some('.')
                && self.allow_start_end_dot
                && char_at(text, at + 2).is_some_and(|c| c.is_ascii_digit());
            // A bare sign is never a number.
            if !digit_next && !dot_next {
                return ScanOutcome::NoMatch;
            }
            negative = first == '-';
            i = 1;
        }
        let mut radix = 10;
        for (prefix, r) in &self.prefixes {
            if match_at(text, at + i, prefix, false)
                && char_at(text, at + i + prefix.len()).is_some_and(|c| c.is_digit(*r))
            {
                radix = *r;
                i += prefix.len();
                break;
            }
        }
        let digits = self.read_digits(text, at, &mut i, radix);
        let mut frac = String::new();
        let mut has_frac = false;
        let mut exp_kind: Option<FloatKind> = None;
        let mut exp = String::new();
        if radix == 10 {
            if char_at(text, at + i) == Some('.') {
                let digit_after = char_at(text, at + i + 1).is_some_and(|c| c.is_ascii_digit());
                let consume = if digit_after {
                    !digits.is_empty() || self.allow_start_end_dot
                } else {
                    !digits.is_empty() && self.allow_start_end_dot
                };
                if consume {
                    has_frac = true;
                    i += 1;
                    frac = self.read_digits(text, at, &mut i, 10);
                }
            }
            if !digits.is_empty() || !frac.is_empty() {
                if let Some(marker) = char_at(text, at + i) {
                    let entry = self
                        .exponents
                        .iter()
                        .find(|(m, _)| m.to_ascii_lowercase() == marker.to_ascii_lowercase());
                    if let Some((_, kind)) = entry {
                        let mut j = i + 1;
                        let mut sign = None;
                        if let Some(s) = char_at(text, at + j) {
                            if s == '+' || s == '-' {
                                sign = Some(s);
                                j += 1;
                            }
                        }
                        if char_at(text, at + j).is_some_and(|c| c.is_ascii_digit()) {
                            exp_kind = Some(*kind);
                            i = j;
                            if let Some(s) = sign {
                                exp.push(s);
                            }
                            let exp_digits = self.read_digits(text, at, &mut i, 10);
                            exp.push_str(&exp_digits);
                        }
                    }
                }
            }
        }
        if digits.is_empty() && frac.is_empty() {
            return ScanOutcome::NoMatch;
        }
        let mut suffix_kinds: Option<&[NumKind]> = None;
        for (suffix, kinds) in &self.suffixes {
            if match_at(text, at + i, suffix, false) {
                suffix_kinds = Some(kinds.as_slice());
                i += suffix.len();
                break;
            }
        }
        let is_float = has_frac || exp_kind.is_some();
        if is_float {
            let kind = match suffix_kinds {
                Some(kinds) => {
                    let float = kinds.iter().find_map(|k| match k {
                        NumKind::Float(f) => Some(*f),
                        NumKind::Int(_) => None,
                    });
                    match float {
                        Some(f) => f,
                        None => return ScanOutcome::failed(i, ScanErrorKind::InvalidNumber),
                    }
                }
                None => exp_kind.unwrap_or(self.float_type),
            };
            let mut literal = String::new();
            if negative {
                literal.push('-');
            }
            literal.push_str(&digits);
            if has_frac {
                literal.push('.');
                literal.push_str(&frac);
            }
            if exp_kind.is_some() {
                literal.push('e');
                literal.push_str(&exp);
            }
            return NumberScanner::float_value(kind, &literal, i);
        }
        let magnitude = digits
            .chars()
            .try_fold(0u128, |acc, c| {
                let d = c.to_digit(radix).unwrap() as u128;
                acc.checked_mul(radix as u128)?.checked_add(d)
            });
        let default_kinds: Vec<NumKind> = self.int_types.iter().map(|k| NumKind::Int(*k)).collect();
        let candidates = suffix_kinds.unwrap_or(&default_kinds);
        if let Some(magnitude) = magnitude {
            for kind in candidates {
                let value = match kind {
                    NumKind::Int(k) => int_value(*k, magnitude, negative),
                    NumKind::Float(f) => {
                        let literal = if negative {
                            format!("-{digits}")
                        } else {
                            digits.clone()
                        };
                        return NumberScanner::float_value(*f, &literal, i);
                    }
                };
                if let Some(value) = value {
                    return ScanOutcome::matched(i, value);
                }
            }
        }
        if self.big_int_fallback && suffix_kinds.is_none() && radix == 10 {
            let mut digit_text = String::new();
            if negative {
                digit_text.push('-');
            }
            digit_text.push_str(&digits);
            return ScanOutcome::matched(i, TokenValue::BigInt(digit_text));
        }
        ScanOutcome::failed(i, ScanErrorKind::NumberOverflow)
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

    fn scan(scanner: &NumberScanner, input: &str) -> ScanOutcome {
        scanner.try_scan(input, 0, &ctx())
    }

    #[test]
    fn quick_path_handles_single_digits() {
        let number = NumberScanner::new().with_int_types(&[IntKind::I16]);
        // The fast path always yields the default 32-bit kind.
        assert_eq!(scan(&number, "7"), ScanOutcome::matched(1, TokenValue::I32(7)));
        assert_eq!(scan(&number, "7 "), ScanOutcome::matched(1, TokenValue::I32(7)));
    }

    #[test]
    fn narrowest_candidate_wins() {
        let number =
            NumberScanner::new().with_int_types(&[IntKind::I16, IntKind::I32, IntKind::I64]);
        assert_eq!(
            scan(&number, "123"),
            ScanOutcome::matched(3, TokenValue::I16(123))
        );
        assert_eq!(
            scan(&number, "70000"),
            ScanOutcome::matched(5, TokenValue::I32(70000))
        );
    }

    #[test]
    fn bare_sign_never_matches() {
        let number = NumberScanner::new().allow_sign();
        assert_eq!(scan(&number, "-"), ScanOutcome::NoMatch);
        assert_eq!(scan(&number, "+"), ScanOutcome::NoMatch);
        assert_eq!(
            scan(&number, "-500"),
            ScanOutcome::matched(4, TokenValue::I32(-500))
        );
    }

    #[test]
    fn overflow_without_fallback_is_a_failure() {
        let number = NumberScanner::new().with_int_types(&[IntKind::I16]);
        assert_eq!(
            scan(&number, "70000"),
            ScanOutcome::failed(5, ScanErrorKind::NumberOverflow)
        );
    }
}
