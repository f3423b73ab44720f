use parsekit::scanner::FloatKind;
use parsekit::scanner::IntKind;
use parsekit::scanner::NumberScanner;
use parsekit::tester::TerminalHarness;
use parsekit::ScannerKind;
use parsekit::TokenValue;

fn harness(scanner: NumberScanner) -> TerminalHarness {
    TerminalHarness::new("Number", ScannerKind::Number(scanner))
}

fn assert_f64(value: &TokenValue, expected: f64) {
    match value {
        TokenValue::F64(v) => assert!((v - expected).abs() < 1e-6, "{v} != {expected}"),
        other => panic!("expected an f64 value, found {other:?}"),
    }
}

fn assert_f32(value: &TokenValue, expected: f32) {
    match value {
        TokenValue::F32(v) => assert!((v - expected).abs() < 1e-4, "{v} != {expected}"),
        other => panic!("expected an f32 value, found {other:?}"),
    }
}

#[test]
fn number_general() {
    let parser = harness(
        NumberScanner::new()
            .with_int_types(&[IntKind::I32, IntKind::I64])
            .with_big_int(),
    );
    let token = parser.parse_input("123");
    assert_eq!(token.value, TokenValue::I32(123));
    let token = parser.parse_input("123.4");
    assert_f64(&token.value, 123.4);
    // 100 digits.
    let big = "1234567890123456789012345678901234567890\
               1234567890123456789012345678901234567890\
               12345678901234567890";
    let token = parser.parse_input(big);
    assert_eq!(token.value, TokenValue::BigInt(big.to_string()));
}

#[test]
fn number_narrowest_type_wins() {
    let parser = harness(NumberScanner::new().with_int_types(&[
        IntKind::I16,
        IntKind::I32,
        IntKind::I64,
    ]));
    assert_eq!(parser.parse_input("123").value, TokenValue::I16(123));
    assert_eq!(parser.parse_input("70000").value, TokenValue::I32(70000));
    assert_eq!(
        parser.parse_input("5000000000").value,
        TokenValue::I64(5_000_000_000)
    );
}

#[test]
fn number_signed_does_not_match_single_minus() {
    let parser = harness(NumberScanner::new().allow_sign());
    assert!(parser.parse_input("-").is_error());
}

#[test]
fn number_signed_does_not_match_single_plus() {
    let parser = harness(NumberScanner::new().allow_sign());
    assert!(parser.parse_input("+").is_error());
}

#[test]
fn number_signed_matches_negative_correctly() {
    let parser = harness(NumberScanner::new().allow_sign());
    assert_eq!(parser.parse_input("-500").value, TokenValue::I32(-500));
}

#[test]
fn number_c_like() {
    let parser = harness(NumberScanner::c_like());

    // Simple integers and suffixes.
    let token = parser.parse_input("123 ");
    assert_eq!(token.value, TokenValue::I32(123));

    let token = parser.parse_input(&i32::MAX.to_string());
    assert_eq!(token.value, TokenValue::I32(i32::MAX));

    let token = parser.parse_input(&u64::MAX.to_string());
    assert_eq!(token.value, TokenValue::U64(u64::MAX));

    assert_eq!(parser.parse_input("123U ").value, TokenValue::U32(123));
    assert_eq!(parser.parse_input("123L ").value, TokenValue::I64(123));
    assert_eq!(parser.parse_input("123uL ").value, TokenValue::U64(123));

    // Hex representation.
    assert_eq!(parser.parse_input("0x012 ").value, TokenValue::I32(0x12));
    assert_eq!(parser.parse_input("0x12U ").value, TokenValue::U32(0x12));
    assert_eq!(parser.parse_input("0x012L ").value, TokenValue::I64(0x12));
    assert_eq!(parser.parse_input("0x012uL ").value, TokenValue::U64(0x12));

    // Floating point.
    assert_f64(&parser.parse_input("123.4 ").value, 123.4);
    assert_f64(&parser.parse_input("1234e-1 ").value, 123.4);
    assert_f64(&parser.parse_input("12.34e+01 ").value, 123.4);
    assert_f64(&parser.parse_input("0.1234E3 ").value, 123.4);
    assert_f32(&parser.parse_input("123.4f ").value, 123.4);
    assert_f64(&parser.parse_input("123.4m ").value, 123.4);

    // A trailing dot is not part of the number here.
    let token = parser.parse_raw("123. ");
    assert_eq!(token.value, TokenValue::I32(123));

    // Quick path.
    assert_eq!(parser.parse_input("1 ").value, TokenValue::I32(1));
}

#[test]
fn number_basic_like() {
    let parser = harness(NumberScanner::basic_like());

    let token = parser.parse_input("123 ");
    assert_eq!(token.value, TokenValue::I32(123));

    // Every integer suffix.
    assert_eq!(parser.parse_input("123S ").value, TokenValue::I16(123));
    assert_eq!(parser.parse_input("123I ").value, TokenValue::I32(123));
    assert_eq!(parser.parse_input("123% ").value, TokenValue::I32(123));
    assert_eq!(parser.parse_input("123L ").value, TokenValue::I64(123));
    assert_eq!(parser.parse_input("123& ").value, TokenValue::I64(123));
    assert_eq!(parser.parse_input("123us ").value, TokenValue::U16(123));
    assert_eq!(parser.parse_input("123ui ").value, TokenValue::U32(123));
    assert_eq!(parser.parse_input("123ul ").value, TokenValue::U64(123));

    // Hex and octal.
    assert_eq!(parser.parse_input("&H012 ").value, TokenValue::I32(0x12));
    assert_eq!(parser.parse_input("&H012L ").value, TokenValue::I64(0x12));
    assert_eq!(parser.parse_input("&O012 ").value, TokenValue::I32(10));
    assert_eq!(parser.parse_input("&o012L ").value, TokenValue::I64(10));

    // Floating point.
    assert_f64(&parser.parse_input("123.4 ").value, 123.4);
    assert_f64(&parser.parse_input("1234e-1 ").value, 123.4);
    assert_f64(&parser.parse_input("12.34e+01 ").value, 123.4);
    assert_f64(&parser.parse_input("0.1234E3 ").value, 123.4);
    assert_f64(&parser.parse_input("123.4R ").value, 123.4);
    assert_f64(&parser.parse_input("123.4# ").value, 123.4);
    assert_f32(&parser.parse_input("123.4f ").value, 123.4);
    assert_f32(&parser.parse_input("123.4! ").value, 123.4);
    assert_f64(&parser.parse_input("123.4D ").value, 123.4);
    assert_f64(&parser.parse_input("123.4@ ").value, 123.4);

    // Quick path.
    assert_eq!(parser.parse_input("1 ").value, TokenValue::I32(1));
}

#[test]
fn number_python_like() {
    let parser = harness(NumberScanner::python_like());

    assert_eq!(parser.parse_input("123 ").value, TokenValue::I32(123));
    assert_eq!(parser.parse_input("123L ").value, TokenValue::I64(123));

    assert_eq!(parser.parse_input("0x012 ").value, TokenValue::I32(0x12));
    // With a small "l".
    assert_eq!(parser.parse_input("0x012l ").value, TokenValue::I64(0x12));

    assert_f64(&parser.parse_input("123.4 ").value, 123.4);
    assert_f64(&parser.parse_input("1234e-1 ").value, 123.4);
    assert_f64(&parser.parse_input("12.34e+01 ").value, 123.4);
    assert_f64(&parser.parse_input("0.1234E3 ").value, 123.4);
    assert_f64(&parser.parse_input(".1234 ").value, 0.1234);
    assert_f64(&parser.parse_input("123. ").value, 123.0);

    // Big integer, 100 digits.
    let big = "1234567890123456789012345678901234567890\
               1234567890123456789012345678901234567890\
               12345678901234567890";
    assert_eq!(
        parser.parse_input(big).value,
        TokenValue::BigInt(big.to_string())
    );

    // Quick path.
    assert_eq!(parser.parse_input("1 ").value, TokenValue::I32(1));
}

#[test]
fn number_scheme_like() {
    let parser = harness(NumberScanner::scheme_like());

    assert_f64(&parser.parse_input("123.4 ").value, 123.4);
    assert_f64(&parser.parse_input("1234e-1 ").value, 123.4);
    assert_f32(&parser.parse_input("1234s-1 ").value, 123.4);
    assert_f64(&parser.parse_input("12.34d+01 ").value, 123.4);
}

#[test]
fn number_with_underscore() {
    let parser = harness(NumberScanner::new().allow_underscore());
    assert_eq!(
        parser.parse_input("1_234_567").value,
        TokenValue::I32(1_234_567)
    );
}

#[test]
fn number_min_max_values() {
    let parser = harness(
        NumberScanner::new()
            .allow_sign()
            .with_int_types(&[IntKind::I32]),
    );
    let token = parser.parse_input(&i32::MIN.to_string());
    assert!(!token.is_error(), "failed to scan i32::MIN");
    assert_eq!(token.value, TokenValue::I32(i32::MIN));
    let token = parser.parse_input(&i32::MAX.to_string());
    assert!(!token.is_error(), "failed to scan i32::MAX");
    assert_eq!(token.value, TokenValue::I32(i32::MAX));
}

#[test]
fn number_round_trips_extremes_through_text() {
    let parser = harness(
        NumberScanner::new()
            .allow_sign()
            .with_int_types(&[IntKind::I16, IntKind::I64]),
    );
    for value in [
        i64::from(i16::MIN),
        i64::from(i16::MAX),
        i64::MIN,
        i64::MAX,
    ] {
        let token = parser.parse_input(&value.to_string());
        let scanned = match token.value {
            TokenValue::I16(v) => i64::from(v),
            TokenValue::I64(v) => v,
            other => panic!("unexpected value {other:?}"),
        };
        assert_eq!(scanned, value);
        assert_eq!(scanned.to_string(), value.to_string());
    }
}

#[test]
fn number_default_float_type_applies() {
    let parser = harness(NumberScanner::new().with_float_type(FloatKind::F32));
    assert_f32(&parser.parse_input("2.5").value, 2.5);
}
