use parsekit::scanner::FreeTextScanner;
use parsekit::tester::TerminalHarness;
use parsekit::ScannerKind;
use parsekit::TokenValue;

fn harness(scanner: FreeTextScanner) -> TerminalHarness {
    // Free text owns its whitespace, so the harness must not skip any.
    TerminalHarness::raw("FreeText", ScannerKind::FreeText(scanner))
}

#[test]
fn free_text_escapes() {
    let scanner = FreeTextScanner::new(&[",", ")"])
        .with_escape("\\\\", "\\")
        .with_escape("\\,", ",")
        .with_escape("\\)", ")");
    let parser = harness(scanner);
    let token = parser.parse_input("abc\\\\de\\,\\)fg,");
    assert_eq!(token.value, TokenValue::Str("abc\\de,)fg".to_string()));
}

#[test]
fn free_text_ends_at_eof_when_allowed() {
    let parser = harness(FreeTextScanner::new(&[";"]).allow_eof());
    let token = parser.parse_input("abcdefg");
    assert_eq!(token.value, TokenValue::Str("abcdefg".to_string()));
}

#[test]
fn free_text_firsts_are_not_part_of_the_value() {
    let parser = harness(FreeTextScanner::new(&["END_VAR"]).with_first("VAR"));
    let token = parser.parse_input("VAR\r\nMESSAGE:STRING80;\r\n(*_ORError Message*)\r\nEND_VAR");
    assert_eq!(
        token.value,
        TokenValue::Str("\r\nMESSAGE:STRING80;\r\n(*_ORError Message*)\r\n".to_string())
    );
    assert!(token.text.starts_with("VAR"));
}

#[test]
fn free_text_matches_whitespace_only_input() {
    let parser = harness(FreeTextScanner::new(&[]).allow_eof());
    let token = parser.parse_input(" ");
    assert_eq!(token.value, TokenValue::Str(" ".to_string()));
}
