use parsekit::scanner::RegexScanner;
use parsekit::tester::TerminalHarness;
use parsekit::ScannerKind;
use parsekit::TokenValue;

#[test]
fn regex_literal() {
    let parser = TerminalHarness::new("RegEx", ScannerKind::Regex(RegexScanner::new()));
    let token = parser.parse_input("/abc\\\\\\/de/gm  ");
    assert!(!token.is_error(), "valid regex literal must scan");
    let TokenValue::Regex(regex) = &token.value else {
        panic!("token value must be a compiled regex, found {:?}", token.value);
    };
    let found = regex
        .find("00abc\\/de00")
        .expect("the pattern must match the probe text");
    assert_eq!(found.start(), 2);
}

#[test]
fn unterminated_regex_literal() {
    let parser = TerminalHarness::new("RegEx", ScannerKind::Regex(RegexScanner::new()));
    let token = parser.parse_input("/abc");
    assert!(token.is_error());
}
