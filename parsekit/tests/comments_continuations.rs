use parsekit::compile;
use parsekit::scanner::CommentScanner;
use parsekit::scanner::IdentifierScanner;
use parsekit::scanner::LineContinuationScanner;
use parsekit::tester::TerminalHarness;
use parsekit::GrammarBuilder;
use parsekit::ScannerKind;
use parsekit::TokenCategory;

#[test]
fn comment_terminal() {
    let parser = TerminalHarness::new(
        "Comment",
        ScannerKind::Comment(CommentScanner::block("/*", "*/")),
    );
    let token = parser.parse_input("/* abc  */");
    assert_eq!(token.category, TokenCategory::Comment);

    let parser = TerminalHarness::new("Comment", ScannerKind::Comment(CommentScanner::line("//")));
    let token = parser.parse_input("// abc  \n   ");
    assert_eq!(token.category, TokenCategory::Comment);
}

#[test]
fn unterminated_block_comment_is_an_error() {
    let parser = TerminalHarness::bare(
        "Comment",
        ScannerKind::Comment(CommentScanner::block("/*", "*/")),
    );
    let token = parser.parse_input("/* abc");
    assert_eq!(token.category, TokenCategory::Error);
}

#[test]
fn continuation_simple() {
    let parser = TerminalHarness::new(
        "LineContinuation",
        ScannerKind::LineContinuation(LineContinuationScanner::with_starts(&["\\"])),
    );
    let token = parser.parse_input("\\\r\t");
    assert_eq!(token.category, TokenCategory::Outline);
}

#[test]
fn continuation_default() {
    let parser = TerminalHarness::new(
        "LineContinuation",
        ScannerKind::LineContinuation(LineContinuationScanner::new()),
    );
    let token = parser.parse_input("_\r\n\t");
    assert_eq!(token.category, TokenCategory::Outline);

    let token = parser.parse_input("\\\x0b    ");
    assert_eq!(token.category, TokenCategory::Outline);
}

#[test]
fn continuation_complex() {
    let parser = TerminalHarness::new(
        "LineContinuation",
        ScannerKind::LineContinuation(LineContinuationScanner::with_starts(&[
            "\\continue",
            "\\cont",
            "++CONTINUE++",
        ])),
    );
    let token = parser.parse_input("\\cont   \r\n    ");
    assert_eq!(token.category, TokenCategory::Outline);

    let token = parser.parse_input("++CONTINUE++\t\x0b");
    assert_eq!(token.category, TokenCategory::Outline);
}

#[test]
fn continuation_incomplete() {
    let parser = TerminalHarness::new(
        "LineContinuation",
        ScannerKind::LineContinuation(LineContinuationScanner::new()),
    );
    let token = parser.parse_input("\\   garbage");
    assert_eq!(token.category, TokenCategory::Error);

    let token = parser.parse_raw("_");
    assert_eq!(token.category, TokenCategory::Error);
}

/// Comments registered as non-grammar terminals are scanned and recorded,
/// but never reach the parser.
#[test]
fn non_grammar_comments_are_skipped_by_the_parser() {
    let mut builder = GrammarBuilder::new();
    let comment = builder.terminal(
        "Comment",
        ScannerKind::Comment(CommentScanner::block("/*", "*/")),
    );
    let id = builder.terminal("id", ScannerKind::Identifier(IdentifierScanner::new()));
    let root = builder.nonterminal("Root");
    builder.rule(root, &[id.into()]);
    builder.non_grammar_terminal(comment);
    builder.root(root);
    let automaton = compile(builder.build().unwrap()).unwrap();

    let output = automaton.parse("/* note */ x");
    assert!(!output.has_errors());
    let root_node = output.root.unwrap();
    assert_eq!(root_node.children.len(), 1);
    assert_eq!(root_node.children[0].text(), "x");
    assert_eq!(output.tokens[0].category, TokenCategory::Comment);
}
