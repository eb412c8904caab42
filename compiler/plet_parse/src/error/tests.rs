use super::*;
use plet_diagnostic::shared_path;
use plet_ir::{Keyword, Pos};
use pretty_assertions::assert_eq;

fn span_at(line: u32, column: u32) -> Span {
    Span::point(Pos::new(0, line, column))
}

#[test]
fn test_expected_message_names_construct() {
    let error = ParseError::expected(
        span_at(1, 9),
        "'then'",
        &TokenKind::Punct(plet_ir::Punct::RBrace),
        "if",
    );
    assert_eq!(error.kind.to_string(), "expected 'then' in 'if', found '}'");
}

#[test]
fn test_unexpected_keyword() {
    let error = ParseError::unexpected(span_at(2, 1), &TokenKind::Keyword(Keyword::End));
    assert_eq!(error.to_string(), "2:1: unexpected 'end'");
}

#[test]
fn test_into_diagnostic_keeps_location() {
    let file = shared_path("page.html");
    let diagnostic = ParseError::new(span_at(3, 4), ParseErrorKind::InvalidAssignTarget)
        .into_diagnostic(&file);
    assert!(diagnostic.is_error());
    assert_eq!(diagnostic.message, "syntax error: invalid assignment target");
    assert_eq!(diagnostic.line(), Some(3));
    assert_eq!(diagnostic.column(), Some(4));
    assert_eq!(diagnostic.file.as_deref(), Some(&*file));
}

#[test]
fn test_outside_loop_message() {
    let kind = ParseErrorKind::OutsideLoop { keyword: "break" };
    assert_eq!(kind.to_string(), "'break' outside of a 'for' loop");
}
