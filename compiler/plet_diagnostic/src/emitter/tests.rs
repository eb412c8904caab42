#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::shared_path;
use plet_ir::{Pos, Span};
use pretty_assertions::assert_eq;

fn render(emitter: TerminalEmitter<Vec<u8>>) -> String {
    String::from_utf8(emitter.into_inner()).unwrap()
}

#[test]
fn test_excerpt_with_caret() {
    let path = shared_path("page.html");
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    emitter.add_source(Rc::clone(&path), "<h1>\n{ title + }\n</h1>\n");
    let diag = Diagnostic::error("unexpected '}'")
        .with_file(path)
        .with_span(Span::new(Pos::new(15, 2, 11), Pos::new(16, 2, 12)));
    emitter.report(&diag);
    assert_eq!(
        render(emitter),
        "page.html:2:11: error: unexpected '}'\n2 | { title + }\n  |           ^\n"
    );
}

#[test]
fn test_caret_spans_multiple_columns() {
    let path = shared_path("a.tss");
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    emitter.add_source(Rc::clone(&path), "x = foo(1)");
    let diag = Diagnostic::error("undefined variable 'foo'")
        .with_file(path)
        .with_span(Span::new(Pos::new(4, 1, 5), Pos::new(7, 1, 8)));
    emitter.report(&diag);
    let text = render(emitter);
    assert!(text.ends_with("  |     ^^^\n"), "{text}");
}

#[test]
fn test_missing_file_has_no_excerpt() {
    let path = shared_path("/nonexistent/plet/file.tss");
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    let diag = Diagnostic::warning("odd")
        .with_file(path)
        .with_span(Span::point(Pos::new(0, 1, 1)));
    emitter.report(&diag);
    assert_eq!(
        render(emitter),
        "/nonexistent/plet/file.tss:1:1: warning: odd\n"
    );
}

#[test]
fn test_reads_source_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("index.tss");
    std::fs::write(&file, "first\nsecond line\n").unwrap();
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    let diag = Diagnostic::error("bad")
        .with_path(&file)
        .with_span(Span::point(Pos::new(6, 2, 1)));
    emitter.report(&diag);
    let text = render(emitter);
    assert!(text.contains("2 | second line\n"), "{text}");
}

#[test]
fn test_colors() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Always, false);
    emitter.report(&Diagnostic::error("boom"));
    let text = render(emitter);
    assert!(text.contains("\x1b[1;31merror\x1b[0m"));
}

#[test]
fn test_summary() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    emitter.emit_summary(2, 1);
    assert_eq!(render(emitter), "error: 2 errors and 1 warning emitted\n");
}

#[test]
fn test_color_mode_resolution() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}
