//! Diagnostic and error reporting tests.
//!
//! Tests that lexer and parser problems come out as clear, source-anchored
//! snippets.

use std::sync::Arc;

use logix_syntax::{Diagnostics, IssueKind, Severity, SourceMap, Stmt};

/// Parse source and return every issue it produced
fn parse_with_issues(text: &str) -> (Stmt, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let program = logix_syntax::parse_source(Arc::new(SourceMap::new(0, text)), &mut diagnostics);
    (program, diagnostics)
}

/// Render the first error without colors, split into lines
fn first_error_lines(text: &str) -> Vec<String> {
    let (_, diagnostics) = parse_with_issues(text);
    let error = diagnostics.errors().first().expect("an error");
    error.render(false).lines().map(str::to_owned).collect()
}

#[test]
fn test_error_expected_expression_snippet() {
    assert_eq!(
        first_error_lines("x = )"),
        [
            "ERROR:expected expression",
            "--><input>:1:5",
            " ┃",
            "1┃x = )",
            " ┃  - ^ found `)`",
            " ┃  |",
            " ┃  while parsing assignment",
        ]
    );
}

#[test]
fn test_error_missing_statement_end_snippet() {
    let lines = first_error_lines("a = 1 b");
    assert_eq!(lines[0], "ERROR:missing newline or semicolon as statement end");
    assert_eq!(lines[1], "--><input>:1:7");
    assert_eq!(lines[4], " ┃      ^ ");
}

#[test]
fn test_error_spanning_two_lines() {
    assert_eq!(
        first_error_lines("{\n  a = 1\n"),
        [
            "ERROR:unterminated block",
            "--><input>:1:1",
            " ┃",
            "1┃{",
            " ┃- block starts here",
            "--><input>:3:1",
            " ┃",
            "3┃",
            " ┃^ expected `}`",
        ]
    );
}

#[test]
fn test_error_kinds() {
    let (_, diagnostics) = parse_with_issues("a = $\nb = )");
    let kinds: Vec<_> = diagnostics.errors().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, [IssueKind::Lexer, IssueKind::Parser]);
    assert!(
        diagnostics
            .errors()
            .iter()
            .all(|e| e.severity() == Severity::Error)
    );
}

#[test]
fn test_warnings_render_before_errors() {
    let (_, diagnostics) = parse_with_issues("s = \u{201C}hi\u{201D}\nt = )");
    assert_eq!(diagnostics.warning_count(), 2);
    assert_eq!(diagnostics.error_count(), 1);

    let rendered = diagnostics.render_all(false);
    let first_warning = rendered.find("WARNING:").expect("warning rendered");
    let first_error = rendered.find("ERROR:").expect("error rendered");
    assert!(first_warning < first_error);
    assert_eq!(rendered.matches("WARNING:").count(), 2);
}

#[test]
fn test_color_output_wraps_header() {
    let (_, diagnostics) = parse_with_issues("x = )");
    let rendered = diagnostics.render_all(true);
    assert!(rendered.starts_with("\x1b[31mERROR:expected expression\x1b[0m\n"));
    assert!(!diagnostics.render_all(false).contains('\x1b'));
}

#[test]
fn test_unterminated_argument_list_points_at_opener() {
    let (_, diagnostics) = parse_with_issues("f(a, b");
    assert_eq!(diagnostics.error_count(), 1);

    let error = &diagnostics.errors()[0];
    assert_eq!(error.message(), "unterminated argument list");
    let notes: Vec<_> = error.annotations().map(|a| a.note.as_str()).collect();
    assert!(notes.contains(&"argument list starts here"));
}

#[test]
fn test_ambiguous_logic_reported_once() {
    let (_, diagnostics) = parse_with_issues("ok = a && b || c\nfine = (a && b) || c");
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(
        diagnostics.errors()[0].message(),
        "ambiguous logical expression, add parentheses"
    );
}
