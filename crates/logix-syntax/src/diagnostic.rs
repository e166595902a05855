//! Span-anchored errors and warnings.
//!
//! An [`Issue`] is a message plus any number of annotations. Each annotation
//! is resolved to a line and column as soon as it is added, so rendering
//! needs nothing but the issue itself. The lexer and parser are the only
//! producers; they append to a [`Diagnostics`] sink owned by the driver.
//!
//! Rendered output looks like this (colors omitted):
//!
//! ```text
//! ERROR:unterminated string
//! -->main.lx:1:13
//!  ┃
//! 1┃msg = "hello
//!  ┃      -     ^ expected end
//!  ┃      |
//!  ┃      string start
//! ```

use std::fmt;
use std::sync::Arc;

use crate::source_map::SourceMap;
use crate::span::Spanned;

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// How bad an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Suspicious input that still compiles.
    Warning,
    /// Input that cannot compile.
    Error,
}

impl Severity {
    /// Name used in the rendered header.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Returns the ANSI color code for this severity.
    #[must_use]
    pub const fn color_code(self) -> &'static str {
        match self {
            Self::Warning => YELLOW,
            Self::Error => RED,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which phase produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// Malformed token.
    Lexer,
    /// Grammar violation.
    Parser,
    /// Reserved for semantic analysis.
    Semantic,
}

/// Underline style of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// The offending text, drawn with `^`.
    Point,
    /// Related context, drawn with `-`.
    Info,
}

impl Marker {
    const fn glyph(self) -> char {
        match self {
            Self::Point => '^',
            Self::Info => '-',
        }
    }
}

/// One underline with its note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// 1-based column of the first underlined character.
    pub col: usize,
    /// Number of underlined characters.
    pub width: usize,
    /// Underline style.
    pub marker: Marker,
    /// Text printed next to the underline.
    pub note: String,
}

/// Every annotation that landed on one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    /// 1-based line number.
    pub line: usize,
    /// The line's text, captured when the first annotation arrived.
    pub text: String,
    /// Annotations in insertion order.
    pub annotations: Vec<Annotation>,
}

impl AnnotatedLine {
    /// Column shown in the `-->` locator: the first point annotation, or the
    /// first annotation of any kind.
    #[must_use]
    pub fn locator_col(&self) -> usize {
        self.annotations
            .iter()
            .find(|a| a.marker == Marker::Point)
            .or_else(|| self.annotations.first())
            .map_or(1, |a| a.col)
    }
}

/// A diagnostic about the program being compiled.
#[derive(Debug, Clone)]
pub struct Issue {
    source: Arc<SourceMap>,
    kind: IssueKind,
    severity: Severity,
    message: String,
    lines: Vec<AnnotatedLine>,
}

impl Issue {
    /// Creates an issue with no annotations.
    pub fn new(
        source: Arc<SourceMap>,
        kind: IssueKind,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            kind,
            severity,
            message: message.into(),
            lines: Vec::new(),
        }
    }

    /// Shorthand for an error issue.
    pub fn error(source: Arc<SourceMap>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(source, kind, Severity::Error, message)
    }

    /// Shorthand for a warning issue.
    pub fn warning(source: Arc<SourceMap>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(source, kind, Severity::Warning, message)
    }

    /// Underlines `[start, end)` with `^` and attaches `note`.
    pub fn point(&mut self, start: usize, end: usize, note: impl Into<String>) -> &mut Self {
        self.annotate(start, end, Marker::Point, note.into())
    }

    /// Underlines `[start, end)` with `-` and attaches `note`.
    pub fn info(&mut self, start: usize, end: usize, note: impl Into<String>) -> &mut Self {
        self.annotate(start, end, Marker::Info, note.into())
    }

    /// [`Issue::point`] over the span of `at`.
    pub fn point_at(&mut self, at: &impl Spanned, note: impl Into<String>) -> &mut Self {
        let span = at.span();
        self.point(span.start, span.end, note)
    }

    /// [`Issue::info`] over the span of `at`.
    pub fn info_at(&mut self, at: &impl Spanned, note: impl Into<String>) -> &mut Self {
        let span = at.span();
        self.info(span.start, span.end, note)
    }

    fn annotate(&mut self, start: usize, end: usize, marker: Marker, note: String) -> &mut Self {
        let pos = self.source.line_col(start);
        let annotation = Annotation {
            col: pos.col,
            width: end.saturating_sub(start).max(1),
            marker,
            note,
        };

        match self.lines.iter_mut().find(|l| l.line == pos.line) {
            Some(line) => line.annotations.push(annotation),
            None => self.lines.push(AnnotatedLine {
                line: pos.line,
                text: self.source.line_text(pos.line),
                annotations: vec![annotation],
            }),
        }
        self
    }

    /// The headline message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Warning or error.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Producing phase.
    pub fn kind(&self) -> IssueKind {
        self.kind
    }

    /// The source this issue points into.
    pub fn source(&self) -> &Arc<SourceMap> {
        &self.source
    }

    /// Annotated lines in insertion order.
    pub fn lines(&self) -> &[AnnotatedLine] {
        &self.lines
    }

    /// All annotations across all lines.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.lines.iter().flat_map(|l| l.annotations.iter())
    }

    /// Renders the issue as a multi-line snippet.
    #[must_use]
    pub fn render(&self, use_colors: bool) -> String {
        let paint = Paint { use_colors };

        let mut out = String::new();
        out.push_str(paint.open(self.severity.color_code()));
        out.push_str(self.severity.as_str());
        out.push(':');
        out.push_str(&self.message);
        out.push_str(paint.close());
        out.push('\n');

        let mut lines: Vec<&AnnotatedLine> = self.lines.iter().collect();
        lines.sort_by_key(|l| l.line);

        let gutter_width = lines
            .iter()
            .map(|l| l.line.to_string().len())
            .max()
            .unwrap_or(1);

        for line in lines {
            self.render_line(&mut out, line, gutter_width, paint);
        }
        out
    }

    fn render_line(&self, out: &mut String, line: &AnnotatedLine, width: usize, paint: Paint) {
        let gutter = format!(
            "{}{}┃{}",
            paint.open(CYAN),
            " ".repeat(width),
            paint.close()
        );

        out.push_str(&" ".repeat(width - 1));
        out.push_str(&format!(
            "-->{}:{}:{}\n",
            self.source.label(),
            line.line,
            line.locator_col()
        ));
        out.push_str(&gutter);
        out.push('\n');

        let number = line.line.to_string();
        out.push_str(paint.open(CYAN));
        out.push_str(&" ".repeat(width - number.len()));
        out.push_str(&number);
        out.push('┃');
        out.push_str(paint.close());
        out.push_str(&line.text);
        out.push('\n');

        let mut annotations: Vec<&Annotation> = line.annotations.iter().collect();
        annotations.sort_by_key(|a| a.col);
        let Some(last) = annotations.last() else {
            return;
        };

        out.push_str(&gutter);
        let mut col = 1;
        for a in &annotations {
            if a.col < col {
                continue;
            }
            pad(out, a.col - col);
            out.extend(std::iter::repeat_n(a.marker.glyph(), a.width));
            col = a.col + a.width;
        }
        out.push(' ');
        out.push_str(&last.note);
        out.push('\n');

        // Staircase: each earlier note gets a leader row and a text row.
        for i in (1..annotations.len()).rev() {
            let note = &annotations[i - 1].note;
            if note.is_empty() {
                continue;
            }

            out.push_str(&gutter);
            let mut col = 1;
            for a in &annotations[..i] {
                if a.col < col {
                    continue;
                }
                pad(out, a.col - col);
                out.push('|');
                col = a.col + 1;
            }
            out.push('\n');

            out.push_str(&gutter);
            let mut col = 1;
            for pair in annotations[..i].windows(2) {
                if pair[0].col == pair[1].col {
                    continue;
                }
                pad(out, pair[0].col.saturating_sub(col));
                out.push('|');
                col = pair[0].col + 1;
            }
            pad(out, annotations[i - 1].col.saturating_sub(col));
            out.push_str(note);
            out.push('\n');
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

#[derive(Clone, Copy)]
struct Paint {
    use_colors: bool,
}

impl Paint {
    fn open(self, code: &'static str) -> &'static str {
        if self.use_colors { code } else { "" }
    }

    fn close(self) -> &'static str {
        if self.use_colors { RESET } else { "" }
    }
}

fn pad(out: &mut String, n: usize) {
    out.extend(std::iter::repeat_n(' ', n));
}

/// Handle to an issue stored in a [`Diagnostics`] sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssueId {
    severity: Severity,
    index: usize,
}

impl IssueId {
    pub(crate) const fn new(severity: Severity, index: usize) -> Self {
        Self { severity, index }
    }

    /// Position within its severity's list.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Which list the issue lives in.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }
}

/// Session-wide collection of errors and warnings.
///
/// One sink is threaded through every lex/parse call of a compile session.
/// Nothing is ever removed except by [`Diagnostics::clear`].
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Issue>,
    warnings: Vec<Issue>,
}

impl Diagnostics {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `issue` in the list matching its severity.
    pub fn report(&mut self, issue: Issue) -> IssueId {
        let severity = issue.severity;
        let list = match severity {
            Severity::Error => &mut self.errors,
            Severity::Warning => &mut self.warnings,
        };
        list.push(issue);
        IssueId::new(severity, list.len() - 1)
    }

    /// Stores a new error and returns it for annotation.
    pub fn error(
        &mut self,
        source: &Arc<SourceMap>,
        kind: IssueKind,
        message: impl Into<String>,
    ) -> &mut Issue {
        let id = self.report(Issue::error(Arc::clone(source), kind, message));
        self.issue_mut(id)
    }

    /// Stores a new warning and returns it for annotation.
    pub fn warning(
        &mut self,
        source: &Arc<SourceMap>,
        kind: IssueKind,
        message: impl Into<String>,
    ) -> &mut Issue {
        let id = self.report(Issue::warning(Arc::clone(source), kind, message));
        self.issue_mut(id)
    }

    /// The issue behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this sink or the sink was cleared.
    pub fn issue(&self, id: IssueId) -> &Issue {
        match id.severity {
            Severity::Error => &self.errors[id.index],
            Severity::Warning => &self.warnings[id.index],
        }
    }

    /// Mutable access to the issue behind `id`, for adding annotations.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this sink or the sink was cleared.
    pub fn issue_mut(&mut self, id: IssueId) -> &mut Issue {
        match id.severity {
            Severity::Error => &mut self.errors[id.index],
            Severity::Warning => &mut self.warnings[id.index],
        }
    }

    /// Recorded errors, oldest first.
    pub fn errors(&self) -> &[Issue] {
        &self.errors
    }

    /// Recorded warnings, oldest first.
    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }

    /// Whether any error was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Whether nothing was recorded at all.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Forgets every issue.
    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }

    /// Renders all warnings, then all errors.
    #[must_use]
    pub fn render_all(&self, use_colors: bool) -> String {
        self.warnings
            .iter()
            .chain(&self.errors)
            .map(|issue| issue.render(use_colors))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> Arc<SourceMap> {
        Arc::new(SourceMap::new(0, text))
    }

    #[test]
    fn test_severity_names_and_colors() {
        assert_eq!(Severity::Error.to_string(), "ERROR");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Error.color_code(), "\x1b[31m");
        assert_eq!(Severity::Warning.color_code(), "\x1b[33m");
    }

    #[test]
    fn test_annotations_resolve_to_line_and_col() {
        let src = source("hello\nworld");
        let mut issue = Issue::error(src, IssueKind::Parser, "bad");
        issue.point(7, 9, "here").info(0, 1, "start");

        let lines = issue.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, 2);
        assert_eq!(lines[0].text, "world");
        assert_eq!(lines[0].annotations[0].col, 2);
        assert_eq!(lines[0].annotations[0].width, 2);
        assert_eq!(lines[1].line, 1);
        assert_eq!(lines[1].locator_col(), 1);
    }

    fn render_plain(issue: &Issue) -> Vec<String> {
        issue.render(false).lines().map(str::to_string).collect()
    }

    #[test]
    fn test_render_single_point() {
        let src = source("x = )");
        let mut issue = Issue::error(src, IssueKind::Parser, "expected expression");
        issue.point(4, 5, "here");

        assert_eq!(
            render_plain(&issue),
            [
                "ERROR:expected expression",
                "--><input>:1:5",
                " ┃",
                "1┃x = )",
                " ┃    ^ here",
            ]
        );
    }

    #[test]
    fn test_render_staircase() {
        let src = source("hello everyone\nthe code is for IssueTest");
        let mut issue = Issue::error(src, IssueKind::Parser, "error1");
        issue
            .info(6, 14, "who is everyone?")
            .info(6, 14, "oh no")
            .point(6, 14, "idk everyone");

        assert_eq!(
            render_plain(&issue),
            [
                "ERROR:error1",
                "--><input>:1:7",
                " ┃",
                "1┃hello everyone",
                " ┃      -------- idk everyone",
                " ┃      |",
                " ┃      oh no",
                " ┃      |",
                " ┃      who is everyone?",
            ]
        );
    }

    #[test]
    fn test_render_separate_columns() {
        let src = source("s = \"abc");
        let mut issue = Issue::error(src, IssueKind::Lexer, "unterminated string");
        issue.info(4, 5, "string start").point(8, 9, "expected end");

        let lines = render_plain(&issue);
        assert_eq!(lines[1], "--><input>:1:9");
        assert_eq!(lines[4], " ┃    -   ^ expected end");
        assert_eq!(lines[5], " ┃    |");
        assert_eq!(lines[6], " ┃    string start");
    }

    #[test]
    fn test_render_gutter_width_follows_largest_line() {
        let text = (1..=12).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
        let src = Arc::new(SourceMap::new(0, &text));
        let mut issue = Issue::warning(src.clone(), IssueKind::Lexer, "w");
        let line12 = src.line_start(12).unwrap();
        let line3 = src.line_start(3).unwrap();
        issue.point(line12, line12 + 1, "a").point(line3, line3 + 1, "b");

        let lines = render_plain(&issue);
        assert_eq!(lines[0], "WARNING:w");
        assert_eq!(lines[1], " --><input>:3:1");
        assert_eq!(lines[3], " 3┃l3");
        assert_eq!(lines[5], " --><input>:12:1");
        assert_eq!(lines[7], "12┃l12");
    }

    #[test]
    fn test_render_with_colors() {
        let src = source("x");
        let mut issue = Issue::error(src, IssueKind::Parser, "boom");
        issue.point(0, 1, "");
        let rendered = issue.render(true);
        assert!(rendered.starts_with("\x1b[31mERROR:boom\x1b[0m\n"));
        assert!(rendered.contains("\x1b[36m ┃\x1b[0m"));
        assert_eq!(issue.to_string(), rendered);
    }

    #[test]
    fn test_sink_tracks_ids() {
        let src = source("abc");
        let mut diagnostics = Diagnostics::new();
        diagnostics.warning(&src, IssueKind::Lexer, "w1");
        let id = diagnostics.report(Issue::error(src.clone(), IssueKind::Parser, "e1"));
        assert_eq!(id.severity(), Severity::Error);
        assert_eq!(id.index(), 0);

        diagnostics.issue_mut(id).info(0, 1, "while parsing things");
        assert_eq!(diagnostics.issue(id).annotations().count(), 1);
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.has_errors());

        let all = diagnostics.render_all(false);
        assert!(all.find("WARNING:w1").unwrap() < all.find("ERROR:e1").unwrap());

        diagnostics.clear();
        assert!(diagnostics.is_empty());
    }
}
