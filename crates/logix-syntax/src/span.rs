//! Source location tracking for tokens and AST nodes.
//!
//! A [`Span`] is a half-open range of *character* offsets into one
//! [`SourceMap`](crate::source_map::SourceMap), tagged with the index of that
//! source. Line and column numbers are not stored; they are resolved on
//! demand through the source map, which keeps spans small and `Copy`.
//!
//! # Examples
//!
//! ```
//! use logix_syntax::span::Span;
//!
//! let left = Span::new(0, 0, 3);
//! let right = Span::new(0, 6, 9);
//! let merged = Span::between(left, right);
//!
//! assert_eq!(merged, Span::new(0, 0, 9));
//! assert_eq!(merged.len(), 9);
//! ```

use std::fmt;

/// Half-open character range `[start, end)` inside source number `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Index of the source map this span points into.
    pub source: usize,
    /// First character offset covered by the span.
    pub start: usize,
    /// One past the last character offset covered by the span.
    pub end: usize,
}

impl Span {
    /// Creates a span.
    ///
    /// # Panics
    ///
    /// Panics in debug builds when `start > end`.
    #[must_use]
    pub const fn new(source: usize, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { source, start, end }
    }

    /// Creates a zero-width span at `offset`.
    #[must_use]
    pub const fn point(source: usize, offset: usize) -> Self {
        Self::new(source, offset, offset)
    }

    /// Returns the smallest span covering both `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics when the spans belong to different sources. Joining spans from
    /// two files is a bug in the caller, never a property of the input.
    #[must_use]
    pub fn between(a: Span, b: Span) -> Self {
        assert_eq!(
            a.source, b.source,
            "cannot join spans from different sources"
        );
        Self::new(a.source, a.start.min(b.start), a.end.max(b.end))
    }

    /// Method form of [`Span::between`].
    #[must_use]
    pub fn to(self, other: Span) -> Self {
        Self::between(self, other)
    }

    /// Number of characters covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no characters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` lies inside the span.
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span{{{},{},{}}}", self.source, self.start, self.end)
    }
}

/// A resolved, 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineCol {
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based, in characters).
    pub col: usize,
}

impl LineCol {
    /// Creates a new line/column pair.
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Anything that knows where it came from.
pub trait Spanned {
    /// Returns the source range of this item.
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl<T: Spanned> Spanned for Box<T> {
    fn span(&self) -> Span {
        (**self).span()
    }
}
