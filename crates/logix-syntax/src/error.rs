//! Error types for the front end.
//!
//! Problems in the *program being compiled* are never Rust errors; they are
//! [`Issue`](crate::diagnostic::Issue)s collected in a
//! [`Diagnostics`](crate::diagnostic::Diagnostics) sink. The types here cover
//! the two remaining cases:
//!
//! - [`ParseError`]: unwinds the parser after a grammar violation has already
//!   been recorded, so enclosing productions can add context to it.
//! - [`SourceError`]: the tool itself failed, e.g. a file could not be read.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::diagnostic::IssueId;

/// A grammar violation that is unwinding the parser.
///
/// The issue it names is already stored in the session's error list; the
/// handle only lets callers keep annotating it while the error propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    issue: IssueId,
}

impl ParseError {
    pub(crate) const fn new(issue: IssueId) -> Self {
        Self { issue }
    }

    /// The recorded issue.
    #[must_use]
    pub const fn issue(&self) -> IssueId {
        self.issue
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error (issue #{})", self.issue.index())
    }
}

impl std::error::Error for ParseError {}

/// Result of a parser production.
pub type ParseResult<T> = Result<T, ParseError>;

/// Failure to obtain source text.
#[derive(Debug)]
pub enum SourceError {
    /// A file could not be read.
    Io {
        /// The file being read.
        path: PathBuf,
        /// Underlying cause.
        source: io::Error,
    },

    /// The project root is not a directory.
    NotADirectory(PathBuf),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::NotADirectory(path) => {
                write!(f, "project root {} is not a directory", path.display())
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotADirectory(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Io {
            path: PathBuf::from("src/test.lx"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "failed to read src/test.lx: gone");
        assert!(std::error::Error::source(&err).is_some());

        let err = SourceError::NotADirectory(PathBuf::from("x"));
        assert_eq!(err.to_string(), "project root x is not a directory");
    }

    #[test]
    fn test_parse_error_names_issue() {
        let err = ParseError::new(IssueId::new(Severity::Error, 3));
        assert_eq!(err.issue().index(), 3);
        assert_eq!(err.to_string(), "parse error (issue #3)");
    }
}
