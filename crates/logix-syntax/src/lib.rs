//! Logix Syntax: Lexer, Parser, and Diagnostics
//!
//! This crate is the front end of the Logix compiler. It turns source text
//! into an AST while collecting source-anchored errors and warnings:
//! - Source maps (line-ending normalization, offset to line/column)
//! - Lexical analysis (tokenization with fail-soft recovery)
//! - Parsing (recursive descent with statement-level recovery)
//! - Diagnostics (annotated snippet rendering)
//!
//! # Modules
//!
//! - [`source_map`] - Normalized, line-indexed file text
//! - [`span`] - Source location tracking
//! - [`token`] - Token kinds and tokens
//! - [`keywords`] - Reserved word table
//! - [`lexer`] - Pull-based scanner
//! - [`diagnostic`] - Issues and the diagnostics sink
//! - [`ast`] - Statement and expression nodes
//! - [`parser`] - Recursive descent parser
//! - [`pretty`] - Tree dumps of the AST
//! - [`error`] - Parser unwinding and source loading errors
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use logix_syntax::{Diagnostics, SourceMap, Stmt};
//!
//! let mut diagnostics = Diagnostics::new();
//! let source = Arc::new(SourceMap::new(0, "fn add(a, b) -> r { r = a + b }"));
//! let program = logix_syntax::parse_source(source, &mut diagnostics);
//!
//! assert!(!diagnostics.has_errors());
//! assert!(matches!(program, Stmt::Program { ref stmts, .. } if stmts.len() == 1));
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod keywords;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod source_map;
pub mod span;
pub mod token;

use std::sync::Arc;

pub use ast::{BinaryOp, Expr, Ident, LiteralValue, Stmt, UnaryOp};
pub use diagnostic::{Diagnostics, Issue, IssueId, IssueKind, Severity};
pub use error::{ParseError, ParseResult, SourceError};
pub use lexer::Lexer;
pub use parser::Parser;
pub use pretty::{TreeConfig, TreePrinter};
pub use source_map::{SourceMap, SourceMapManager};
pub use span::{LineCol, Span, Spanned};
pub use token::{Literal, Token, TokenKind};

/// Lexes and parses one file with a fresh lexer.
///
/// Drivers that process many files should keep one [`Lexer`] and
/// [`Lexer::reset`] it instead.
pub fn parse_source(source: Arc<SourceMap>, diagnostics: &mut Diagnostics) -> Stmt {
    let mut lexer = Lexer::new(source);
    Parser::new(&mut lexer, diagnostics).parse()
}
