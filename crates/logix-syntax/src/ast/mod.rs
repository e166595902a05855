//! Abstract syntax tree for Logix.
//!
//! Two closed families of nodes, [`Stmt`] and [`Expr`]. Every node carries
//! the [`Span`](crate::span::Span) covering all of its parts, and every
//! parent owns its children outright; there is no sharing and there are no
//! back-references.
//!
//! Nodes are plain data. Later phases walk them with `match`.

pub mod expr;
pub mod stmt;

pub use expr::{BinaryOp, Expr, Ident, LiteralValue, UnaryOp};
pub use stmt::Stmt;
