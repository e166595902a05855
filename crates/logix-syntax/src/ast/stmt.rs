//! Statement nodes.

use crate::ast::expr::{BinaryOp, Expr, Ident};
use crate::span::{Span, Spanned};

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Root of a file: all top-level statements.
    Program {
        /// Statements in order
        stmts: Vec<Stmt>,
        /// Source location
        span: Span,
    },

    /// Braced statement list: `{ ... }`
    Block {
        /// Statements in order
        stmts: Vec<Stmt>,
        /// Source location
        span: Span,
    },

    /// Expression evaluated for its effect: `print(x)`
    Expr {
        /// The expression
        expr: Expr,
        /// Source location
        span: Span,
    },

    /// Conditional. `elif` chains nest as an `If` in `else_branch`.
    If {
        /// Condition
        condition: Expr,
        /// Taken when the condition holds
        then_branch: Box<Stmt>,
        /// `elif` or `else` branch
        else_branch: Option<Box<Stmt>>,
        /// Source location
        span: Span,
    },

    /// Loop: `for {}`, `for cond {}`, `for x {}`, `for x in iterable {}`
    For {
        /// Loop variable, present with the `x` and `x in iterable` forms
        var: Option<Ident>,
        /// Condition or iterable
        iterable: Option<Expr>,
        /// Loop body
        body: Box<Stmt>,
        /// Source location
        span: Span,
    },

    /// Conditional loop: `while cond {}`
    While {
        /// Condition
        condition: Expr,
        /// Loop body
        body: Box<Stmt>,
        /// Source location
        span: Span,
    },

    /// `break`
    Break {
        /// Source location
        span: Span,
    },

    /// `continue`
    Continue {
        /// Source location
        span: Span,
    },

    /// Function declaration: `fn name(a, b) -> r { ... }`
    Fn {
        /// Function name
        name: Ident,
        /// Parameters, usually identifiers
        params: Vec<Expr>,
        /// Result expressions after `->`
        results: Vec<Expr>,
        /// Function body
        body: Box<Stmt>,
        /// Source location
        span: Span,
    },

    /// `return` with an optional value
    Return {
        /// Returned value
        value: Option<Expr>,
        /// Source location
        span: Span,
    },

    /// Assignment: `x = v` or compound `x += v`
    Assign {
        /// Assigned place
        target: Expr,
        /// Operator of a compound assignment
        op: Option<BinaryOp>,
        /// Assigned value
        value: Expr,
        /// Source location
        span: Span,
    },

    /// Variable declaration: `set x`, `set x = v`, `set x += v`
    SetVar {
        /// Declared place
        target: Expr,
        /// Operator of a compound initializer
        op: Option<BinaryOp>,
        /// Initial value
        value: Option<Expr>,
        /// Source location
        span: Span,
    },
}

impl Stmt {
    /// Short node name used in tree dumps.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Program { .. } => "Program",
            Self::Block { .. } => "Block",
            Self::Expr { .. } => "ExprStmt",
            Self::If { .. } => "If",
            Self::For { .. } => "For",
            Self::While { .. } => "While",
            Self::Break { .. } => "Break",
            Self::Continue { .. } => "Continue",
            Self::Fn { .. } => "Fn",
            Self::Return { .. } => "Return",
            Self::Assign { .. } => "Assign",
            Self::SetVar { .. } => "Set",
        }
    }

    /// Child statements of a program or block.
    #[must_use]
    pub fn statements(&self) -> Option<&[Stmt]> {
        match self {
            Self::Program { stmts, .. } | Self::Block { stmts, .. } => Some(stmts),
            _ => None,
        }
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        match self {
            Self::Program { span, .. }
            | Self::Block { span, .. }
            | Self::Expr { span, .. }
            | Self::If { span, .. }
            | Self::For { span, .. }
            | Self::While { span, .. }
            | Self::Break { span }
            | Self::Continue { span }
            | Self::Fn { span, .. }
            | Self::Return { span, .. }
            | Self::Assign { span, .. }
            | Self::SetVar { span, .. } => *span,
        }
    }
}
