//! Expression nodes.

use std::fmt;

use crate::span::{Span, Spanned};
use crate::token::{Literal, Token, TokenKind};

/// A name together with where it was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    /// The identifier text.
    pub name: String,
    /// Source location
    pub span: Span,
}

impl Ident {
    /// Creates an identifier.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Builds an identifier from an IDENTIFIER token.
    #[must_use]
    pub fn from_token(token: &Token) -> Self {
        Self::new(token.text().unwrap_or_default(), token.span)
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Value of a literal expression.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Integer-valued number (decimal, `0x` or `0b`).
    Int(f64),
    /// Number with a fraction or exponent.
    Num(f64),
    /// Color; RGBA8888 bits stored in the float.
    Color(f64),
    /// String contents.
    Str(String),
    /// `true` or `false`.
    Bool(bool),
    /// `null`
    Null,
    /// Placeholder for input that could not be parsed.
    Error,
}

impl LiteralValue {
    /// Converts a literal token into its value. Tokens that are not literals
    /// (ERROR tokens included) become [`LiteralValue::Error`].
    #[must_use]
    pub fn from_token(token: &Token) -> Self {
        let number = token.number().unwrap_or_default();
        match token.kind {
            TokenKind::Int => Self::Int(number),
            TokenKind::Num => Self::Num(number),
            TokenKind::Col => Self::Color(number),
            TokenKind::String => match &token.literal {
                Some(Literal::Text(text)) => Self::Str(text.clone()),
                _ => Self::Str(String::new()),
            },
            TokenKind::True => Self::Bool(true),
            TokenKind::False => Self::Bool(false),
            TokenKind::Null => Self::Null,
            _ => Self::Error,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) | Self::Num(n) => write!(f, "{n}"),
            Self::Color(bits) => write!(f, "0c{:08X}", bits.to_bits()),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
            Self::Error => f.write_str("<error>"),
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Logical negation: `!`
    Not,
    /// Arithmetic negation: `-`
    Neg,
}

impl UnaryOp {
    /// Maps a token kind to its prefix operator.
    #[must_use]
    pub const fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Bang => Some(Self::Not),
            TokenKind::Minus => Some(Self::Neg),
            _ => None,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Not => write!(f, "!"),
            Self::Neg => write!(f, "-"),
        }
    }
}

/// Infix operators, including those only usable in compound assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `**`
    Pow,
    /// `%`
    Rem,
    /// `%%`
    Mod,
    /// `//`
    IntDiv,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
}

impl BinaryOp {
    /// Maps a token kind to its infix operator.
    #[must_use]
    pub const fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Sub,
            TokenKind::Star => Self::Mul,
            TokenKind::Slash => Self::Div,
            TokenKind::StarStar => Self::Pow,
            TokenKind::Percent => Self::Rem,
            TokenKind::PercentPercent => Self::Mod,
            TokenKind::SlashSlash => Self::IntDiv,
            TokenKind::And => Self::BitAnd,
            TokenKind::Or => Self::BitOr,
            TokenKind::Caret => Self::BitXor,
            TokenKind::Shl => Self::Shl,
            TokenKind::Shr => Self::Shr,
            TokenKind::AndAnd => Self::And,
            TokenKind::OrOr => Self::Or,
            TokenKind::EqEq => Self::Eq,
            TokenKind::BangEq => Self::NotEq,
            TokenKind::Less => Self::Lt,
            TokenKind::LessEq => Self::LtEq,
            TokenKind::Greater => Self::Gt,
            TokenKind::GreaterEq => Self::GtEq,
            _ => return None,
        })
    }

    /// The operator as written in source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
            Self::Rem => "%",
            Self::Mod => "%%",
            Self::IntDiv => "//",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::And => "&&",
            Self::Or => "||",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value: `42`, `"text"`, `true`, `0cFF00FF00`
    Literal {
        /// The value
        value: LiteralValue,
        /// Source location
        span: Span,
    },

    /// Variable reference: `x`
    Identifier(Ident),

    /// Prefix operation: `-x`, `!done`
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// Infix operation: `a + b`
    Binary {
        /// Left operand
        left: Box<Expr>,
        /// Operator
        op: BinaryOp,
        /// Right operand
        right: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// Array literal: `{1, 2, 3}`
    Array {
        /// Elements in order
        elements: Vec<Expr>,
        /// Source location
        span: Span,
    },

    /// Indexing: `list[i]`
    Index {
        /// The indexed value
        target: Box<Expr>,
        /// The index
        index: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// Range: `a..b`, `a..=b`, `a..`, `..b`
    Range {
        /// Lower bound, absent for `..b`
        start: Option<Box<Expr>>,
        /// Upper bound, absent for `a..`
        end: Option<Box<Expr>>,
        /// `true` for `..=`
        inclusive: bool,
        /// Source location
        span: Span,
    },

    /// Call: `f(a, b)`
    Call {
        /// The called value
        callee: Box<Expr>,
        /// Arguments in order
        args: Vec<Expr>,
        /// Source location
        span: Span,
    },

    /// Field access: `object.field`
    Get {
        /// The accessed value
        object: Box<Expr>,
        /// An [`Expr::Identifier`], or an error literal when the name was
        /// missing
        field: Box<Expr>,
        /// Source location
        span: Span,
    },
}

impl Expr {
    /// A placeholder for an expression that failed to parse.
    #[must_use]
    pub const fn error(span: Span) -> Self {
        Self::Literal {
            value: LiteralValue::Error,
            span,
        }
    }

    /// Returns `true` for error placeholders.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::Literal {
                value: LiteralValue::Error,
                ..
            }
        )
    }

    /// Returns the identifier name if this is a plain variable reference.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(ident) => Some(&ident.name),
            _ => None,
        }
    }

    /// Short node name used in tree dumps.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "Literal",
            Self::Identifier(_) => "Identifier",
            Self::Unary { .. } => "Unary",
            Self::Binary { .. } => "Binary",
            Self::Array { .. } => "Array",
            Self::Index { .. } => "Index",
            Self::Range { .. } => "Range",
            Self::Call { .. } => "Call",
            Self::Get { .. } => "Get",
        }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Self::Identifier(ident) => ident.span,
            Self::Literal { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Array { span, .. }
            | Self::Index { span, .. }
            | Self::Range { span, .. }
            | Self::Call { span, .. }
            | Self::Get { span, .. } => *span,
        }
    }
}
