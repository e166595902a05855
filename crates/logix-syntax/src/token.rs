//! Token kinds and lexical tokens for Logix.
//!
//! [`TokenKind`] is a closed, payload-free enumeration; values produced by
//! the lexer (numbers, identifier names, string contents) travel separately
//! in [`Token::literal`].
//!
//! # Examples
//!
//! ```
//! use logix_syntax::span::Span;
//! use logix_syntax::token::{Literal, Token, TokenKind};
//!
//! let token = Token::with_literal(TokenKind::Int, Span::new(0, 0, 2), Literal::Number(42.0));
//! assert_eq!(token.number(), Some(42.0));
//! assert_eq!(token.to_string(), "Token{INT,Span{0,0,2},42}");
//! ```

use std::fmt;

use crate::span::{Span, Spanned};

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ===== Keywords =====
    /// `set`
    Set,
    /// `macro`
    Macro,
    /// `const`
    Const,
    /// `if`
    If,
    /// `elif`
    Elif,
    /// `else`
    Else,
    /// `while`
    While,
    /// `for`
    For,
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `struct`
    Struct,
    /// `match`
    Match,
    /// `fn`
    Fn,
    /// `return`
    Return,
    /// `enum`
    Enum,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,

    // ===== Names =====
    /// Identifier; the literal holds its text.
    Identifier,
    /// Flag marker. Reserved, never produced by the lexer.
    Flag,

    // ===== Literals =====
    /// Number with a fraction or exponent.
    Num,
    /// Integer-valued number, including `0x` and `0b` forms.
    Int,
    /// `0c` color; the literal holds RGBA8888 bits inside an `f64`.
    Col,
    /// String; the literal holds the text between the quotes.
    String,

    // ===== Operators =====
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `**`
    StarStar,
    /// `%`
    Percent,
    /// `%%`
    PercentPercent,
    /// `//`
    SlashSlash,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Caret,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `~`
    Tilde,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `=`
    Assign,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `===`
    EqEqEq,
    /// `!==`
    BangEqEq,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,
    /// `..`
    DotDot,
    /// `..=`
    DotDotEq,

    // ===== Separators =====
    /// `->`
    Arrow,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    // ===== Structure =====
    /// Doc comment; the literal holds its text.
    DocComment,
    /// One or more line breaks.
    Newline,
    /// Reserved, never produced by the lexer.
    Unknown,
    /// Malformed input that was already reported.
    Error,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: &'static [TokenKind] = &[
        Self::Set,
        Self::Macro,
        Self::Const,
        Self::If,
        Self::Elif,
        Self::Else,
        Self::While,
        Self::For,
        Self::Break,
        Self::Continue,
        Self::Struct,
        Self::Match,
        Self::Fn,
        Self::Return,
        Self::Enum,
        Self::True,
        Self::False,
        Self::Null,
        Self::Identifier,
        Self::Flag,
        Self::Num,
        Self::Int,
        Self::Col,
        Self::String,
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::Slash,
        Self::StarStar,
        Self::Percent,
        Self::PercentPercent,
        Self::SlashSlash,
        Self::And,
        Self::Or,
        Self::Caret,
        Self::Shl,
        Self::Shr,
        Self::Tilde,
        Self::PlusPlus,
        Self::MinusMinus,
        Self::Assign,
        Self::EqEq,
        Self::BangEq,
        Self::EqEqEq,
        Self::BangEqEq,
        Self::Less,
        Self::Greater,
        Self::LessEq,
        Self::GreaterEq,
        Self::AndAnd,
        Self::OrOr,
        Self::Bang,
        Self::DotDot,
        Self::DotDotEq,
        Self::Arrow,
        Self::Colon,
        Self::Semicolon,
        Self::Comma,
        Self::Dot,
        Self::LParen,
        Self::RParen,
        Self::LBracket,
        Self::RBracket,
        Self::LBrace,
        Self::RBrace,
        Self::DocComment,
        Self::Newline,
        Self::Unknown,
        Self::Error,
        Self::Eof,
    ];

    /// Source text of a keyword kind.
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        Some(match self {
            Self::Set => "set",
            Self::Macro => "macro",
            Self::Const => "const",
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Struct => "struct",
            Self::Match => "match",
            Self::Fn => "fn",
            Self::Return => "return",
            Self::Enum => "enum",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            _ => return None,
        })
    }

    /// Source text of an operator or separator kind.
    #[must_use]
    pub const fn symbol(self) -> Option<&'static str> {
        Some(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::StarStar => "**",
            Self::Percent => "%",
            Self::PercentPercent => "%%",
            Self::SlashSlash => "//",
            Self::And => "&",
            Self::Or => "|",
            Self::Caret => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Tilde => "~",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::Assign => "=",
            Self::EqEq => "==",
            Self::BangEq => "!=",
            Self::EqEqEq => "===",
            Self::BangEqEq => "!==",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEq => "<=",
            Self::GreaterEq => ">=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Bang => "!",
            Self::DotDot => "..",
            Self::DotDotEq => "..=",
            Self::Arrow => "->",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Newline => "\\n",
            Self::Eof => "\\0",
            _ => return None,
        })
    }

    /// Upper-case name used in token dumps, e.g. `BANG_EQ_EQ`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Set => "SET",
            Self::Macro => "MACRO",
            Self::Const => "CONST",
            Self::If => "IF",
            Self::Elif => "ELIF",
            Self::Else => "ELSE",
            Self::While => "WHILE",
            Self::For => "FOR",
            Self::Break => "BREAK",
            Self::Continue => "CONTINUE",
            Self::Struct => "STRUCT",
            Self::Match => "MATCH",
            Self::Fn => "FN",
            Self::Return => "RETURN",
            Self::Enum => "ENUM",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Null => "NULL",
            Self::Identifier => "IDENTIFIER",
            Self::Flag => "FLAG",
            Self::Num => "NUM",
            Self::Int => "INT",
            Self::Col => "COL",
            Self::String => "STRING",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Star => "STAR",
            Self::Slash => "SLASH",
            Self::StarStar => "STAR_STAR",
            Self::Percent => "PERCENT",
            Self::PercentPercent => "PERCENT_PERCENT",
            Self::SlashSlash => "SLASH_SLASH",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Caret => "CARET",
            Self::Shl => "SHL",
            Self::Shr => "SHR",
            Self::Tilde => "TILDE",
            Self::PlusPlus => "PLUS_PLUS",
            Self::MinusMinus => "MINUS_MINUS",
            Self::Assign => "ASSIGN",
            Self::EqEq => "EQ_EQ",
            Self::BangEq => "BANG_EQ",
            Self::EqEqEq => "EQ_EQ_EQ",
            Self::BangEqEq => "BANG_EQ_EQ",
            Self::Less => "LESS",
            Self::Greater => "GREATER",
            Self::LessEq => "LESS_EQ",
            Self::GreaterEq => "GREATER_EQ",
            Self::AndAnd => "AND_AND",
            Self::OrOr => "OR_OR",
            Self::Bang => "BANG",
            Self::DotDot => "DOT_DOT",
            Self::DotDotEq => "DOT_DOT_EQ",
            Self::Arrow => "ARROW",
            Self::Colon => "COLON",
            Self::Semicolon => "SEMICOLON",
            Self::Comma => "COMMA",
            Self::Dot => "DOT",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBracket => "LBRACKET",
            Self::RBracket => "RBRACKET",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::DocComment => "DOC_COMMENT",
            Self::Newline => "NEWLINE",
            Self::Unknown => "UNKNOWN",
            Self::Error => "ERROR",
            Self::Eof => "EOF",
        }
    }

    /// Returns `true` for reserved words.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        self.keyword().is_some()
    }

    /// Returns `true` for kinds that denote a literal value.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::Num
                | Self::Int
                | Self::Col
                | Self::String
                | Self::True
                | Self::False
                | Self::Null
        )
    }

    /// Returns `true` for operators that may form a compound assignment
    /// (`OP=`).
    #[must_use]
    pub const fn is_binary_operator(self) -> bool {
        matches!(
            self,
            Self::Plus
                | Self::Minus
                | Self::Star
                | Self::Slash
                | Self::StarStar
                | Self::Percent
                | Self::PercentPercent
                | Self::SlashSlash
                | Self::And
                | Self::Or
                | Self::Caret
                | Self::Shl
                | Self::Shr
                | Self::AndAnd
                | Self::OrOr
        )
    }

    /// Returns `true` for punctuation that separates constructs.
    #[must_use]
    pub const fn is_separator(self) -> bool {
        matches!(
            self,
            Self::Arrow
                | Self::Colon
                | Self::Semicolon
                | Self::Comma
                | Self::Dot
                | Self::LParen
                | Self::RParen
                | Self::LBracket
                | Self::RBracket
                | Self::LBrace
                | Self::RBrace
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .keyword()
            .or_else(|| self.symbol())
            .unwrap_or_else(|| self.name());
        f.write_str(text)
    }
}

/// Value carried by a token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric and color literals.
    Number(f64),
    /// Identifier names, string contents, doc-comment text, or the raw text
    /// of an ERROR token.
    Text(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// Where the token came from.
    pub span: Span,
    /// Value, for identifiers, literals, doc comments and some ERROR tokens.
    pub literal: Option<Literal>,
}

impl Token {
    /// Creates a token without a literal.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            literal: None,
        }
    }

    /// Creates a token carrying `literal`.
    #[must_use]
    pub const fn with_literal(kind: TokenKind, span: Span, literal: Literal) -> Self {
        Self {
            kind,
            span,
            literal: Some(literal),
        }
    }

    /// Returns `true` if this token is of kind `kind`.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Numeric literal value.
    #[must_use]
    pub fn number(&self) -> Option<f64> {
        match self.literal {
            Some(Literal::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Text literal value.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::Text(s)) => Some(s),
            _ => None,
        }
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token{{{},{}", self.kind.name(), self.span)?;
        if let Some(literal) = &self.literal {
            write!(f, ",{literal}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_all_is_complete() {
        let names: std::collections::HashSet<_> =
            TokenKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), TokenKind::ALL.len());
        assert_eq!(TokenKind::ALL.first(), Some(&TokenKind::Set));
        assert_eq!(TokenKind::ALL.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn test_token_kind_classes() {
        assert!(TokenKind::Elif.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(TokenKind::Null.is_literal());
        assert!(TokenKind::Col.is_literal());
        assert!(!TokenKind::Identifier.is_literal());
        assert!(TokenKind::SlashSlash.is_binary_operator());
        assert!(TokenKind::OrOr.is_binary_operator());
        assert!(!TokenKind::EqEq.is_binary_operator());
        assert!(TokenKind::Arrow.is_separator());
        assert!(!TokenKind::DotDot.is_separator());
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(TokenKind::Fn.to_string(), "fn");
        assert_eq!(TokenKind::BangEqEq.to_string(), "!==");
        assert_eq!(TokenKind::DotDotEq.to_string(), "..=");
        assert_eq!(TokenKind::Newline.to_string(), "\\n");
        assert_eq!(TokenKind::Eof.to_string(), "\\0");
        assert_eq!(TokenKind::Identifier.to_string(), "IDENTIFIER");
    }

    #[test]
    fn test_token_display() {
        let plain = Token::new(TokenKind::Comma, Span::new(0, 3, 4));
        assert_eq!(plain.to_string(), "Token{COMMA,Span{0,3,4}}");

        let ident = Token::with_literal(
            TokenKind::Identifier,
            Span::new(1, 0, 3),
            Literal::Text("foo".into()),
        );
        assert_eq!(ident.to_string(), "Token{IDENTIFIER,Span{1,0,3},foo}");
        assert_eq!(ident.text(), Some("foo"));
        assert_eq!(ident.number(), None);
    }
}
