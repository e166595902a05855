//! Lexical analysis for Logix.
//!
//! The lexer is pull-based: every call to [`Lexer::scan_token`] returns
//! exactly one token, and once the input is exhausted it keeps returning
//! [`TokenKind::Eof`]. One lexer is meant to be reused across files through
//! [`Lexer::reset`].
//!
//! It never gives up on a file. Malformed input is reported to the
//! [`Diagnostics`] sink and turned into a best-effort token (an ERROR token
//! or a partial literal), so the parser always sees a well-shaped stream.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use logix_syntax::diagnostic::Diagnostics;
//! use logix_syntax::lexer::Lexer;
//! use logix_syntax::source_map::SourceMap;
//! use logix_syntax::token::TokenKind;
//!
//! let mut diagnostics = Diagnostics::new();
//! let mut lexer = Lexer::new(Arc::new(SourceMap::new(0, "x = 0x1F")));
//! let kinds: Vec<TokenKind> = lexer
//!     .tokenize(&mut diagnostics)
//!     .iter()
//!     .map(|t| t.kind)
//!     .collect();
//!
//! assert_eq!(kinds, [TokenKind::Identifier, TokenKind::Assign, TokenKind::Int, TokenKind::Eof]);
//! assert!(diagnostics.is_empty());
//! ```

use std::sync::Arc;

use logix_log::{Level, trace};

use crate::diagnostic::{Diagnostics, Issue, IssueKind};
use crate::keywords;
use crate::source_map::SourceMap;
use crate::span::Span;
use crate::token::{Literal, Token, TokenKind};

/// Characters that stop recovery after an unknown character.
const RECOVERY_DELIMITERS: &[char] = &[':', ';', ',', '.', ' ', '\n', '(', ')', '[', ']', '{', '}'];

/// Radix-prefixed literal forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Radix {
    Hex,
    Bin,
    Color,
}

impl Radix {
    fn from_prefix(c: char) -> Option<Self> {
        match c {
            'x' => Some(Self::Hex),
            'b' => Some(Self::Bin),
            'c' => Some(Self::Color),
            _ => None,
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::Hex => "0x",
            Self::Bin => "0b",
            Self::Color => "0c",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Hex => "hexadecimal",
            Self::Bin => "binary",
            Self::Color => "color",
        }
    }

    fn accepts(self, c: char) -> bool {
        match self {
            Self::Hex | Self::Color => c.is_ascii_hexdigit(),
            Self::Bin => matches!(c, '0' | '1'),
        }
    }
}

/// Pull-based scanner over one [`SourceMap`] at a time.
///
/// Not meant to be shared: it carries a cursor and scans one file at a
/// time.
#[derive(Debug)]
pub struct Lexer {
    source: Arc<SourceMap>,
    start: usize,
    current: usize,
    last_newline: bool,
}

impl Lexer {
    /// Creates a lexer positioned at the start of `source`.
    #[must_use]
    pub fn new(source: Arc<SourceMap>) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            last_newline: false,
        }
    }

    /// Points the lexer at a new file and clears all scan state.
    pub fn reset(&mut self, source: Arc<SourceMap>) -> &mut Self {
        self.source = source;
        self.start = 0;
        self.current = 0;
        self.last_newline = false;
        self
    }

    /// The file currently being scanned.
    #[must_use]
    pub fn source(&self) -> &Arc<SourceMap> {
        &self.source
    }

    /// Scans the rest of the file, EOF token included.
    pub fn tokenize(&mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token(diagnostics);
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Returns the next token.
    pub fn scan_token(&mut self, diagnostics: &mut Diagnostics) -> Token {
        let token = self.next_token(diagnostics);
        self.last_newline = token.kind == TokenKind::Newline;

        if logix_log::get_logger().enabled(Level::Trace) {
            let pos = self.source.line_col(token.span.start);
            trace!("{pos} {token} `{}`", self.source.slice(token.span));
        }
        token
    }

    fn next_token(&mut self, diagnostics: &mut Diagnostics) -> Token {
        loop {
            if self.last_newline {
                while matches!(self.peek(), Some('\n' | ' ' | '\t')) {
                    self.current += 1;
                }
            }

            self.start = self.current;
            let Some(c) = self.bump() else {
                return self.eof();
            };

            let kind = match c {
                '+' => self.pick('+', TokenKind::PlusPlus, TokenKind::Plus),
                '-' => {
                    if self.eat('-') {
                        TokenKind::MinusMinus
                    } else if self.eat('>') {
                        TokenKind::Arrow
                    } else {
                        TokenKind::Minus
                    }
                }
                '*' => self.pick('*', TokenKind::StarStar, TokenKind::Star),
                '/' => self.pick('/', TokenKind::SlashSlash, TokenKind::Slash),
                '%' => self.pick('%', TokenKind::PercentPercent, TokenKind::Percent),
                '&' => self.pick('&', TokenKind::AndAnd, TokenKind::And),
                '|' => self.pick('|', TokenKind::OrOr, TokenKind::Or),
                '^' => TokenKind::Caret,
                '~' => TokenKind::Tilde,
                '!' => {
                    if self.eat('=') {
                        self.pick('=', TokenKind::BangEqEq, TokenKind::BangEq)
                    } else {
                        TokenKind::Bang
                    }
                }
                '=' => {
                    if self.eat('=') {
                        self.pick('=', TokenKind::EqEqEq, TokenKind::EqEq)
                    } else {
                        TokenKind::Assign
                    }
                }
                '<' => {
                    if self.eat('<') {
                        TokenKind::Shl
                    } else {
                        self.pick('=', TokenKind::LessEq, TokenKind::Less)
                    }
                }
                '>' => {
                    if self.eat('>') {
                        TokenKind::Shr
                    } else {
                        self.pick('=', TokenKind::GreaterEq, TokenKind::Greater)
                    }
                }
                '.' => {
                    if self.eat('.') {
                        self.pick('=', TokenKind::DotDotEq, TokenKind::DotDot)
                    } else {
                        TokenKind::Dot
                    }
                }
                ':' => TokenKind::Colon,
                ';' => TokenKind::Semicolon,
                ',' => TokenKind::Comma,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '\n' => TokenKind::Newline,
                ' ' | '\t' => continue,

                '"' => return self.read_string(diagnostics),
                '\u{201C}' => {
                    self.warning(diagnostics, "strings should use the ASCII double quote `\"`")
                        .point(self.start, self.start + 1, "replace with `\"`");
                    return self.read_string(diagnostics);
                }

                '#' => match self.read_comment(diagnostics) {
                    Some(token) => return token,
                    None => continue,
                },

                '@' => return self.read_logic_keyword(),

                c if c.is_ascii_digit() => return self.read_number(diagnostics, c),
                c if is_ident_start(c) => return self.read_identifier(diagnostics),

                c => {
                    self.error(diagnostics, "unknown character")
                        .point(self.start, self.start + 1, format!("U+{:04X}", u32::from(c)));
                    self.skip_while(|c| !RECOVERY_DELIMITERS.contains(&c));
                    let text = self.source.substring(self.start, self.current);
                    return self.token_with(TokenKind::Error, Literal::Text(text));
                }
            };
            return self.token(kind);
        }
    }

    // ===== Cursor =====

    fn peek(&self) -> Option<char> {
        self.source.char_at(self.current)
    }

    fn peek2(&self) -> Option<char> {
        self.source.char_at(self.current + 1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        let len = expected.chars().count();
        let matches = expected
            .chars()
            .enumerate()
            .all(|(i, c)| self.source.char_at(self.current + i) == Some(c));
        if matches {
            self.current += len;
        }
        matches
    }

    fn pick(&mut self, second: char, long: TokenKind, short: TokenKind) -> TokenKind {
        if self.eat(second) { long } else { short }
    }

    fn skip_while(&mut self, keep_going: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !keep_going(c) {
                break;
            }
            self.current += 1;
        }
    }

    // ===== Token construction =====

    fn span(&self) -> Span {
        Span::new(self.source.index(), self.start, self.current)
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.span())
    }

    fn token_with(&self, kind: TokenKind, literal: Literal) -> Token {
        Token::with_literal(kind, self.span(), literal)
    }

    fn eof(&self) -> Token {
        let end = self.source.len();
        Token::new(TokenKind::Eof, Span::new(self.source.index(), end, end + 1))
    }

    fn error<'d>(&self, diagnostics: &'d mut Diagnostics, message: &str) -> &'d mut Issue {
        diagnostics.error(&self.source, IssueKind::Lexer, message)
    }

    fn warning<'d>(&self, diagnostics: &'d mut Diagnostics, message: &str) -> &'d mut Issue {
        diagnostics.warning(&self.source, IssueKind::Lexer, message)
    }

    // ===== Identifiers =====

    fn read_identifier(&mut self, diagnostics: &mut Diagnostics) -> Token {
        self.skip_while(is_ident_continue);
        let text = self.source.substring(self.start, self.current);

        if text.starts_with("__") {
            self.error(diagnostics, "invalid identifier").point(
                self.start,
                self.start + 2,
                "identifiers cannot start with `__`, using `_` instead",
            );
            return self.token_with(TokenKind::Identifier, Literal::Text(text[1..].to_string()));
        }

        if let Some(digits) = text.strip_prefix('_')
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
        {
            self.error(diagnostics, "digit separator `_` is not allowed at the edges of a number")
                .point(self.start, self.start + 1, "leading separator");
            let value = digits.parse::<f64>().unwrap_or_default();
            return self.token_with(TokenKind::Int, Literal::Number(value));
        }

        match keywords::lookup(&text) {
            Some(kind) => self.token(kind),
            None => self.token_with(TokenKind::Identifier, Literal::Text(text)),
        }
    }

    /// `@name` is lexed as the identifier `name`.
    fn read_logic_keyword(&mut self) -> Token {
        self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = self.source.substring(self.start + 1, self.current);
        self.token_with(TokenKind::Identifier, Literal::Text(text))
    }

    // ===== Strings =====

    fn read_string(&mut self, diagnostics: &mut Diagnostics) -> Token {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error(diagnostics, "unterminated string")
                        .info(self.start, self.start + 1, "string starts here")
                        .point(self.current, self.current + 1, "expected `\"`");
                    let text = self.source.substring(self.start + 1, self.current);
                    return self.token_with(TokenKind::String, Literal::Text(text));
                }
                Some('"') => break,
                Some('\u{201D}') => {
                    self.warning(diagnostics, "strings should use the ASCII double quote `\"`")
                        .point(self.current, self.current + 1, "replace with `\"`");
                    break;
                }
                Some(_) => self.current += 1,
            }
        }

        let text = self.source.substring(self.start + 1, self.current);
        self.current += 1;
        self.token_with(TokenKind::String, Literal::Text(text))
    }

    // ===== Numbers =====

    fn read_number(&mut self, diagnostics: &mut Diagnostics, first: char) -> Token {
        if let Some(radix) = self.peek().and_then(Radix::from_prefix) {
            self.current += 1;
            return self.read_radix_number(diagnostics, first, radix);
        }

        let mut text = String::from(first);
        let mut is_int = true;

        if !self.read_digits(diagnostics, &mut text, true) {
            return self.token(TokenKind::Error);
        }

        if self.peek() == Some('.') && self.peek2().is_some_and(|c| c.is_ascii_digit()) {
            self.current += 1;
            is_int = false;
            text.push('.');
            if !self.read_digits(diagnostics, &mut text, false) {
                return self.token(TokenKind::Error);
            }
        }

        if let Some(e @ ('e' | 'E')) = self.peek() {
            let signed = matches!(self.peek2(), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self
                .source
                .char_at(self.current + digit_at)
                .is_some_and(|c| c.is_ascii_digit())
            {
                is_int = false;
                text.push(e);
                self.current += 1;
                if signed {
                    text.extend(self.bump());
                }
                if !self.read_digits(diagnostics, &mut text, false) {
                    return self.token(TokenKind::Error);
                }
            }
        }

        if self.peek().is_some_and(is_ident_continue) {
            self.error(diagnostics, "unexpected character in number")
                .point(self.current, self.current + 1, "not a digit");
            self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return self.token(TokenKind::Error);
        }

        match text.parse::<f64>() {
            Ok(value) => {
                let kind = if is_int { TokenKind::Int } else { TokenKind::Num };
                self.token_with(kind, Literal::Number(value))
            }
            Err(_) => {
                self.error(diagnostics, "malformed number")
                    .point(self.start, self.current, "");
                self.token(TokenKind::Error)
            }
        }
    }

    /// Reads a run of decimal digits with `_` separators into `text`.
    ///
    /// Returns `false` when a letter ended the run; that error has already
    /// been reported and the lexer has skipped past the rest of the word.
    fn read_digits(&mut self, diagnostics: &mut Diagnostics, text: &mut String, after_digit: bool) -> bool {
        if !after_digit && self.peek() == Some('_') {
            self.error(diagnostics, "digit separator `_` is not allowed at the edges of a number")
                .point(self.current, self.current + 1, "leading separator");
        }

        let mut last_separator = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {
                    text.push(c);
                    last_separator = false;
                }
                '_' => {
                    if last_separator {
                        self.error(diagnostics, "digit separator `_` must sit between two digits")
                            .point(self.current, self.current + 1, "repeated separator");
                    }
                    last_separator = true;
                }
                c if c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E') => {
                    self.error(diagnostics, "unexpected character in number")
                        .point(self.current, self.current + 1, "not a digit");
                    self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');
                    return false;
                }
                _ => break,
            }
            self.current += 1;
        }

        if last_separator {
            self.error(diagnostics, "digit separator `_` is not allowed at the edges of a number")
                .point(self.current - 1, self.current, "trailing separator");
        }
        true
    }

    fn read_radix_number(&mut self, diagnostics: &mut Diagnostics, first: char, radix: Radix) -> Token {
        if first != '0' {
            self.error(
                diagnostics,
                &format!("{} literals must start with `{}`", radix.name(), radix.prefix()),
            )
            .point(self.start, self.start + 2, "");
            self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return self.token(TokenKind::Error);
        }

        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if radix.accepts(c) {
                digits.push(c);
            } else if c == '_' {
                // separators are ignored anywhere in radix literals
            } else if c.is_ascii_alphanumeric() {
                self.error(diagnostics, &format!("invalid digit in {} literal", radix.name()))
                    .point(self.current, self.current + 1, format!("`{c}`"));
                self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');
                return self.token(TokenKind::Error);
            } else {
                break;
            }
            self.current += 1;
        }

        match radix {
            Radix::Color => self.finish_color(diagnostics, &digits),
            Radix::Hex | Radix::Bin => {
                let base = if radix == Radix::Hex { 16 } else { 2 };
                if digits.is_empty() {
                    self.error(diagnostics, &format!("missing digits after `{}`", radix.prefix()))
                        .point(self.start, self.current, "");
                    return self.token(TokenKind::Error);
                }
                match u64::from_str_radix(&digits, base) {
                    Ok(value) => self.token_with(TokenKind::Int, Literal::Number(value as f64)),
                    Err(_) => {
                        self.error(diagnostics, "integer literal is too large")
                            .point(self.start, self.current, "does not fit in 64 bits");
                        self.token(TokenKind::Error)
                    }
                }
            }
        }
    }

    fn finish_color(&mut self, diagnostics: &mut Diagnostics, digits: &str) -> Token {
        if digits.len() != 8 && digits.len() != 10 {
            self.error(diagnostics, "color literals must have 8 or 10 hex digits")
                .point(self.start, self.current, format!("length = {}", digits.len()));
            return self.token(TokenKind::Error);
        }

        let byte = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).unwrap_or(0);
        let alpha = if digits.len() == 10 { byte(8) } else { 0xFF };
        let bits = color_bits(byte(2), byte(4), byte(6), alpha);
        self.token_with(TokenKind::Col, Literal::Number(bits))
    }

    // ===== Comments =====

    /// Scans a comment after its `#`. Only doc comments produce a token.
    fn read_comment(&mut self, diagnostics: &mut Diagnostics) -> Option<Token> {
        if self.eat('/') {
            let body = self.current;
            while self.peek().is_some() {
                if self.eat_str("/#") {
                    let text = self.source.substring(body, self.current - 2);
                    return Some(self.token_with(TokenKind::DocComment, Literal::Text(text)));
                }
                self.current += 1;
            }
            self.error(diagnostics, "unterminated doc comment")
                .info(self.start, self.start + 2, "opened here");
            let text = self.source.substring(body, self.current);
            return Some(self.token_with(TokenKind::DocComment, Literal::Text(text)));
        }

        if self.eat('|') {
            return Some(self.read_line_doc_comment());
        }

        if self.eat('*') {
            while self.peek().is_some() {
                if self.eat_str("*#") {
                    return None;
                }
                self.current += 1;
            }
            self.error(diagnostics, "unterminated block comment")
                .info(self.start, self.start + 2, "opened here");
            return None;
        }

        self.skip_while(|c| c != '\n');
        None
    }

    /// `#| ...` doc comments continue on every following line whose first
    /// non-blank character is `|`.
    fn read_line_doc_comment(&mut self) -> Token {
        let mut text = String::new();
        let mut end = self.current;
        loop {
            match self.bump() {
                None => {
                    end = self.current;
                    break;
                }
                Some('\n') => {
                    let line_break = self.current - 1;
                    self.skip_while(|c| c == ' ' || c == '\t');
                    if self.eat('|') {
                        text.push('\n');
                    } else {
                        self.current = line_break;
                        break;
                    }
                }
                Some(c) => {
                    text.push(c);
                    end = self.current;
                }
            }
        }
        Token::with_literal(
            TokenKind::DocComment,
            Span::new(self.source.index(), self.start, end.max(self.start + 2)),
            Literal::Text(text),
        )
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new(Arc::new(SourceMap::new(0, "")))
    }
}

fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || is_cjk(c)
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// Packs a color into the bit pattern of an `f64`.
///
/// Each channel goes through the same single-precision normalization used by
/// the runtime (`(c / 255f) * 255` truncated), then the RGBA8888 word is
/// stored in the low 32 bits of the float.
#[must_use]
pub fn color_bits(r: u8, g: u8, b: u8, a: u8) -> f64 {
    let channel = |c: u8| ((f32::from(c) / 255.0) * 255.0) as u32 & 0xFF;
    let rgba = (channel(r) << 24) | (channel(g) << 16) | (channel(b) << 8) | channel(a);
    f64::from_bits(u64::from(rgba))
}
