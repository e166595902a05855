//! Recursive descent parser for Logix.
//!
//! The parser pulls tokens from a [`Lexer`] on demand through a single-token
//! lookahead buffer and builds one [`Stmt::Program`] per file. Line breaks
//! are insignificant everywhere except where a statement or an operator loop
//! asks whether the current statement has ended.
//!
//! # Precedence
//!
//! From loosest to tightest:
//!
//! | Level          | Operators                         |
//! |----------------|-----------------------------------|
//! | logical or     | `\|\|`                            |
//! | logical and    | `&&`                              |
//! | equality       | `==` `!=`                         |
//! | comparison     | `<` `<=` `>` `>=`                 |
//! | range          | `..` `..=` (prefix, open, closed) |
//! | additive       | `+` `-`                           |
//! | multiplicative | `*` `/`                           |
//! | unary          | `!` `-`                           |
//! | postfix        | `[i]` `(args)` `.field`           |
//!
//! Mixing `&&` and `||` without parentheses is rejected rather than resolved
//! by precedence.
//!
//! # Recovery
//!
//! A grammar violation is recorded in the [`Diagnostics`] sink and unwinds
//! as a [`ParseError`] to the enclosing statement list, which skips to the
//! end of the statement (or the next `if`, `for`, `while`, `fn` or `{`) and
//! carries on. When a closer, a body or an operand is missing at the end of
//! a line, the error points at that line break and the next line is parsed
//! as a fresh statement. On the way up, productions attach notes to the same issue.
//! Argument, parameter and array lists substitute an error placeholder for a
//! bad element and keep going.

use std::sync::Arc;

use logix_log::debug;

use crate::ast::{BinaryOp, Expr, Ident, LiteralValue, Stmt, UnaryOp};
use crate::diagnostic::{Diagnostics, Issue, IssueKind};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Lexer;
use crate::source_map::SourceMap;
use crate::span::{Span, Spanned};
use crate::token::{Token, TokenKind};

/// Tokens a statement-level recovery stops in front of.
const SYNC_TOKENS: &[TokenKind] = &[
    TokenKind::If,
    TokenKind::For,
    TokenKind::While,
    TokenKind::Fn,
    TokenKind::LBrace,
];

/// Tokens an expression-level recovery never skips.
const EXPR_STOP: &[TokenKind] = &[
    TokenKind::Newline,
    TokenKind::Semicolon,
    TokenKind::Eof,
    TokenKind::LBrace,
    TokenKind::RBrace,
    TokenKind::RParen,
    TokenKind::RBracket,
    TokenKind::Comma,
    TokenKind::If,
    TokenKind::For,
    TokenKind::While,
    TokenKind::Fn,
];

/// Contextual word separating the loop variable from the iterable.
const FOR_IN: &str = "in";

/// What follows the leading expression of a statement.
enum Tail {
    /// Nothing; a plain expression statement.
    None,
    /// `= value` or `OP= value`.
    Assign(Option<BinaryOp>, Expr),
    /// An operator the expression grammar does not chain, e.g. `x ** 2`.
    Operand(BinaryOp, Expr),
}

/// Parser for one Logix file.
///
/// Single use: create it for a file, call [`Parser::parse`], drop it. The
/// lexer is borrowed so it can be reset and reused for the next file.
pub struct Parser<'a> {
    /// Token source, already reset to the file being parsed
    lexer: &'a mut Lexer,
    /// The file being parsed
    source: Arc<SourceMap>,
    /// Session sink for errors and warnings
    diagnostics: &'a mut Diagnostics,
    /// One-token lookahead buffer; may hold a NEWLINE
    look_ahead: Option<Token>,
    /// Operator consumed by an expression loop that turned out to start a
    /// compound assignment (`x += 1`). Set, every operator loop stops.
    pending_compound: Option<(BinaryOp, Token)>,
    /// First line break skipped since the last token was taken. Cleared when
    /// a statement starts, so it only ever marks a break inside a statement.
    line_break: Option<Span>,
    /// Inner span of the last parenthesized group closed
    last_group: Option<Span>,
}

impl<'a> Parser<'a> {
    /// Creates a parser reading from `lexer`'s current file.
    pub fn new(lexer: &'a mut Lexer, diagnostics: &'a mut Diagnostics) -> Self {
        let source = Arc::clone(lexer.source());
        Self {
            lexer,
            source,
            diagnostics,
            look_ahead: None,
            pending_compound: None,
            line_break: None,
            last_group: None,
        }
    }

    /// Parses the whole file.
    ///
    /// Always returns a [`Stmt::Program`]; problems are recorded in the
    /// diagnostics sink and the offending statements are left out.
    pub fn parse(mut self) -> Stmt {
        self.parse_program()
    }

    /// Parses one expression.
    ///
    /// Compound assignment operators are rejected here since they only form
    /// statements.
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_or()?;
        if let Some((op, operator)) = self.pending_compound.take() {
            return Err(self.report(
                &operator,
                "compound assignment is not allowed here",
                format!("`{op}=` can only start a statement"),
            ));
        }
        Ok(expr)
    }

    // ===== Statements =====

    fn parse_program(&mut self) -> Stmt {
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            if self.check(TokenKind::RBrace) {
                let brace = self.bump();
                self.report(&brace, "unmatched `}`", "no block to close");
                continue;
            }
            if let Some(stmt) = self.parse_statement_or_recover() {
                stmts.push(stmt);
            }
        }
        debug!(
            "{}: parsed {} top-level statements",
            self.source.label(),
            stmts.len()
        );
        Stmt::Program {
            stmts,
            span: Span::new(self.source.index(), 0, self.source.len()),
        }
    }

    fn parse_statement_or_recover(&mut self) -> Option<Stmt> {
        match self.parse_statement() {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                self.synchronize(error);
                None
            }
        }
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let kind = self.peek_kind();
        self.line_break = None;
        match kind {
            TokenKind::If => {
                let keyword = self.bump();
                self.parse_if(keyword)
            }
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Fn => self.parse_fn(),
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Break | TokenKind::Continue => self.parse_jump(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Set => self.parse_set(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parses `{ stmt* }`. Errors inside are recovered locally.
    fn parse_block(&mut self) -> ParseResult<Stmt> {
        let lbrace = self.consume(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            if let Some(rbrace) = self.eat(TokenKind::RBrace) {
                return Ok(Stmt::Block {
                    stmts,
                    span: lbrace.span.to(rbrace.span),
                });
            }
            if self.is_at_end() {
                let eof = self.peek().clone();
                let error = self.report(&eof, "unterminated block", "expected `}`");
                self.annotate(error, &lbrace, "block starts here");
                let end = stmts.last().map_or(lbrace.span, Spanned::span);
                return Ok(Stmt::Block {
                    stmts,
                    span: lbrace.span.to(end),
                });
            }
            if let Some(stmt) = self.parse_statement_or_recover() {
                stmts.push(stmt);
            }
        }
    }

    /// Parses the block after `keyword`, which must start right here.
    fn parse_body(&mut self, keyword: &Token) -> ParseResult<Stmt> {
        if self.check(TokenKind::LBrace) {
            return self.parse_block();
        }
        let found = self.peek_span();
        let at = self.line_break.unwrap_or(found);
        let error = self.report(&at, "missing body", "expected `{`");
        Err(self.annotate(error, keyword, format!("while parsing `{}`", keyword.kind)))
    }

    /// Parses the rest of `if` or `elif`; `elif` chains nest.
    fn parse_if(&mut self, keyword: Token) -> ParseResult<Stmt> {
        let condition = self.parse_expression().map_err(|e| {
            self.annotate(e, &keyword, format!("while parsing `{}` condition", keyword.kind))
        })?;
        let then_branch = self.parse_body(&keyword)?;

        let else_branch = if self.check(TokenKind::Elif) {
            let elif = self.bump();
            Some(Box::new(self.parse_if(elif)?))
        } else if let Some(else_kw) = self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_body(&else_kw)?))
        } else {
            None
        };

        let end = else_branch
            .as_ref()
            .map_or(then_branch.span(), |branch| branch.span());
        Ok(Stmt::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch,
            span: keyword.span.to(end),
        })
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let keyword = self.bump();

        let (var, iterable) = if self.check(TokenKind::LBrace) {
            (None, None)
        } else {
            let head = self
                .parse_expression()
                .map_err(|e| self.annotate(e, &keyword, "while parsing `for` header"))?;
            match head {
                Expr::Identifier(var) if self.check_word(FOR_IN) => {
                    let in_kw = self.bump();
                    let iterable = self
                        .parse_expression()
                        .map_err(|e| self.annotate(e, &in_kw, "while parsing the iterable"))?;
                    (Some(var), Some(iterable))
                }
                Expr::Identifier(var) if self.check(TokenKind::LBrace) => (Some(var), None),
                head => (None, Some(head)),
            }
        };

        let body = self.parse_body(&keyword)?;
        let span = keyword.span.to(body.span());
        Ok(Stmt::For {
            var,
            iterable,
            body: Box::new(body),
            span,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let keyword = self.bump();
        let condition = self
            .parse_expression()
            .map_err(|e| self.annotate(e, &keyword, "while parsing `while` condition"))?;
        let body = self.parse_body(&keyword)?;
        let span = keyword.span.to(body.span());
        Ok(Stmt::While {
            condition,
            body: Box::new(body),
            span,
        })
    }

    /// Parses `fn name(params) [-> results] { body }`.
    fn parse_fn(&mut self) -> ParseResult<Stmt> {
        let keyword = self.bump();
        let name = self
            .consume(TokenKind::Identifier)
            .map_err(|e| self.annotate(e, &keyword, "while parsing function name"))?;
        let lparen = self
            .consume(TokenKind::LParen)
            .map_err(|e| self.annotate(e, &keyword, "while parsing function declaration"))?;
        let (params, _) = self.parse_list(&lparen, TokenKind::RParen, "parameter list")?;

        let mut results = Vec::new();
        if let Some(arrow) = self.eat(TokenKind::Arrow) {
            while !self.check(TokenKind::LBrace) {
                if self.is_at_end() {
                    let eof = self.peek().clone();
                    let (message, note) = if results.is_empty() {
                        ("missing results", "expected a result")
                    } else {
                        ("missing body", "expected `{`")
                    };
                    let error = self.report(&eof, message, note);
                    return Err(self.annotate(error, &keyword, "function starts here"));
                }
                match self.parse_expression() {
                    Ok(result) => results.push(result),
                    Err(error) => {
                        let error = self.annotate(error, &arrow, "while parsing results");
                        if !self.check(TokenKind::LBrace) && !self.check(TokenKind::Comma) {
                            return Err(error);
                        }
                    }
                }
                self.eat(TokenKind::Comma);
            }
            if results.is_empty() {
                let brace = self.peek().clone();
                let error = self.report(&brace, "missing results", "expected a result");
                self.annotate(error, &arrow, "results start here");
            }
        }

        let body = self.parse_body(&keyword)?;
        let span = keyword.span.to(body.span());
        Ok(Stmt::Fn {
            name: Ident::from_token(&name),
            params,
            results,
            body: Box::new(body),
            span,
        })
    }

    /// Parses `break` or `continue`.
    fn parse_jump(&mut self) -> ParseResult<Stmt> {
        let keyword = self.bump();
        let end = self.consume_stmt_end().map_err(|e| {
            self.annotate(e, &keyword, format!("while parsing `{}`", keyword.kind))
        })?;
        let span = with_end(keyword.span, end);
        Ok(if keyword.kind == TokenKind::Break {
            Stmt::Break { span }
        } else {
            Stmt::Continue { span }
        })
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let keyword = self.bump();
        let value = if self.is_stmt_end() || self.raw_kind() == TokenKind::RBrace {
            None
        } else {
            Some(
                self.parse_expression()
                    .map_err(|e| self.annotate(e, &keyword, "while parsing `return` value"))?,
            )
        };
        let end = self
            .consume_stmt_end()
            .map_err(|e| self.annotate(e, &keyword, "while parsing `return`"))?;
        let last = value.as_ref().map_or(keyword.span, Spanned::span);
        Ok(Stmt::Return {
            value,
            span: with_end(keyword.span.to(last), end),
        })
    }

    /// Parses `set target [= value | OP= value]`.
    fn parse_set(&mut self) -> ParseResult<Stmt> {
        let keyword = self.bump();
        let target = self
            .parse_or()
            .map_err(|e| self.annotate(e, &keyword, "while parsing `set` target"))?;
        let tail = self
            .parse_tail()
            .map_err(|e| self.annotate(e, &keyword, "while parsing `set` value"))?;
        let (op, value) = match tail {
            Tail::None => (None, None),
            Tail::Assign(op, value) => (op, Some(value)),
            Tail::Operand(op, right) => {
                let span = target.span().to(right.span());
                let error = self.report(
                    &span,
                    format!("expected `=` or `{op}=` after `set` target"),
                    "",
                );
                return Err(self.annotate(error, &keyword, "while parsing `set`"));
            }
        };
        let end = self
            .consume_stmt_end()
            .map_err(|e| self.annotate(e, &keyword, "while parsing `set`"))?;
        let last = value.as_ref().map_or(target.span(), Spanned::span);
        Ok(Stmt::SetVar {
            target,
            op,
            value,
            span: with_end(keyword.span.to(last), end),
        })
    }

    /// Parses an assignment or an expression statement.
    fn parse_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_or()?;
        let stmt = match self.parse_tail()? {
            Tail::Assign(op, value) => {
                let end = self.consume_stmt_end()?;
                let span = with_end(expr.span().to(value.span()), end);
                Stmt::Assign {
                    target: expr,
                    op,
                    value,
                    span,
                }
            }
            Tail::Operand(op, right) => {
                let binary = binary(expr, op, right);
                let end = self.consume_stmt_end()?;
                Stmt::Expr {
                    span: with_end(binary.span(), end),
                    expr: binary,
                }
            }
            Tail::None => {
                let end = self.consume_stmt_end()?;
                Stmt::Expr {
                    span: with_end(expr.span(), end),
                    expr,
                }
            }
        };
        Ok(stmt)
    }

    fn parse_tail(&mut self) -> ParseResult<Tail> {
        if let Some((op, operator)) = self.pending_compound.take() {
            self.next();
            let value = self
                .parse_expression()
                .map_err(|e| self.annotate(e, &operator, "while parsing compound assignment"))?;
            return Ok(Tail::Assign(Some(op), value));
        }
        if self.is_stmt_end() {
            return Ok(Tail::None);
        }

        let kind = self.raw_kind();
        if kind == TokenKind::Assign {
            let assign = self.next();
            let value = self
                .parse_expression()
                .map_err(|e| self.annotate(e, &assign, "while parsing assignment"))?;
            return Ok(Tail::Assign(None, value));
        }

        let Some(op) = BinaryOp::from_token(kind).filter(|_| kind.is_binary_operator()) else {
            return Ok(Tail::None);
        };
        let operator = self.next();
        if self.raw_kind() == TokenKind::Assign {
            self.next();
            let value = self
                .parse_expression()
                .map_err(|e| self.annotate(e, &operator, "while parsing compound assignment"))?;
            Ok(Tail::Assign(Some(op), value))
        } else {
            let right = self
                .parse_expression()
                .map_err(|e| self.annotate(e, &operator, "while parsing binary expression"))?;
            Ok(Tail::Operand(op, right))
        }
    }

    // ===== Expressions =====

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_and()?;
        while self.at_operator(&[TokenKind::OrOr]).is_some() {
            let Some(op) = self.operator(true) else {
                break;
            };
            let right = self.parse_or()?;
            if is_binary(&right, BinaryOp::And) && !self.is_group(&right) {
                return Err(self.ambiguous(&expr, &right));
            }
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_equality()?;
        while self.at_operator(&[TokenKind::AndAnd]).is_some() {
            let Some(op) = self.operator(true) else {
                break;
            };
            let right = self.parse_or()?;
            if is_binary(&right, BinaryOp::Or) && !self.is_group(&right) {
                return Err(self.ambiguous(&expr, &right));
            }
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }

    /// Whether `expr` is exactly the contents of the last `( )` closed.
    fn is_group(&self, expr: &Expr) -> bool {
        self.last_group == Some(expr.span())
    }

    fn ambiguous(&mut self, left: &Expr, right: &Expr) -> ParseError {
        let span = left.span().to(right.span());
        self.report(&span, "ambiguous logical expression, add parentheses", "")
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_comparison()?;
        while self
            .at_operator(&[TokenKind::EqEq, TokenKind::BangEq])
            .is_some()
        {
            let Some(op) = self.operator(false) else {
                break;
            };
            let right = self.parse_comparison()?;
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_range()?;
        while self
            .at_operator(&[
                TokenKind::Greater,
                TokenKind::GreaterEq,
                TokenKind::Less,
                TokenKind::LessEq,
            ])
            .is_some()
        {
            let Some(op) = self.operator(false) else {
                break;
            };
            let right = self.parse_range()?;
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }

    /// Parses `a..b`, `a..=b`, `a..`, `..b`, or falls through to additive.
    fn parse_range(&mut self) -> ParseResult<Expr> {
        if matches!(self.peek_kind(), TokenKind::DotDot | TokenKind::DotDotEq) {
            let operator = self.next();
            let end = self.parse_range_end(&operator)?;
            let span = end.as_ref().map_or(operator.span, |end| operator.span.to(end.span()));
            return Ok(Expr::Range {
                start: None,
                end: end.map(Box::new),
                inclusive: operator.kind == TokenKind::DotDotEq,
                span,
            });
        }

        let start = self.parse_additive()?;
        if self
            .at_operator(&[TokenKind::DotDot, TokenKind::DotDotEq])
            .is_none()
        {
            return Ok(start);
        }
        let operator = self.next();
        let end = self.parse_range_end(&operator)?;
        let last = end.as_ref().map_or(operator.span, Spanned::span);
        Ok(Expr::Range {
            span: start.span().to(last),
            start: Some(Box::new(start)),
            end: end.map(Box::new),
            inclusive: operator.kind == TokenKind::DotDotEq,
        })
    }

    fn parse_range_end(&mut self, operator: &Token) -> ParseResult<Option<Expr>> {
        if !self.starts_operand() {
            return Ok(None);
        }
        self.parse_additive()
            .map(Some)
            .map_err(|e| self.annotate(e, operator, "while parsing range"))
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_multiplicative()?;
        while self
            .at_operator(&[TokenKind::Plus, TokenKind::Minus])
            .is_some()
        {
            let Some(op) = self.operator(true) else {
                break;
            };
            let right = self.parse_multiplicative()?;
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_unary()?;
        while self
            .at_operator(&[TokenKind::Star, TokenKind::Slash])
            .is_some()
        {
            let Some(op) = self.operator(true) else {
                break;
            };
            let right = self.parse_unary()?;
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let Some(op) = UnaryOp::from_token(self.peek_kind()) else {
            return self.parse_postfix();
        };
        let operator = self.next();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            span: operator.span.to(operand.span()),
            operand: Box::new(operand),
        })
    }

    /// Parses indexing, calls and field access after a primary expression.
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.is_stmt_end() {
                return Ok(expr);
            }
            expr = match self.raw_kind() {
                TokenKind::LBracket => {
                    let lbracket = self.next();
                    let index = self
                        .parse_expression()
                        .map_err(|e| self.annotate(e, &lbracket, "while parsing index"))?;
                    let rbracket = self
                        .consume(TokenKind::RBracket)
                        .map_err(|e| self.annotate(e, &lbracket, "index starts here"))?;
                    Expr::Index {
                        span: expr.span().to(rbracket.span),
                        target: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                TokenKind::LParen => {
                    let lparen = self.next();
                    let (args, rparen) =
                        self.parse_list(&lparen, TokenKind::RParen, "argument list")?;
                    Expr::Call {
                        span: expr.span().to(rparen.span),
                        callee: Box::new(expr),
                        args,
                    }
                }
                TokenKind::Dot => {
                    let dot = self.next();
                    let name = self.peek().clone();
                    let field = match name.kind {
                        TokenKind::Identifier => Expr::Identifier(Ident::from_token(&name)),
                        TokenKind::Error => Expr::error(name.span),
                        _ => {
                            let error = self.report(
                                &name,
                                "expected field name",
                                format!("found {}", describe(name.kind)),
                            );
                            return Err(self.annotate(error, &dot, "after this `.`"));
                        }
                    };
                    self.next();
                    Expr::Get {
                        span: expr.span().to(field.span()),
                        object: Box::new(expr),
                        field: Box::new(field),
                    }
                }
                _ => return Ok(expr),
            };
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();
        match token.kind {
            kind if kind.is_literal() || kind == TokenKind::Error => {
                self.next();
                Ok(Expr::Literal {
                    value: LiteralValue::from_token(&token),
                    span: token.span,
                })
            }
            TokenKind::Identifier => {
                self.next();
                Ok(Expr::Identifier(Ident::from_token(&token)))
            }
            TokenKind::LParen => {
                self.next();
                let inner = self.parse_expression().map_err(|e| {
                    self.annotate(e, &token, "while parsing parenthesized expression")
                })?;
                self.consume(TokenKind::RParen)
                    .map_err(|e| self.annotate(e, &token, "unclosed `(`"))?;
                self.last_group = Some(inner.span());
                Ok(inner)
            }
            TokenKind::LBrace => {
                self.next();
                let (elements, rbrace) = self.parse_list(&token, TokenKind::RBrace, "array")?;
                Ok(Expr::Array {
                    elements,
                    span: token.span.to(rbrace.span),
                })
            }
            _ => {
                let error = self.report_found(&token, "expected expression");
                if self.line_break.is_none() {
                    while !EXPR_STOP.contains(&self.raw_kind()) {
                        self.next();
                    }
                }
                Err(error)
            }
        }
    }

    /// Parses list elements up to `closer`, commas optional.
    ///
    /// A malformed element becomes an error placeholder when the list can
    /// continue after it.
    fn parse_list(
        &mut self,
        open: &Token,
        closer: TokenKind,
        what: &str,
    ) -> ParseResult<(Vec<Expr>, Token)> {
        let mut items = Vec::new();
        loop {
            if let Some(close) = self.eat(closer) {
                return Ok((items, close));
            }
            if self.is_at_end() {
                let eof = self.peek().clone();
                let error = self.report(
                    &eof,
                    format!("unterminated {what}"),
                    format!("expected `{closer}`"),
                );
                return Err(self.annotate(error, open, format!("{what} starts here")));
            }

            let start = self.peek_span();
            match self.parse_expression() {
                Ok(item) => items.push(item),
                Err(error) => {
                    let error = self.annotate(error, open, format!("while parsing {what}"));
                    if !self.check(TokenKind::Comma) && !self.check(closer) {
                        return Err(error);
                    }
                    items.push(Expr::error(start));
                }
            }
            self.eat(TokenKind::Comma);
        }
    }

    // ===== Token access =====

    fn scan(&mut self) -> Token {
        loop {
            let token = self.lexer.scan_token(self.diagnostics);
            if token.kind != TokenKind::DocComment {
                return token;
            }
        }
    }

    /// The next token, NEWLINE included.
    fn peek_raw(&mut self) -> &Token {
        let token = match self.look_ahead.take() {
            Some(token) => token,
            None => self.scan(),
        };
        self.look_ahead.insert(token)
    }

    fn raw_kind(&mut self) -> TokenKind {
        self.peek_raw().kind
    }

    fn skip_newlines(&mut self) {
        while self.raw_kind() == TokenKind::Newline {
            if let Some(newline) = self.look_ahead.take() {
                self.line_break.get_or_insert(newline.span);
            }
        }
    }

    /// The next significant token.
    fn peek(&mut self) -> &Token {
        self.skip_newlines();
        self.peek_raw()
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    fn peek_span(&mut self) -> Span {
        self.peek().span
    }

    /// Takes the next token as is.
    fn next(&mut self) -> Token {
        self.line_break = None;
        match self.look_ahead.take() {
            Some(token) => token,
            None => self.scan(),
        }
    }

    /// Takes the next significant token.
    fn bump(&mut self) -> Token {
        self.skip_newlines();
        self.next()
    }

    fn check(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn check_word(&mut self, word: &str) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Identifier && token.text() == Some(word)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        self.check(kind).then(|| self.bump())
    }

    /// Takes a token of `kind`. ERROR tokens are accepted silently; the
    /// lexer has already reported them.
    fn consume(&mut self, kind: TokenKind) -> ParseResult<Token> {
        let found = self.peek().clone();
        if found.kind == kind || found.kind == TokenKind::Error {
            return Ok(self.bump());
        }
        Err(self.report_found(&found, format!("expected {}", describe(kind))))
    }

    fn is_at_end(&mut self) -> bool {
        self.check(TokenKind::Eof)
    }

    fn is_stmt_end(&mut self) -> bool {
        matches!(
            self.raw_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        )
    }

    /// Ends a simple statement. Returns the span of a consumed `;`.
    ///
    /// An unconsumed `{` or `}` also ends a statement.
    fn consume_stmt_end(&mut self) -> ParseResult<Option<Span>> {
        match self.raw_kind() {
            TokenKind::Semicolon => Ok(Some(self.next().span)),
            TokenKind::Newline => {
                self.next();
                Ok(None)
            }
            TokenKind::Eof | TokenKind::LBrace | TokenKind::RBrace => Ok(None),
            _ => {
                let found = self.peek_raw().clone();
                Err(self.report(&found, "missing newline or semicolon as statement end", ""))
            }
        }
    }

    /// Returns the kind of the next token if it is one of `kinds` on the
    /// current line and no compound assignment is pending.
    fn at_operator(&mut self, kinds: &[TokenKind]) -> Option<TokenKind> {
        if self.pending_compound.is_some() || self.is_stmt_end() {
            return None;
        }
        let kind = self.raw_kind();
        kinds.contains(&kind).then_some(kind)
    }

    /// Takes a binary operator. With `compound`, an operator directly
    /// followed by `=` is parked in `pending_compound` and `None` returned.
    fn operator(&mut self, compound: bool) -> Option<BinaryOp> {
        let token = self.next();
        let op = BinaryOp::from_token(token.kind)?;
        if compound && self.raw_kind() == TokenKind::Assign {
            self.pending_compound = Some((op, token));
            return None;
        }
        Some(op)
    }

    fn starts_operand(&mut self) -> bool {
        if self.is_stmt_end() {
            return false;
        }
        let kind = self.raw_kind();
        kind.is_literal()
            || matches!(
                kind,
                TokenKind::Identifier
                    | TokenKind::LParen
                    | TokenKind::Minus
                    | TokenKind::Bang
                    | TokenKind::Error
            )
    }

    // ===== Diagnostics =====

    fn report(
        &mut self,
        at: &impl Spanned,
        message: impl Into<String>,
        note: impl Into<String>,
    ) -> ParseError {
        let mut issue = Issue::error(Arc::clone(&self.source), IssueKind::Parser, message);
        issue.point_at(at, note);
        ParseError::new(self.diagnostics.report(issue))
    }

    /// Reports that `found` is not what the grammar wants here. If the line
    /// ended first, the line break is blamed instead.
    fn report_found(&mut self, found: &Token, message: impl Into<String>) -> ParseError {
        let line_break = self.line_break;
        match line_break {
            Some(newline) => self.report(&newline, message, "found line break"),
            None => self.report(found, message, format!("found {}", describe(found.kind))),
        }
    }

    fn annotate(
        &mut self,
        error: ParseError,
        at: &impl Spanned,
        note: impl Into<String>,
    ) -> ParseError {
        self.diagnostics.issue_mut(error.issue()).info_at(at, note);
        error
    }

    /// Skips to the end of the failed statement, or to a token that starts
    /// a statement or closes the block.
    ///
    /// A statement that failed after a line break has already ended; the
    /// next line is left alone.
    fn synchronize(&mut self, error: ParseError) {
        self.pending_compound = None;
        while self.line_break.is_none() {
            match self.raw_kind() {
                TokenKind::Newline | TokenKind::Semicolon => {
                    self.next();
                    break;
                }
                TokenKind::Eof | TokenKind::RBrace => break,
                kind if SYNC_TOKENS.contains(&kind) => break,
                _ => {
                    self.next();
                }
            }
        }
        let at = self.peek_raw().span.start;
        debug!(
            "{}: recovered from {error} at {}",
            self.source.label(),
            self.source.line_col(at)
        );
    }
}

fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    Expr::Binary {
        span: left.span().to(right.span()),
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

fn is_binary(expr: &Expr, expected: BinaryOp) -> bool {
    matches!(expr, Expr::Binary { op, .. } if *op == expected)
}

fn with_end(span: Span, end: Option<Span>) -> Span {
    end.map_or(span, |end| span.to(end))
}

/// Human-readable name of a token kind for messages.
fn describe(kind: TokenKind) -> String {
    match kind {
        TokenKind::Eof => "end of input".to_owned(),
        TokenKind::Newline => "line break".to_owned(),
        TokenKind::Identifier => "identifier".to_owned(),
        TokenKind::Num | TokenKind::Int | TokenKind::Col | TokenKind::String => {
            format!("{} literal", kind.name().to_lowercase())
        }
        kind => format!("`{kind}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(text: &str) -> (Stmt, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new(Arc::new(SourceMap::new(0, text)));
        let program = Parser::new(&mut lexer, &mut diagnostics).parse();
        (program, diagnostics)
    }

    fn parse_ok(text: &str) -> Vec<Stmt> {
        let (program, diagnostics) = parse_str(text);
        assert!(
            !diagnostics.has_errors(),
            "unexpected errors:\n{}",
            diagnostics.render_all(false)
        );
        match program {
            Stmt::Program { stmts, .. } => stmts,
            other => panic!("Expected Program, got {:?}", other),
        }
    }

    fn parse_expr(text: &str) -> Expr {
        let mut stmts = parse_ok(text);
        assert_eq!(stmts.len(), 1);
        match stmts.remove(0) {
            Stmt::Expr { expr, .. } => expr,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    fn ident(expr: &Expr) -> &str {
        expr.as_identifier()
            .unwrap_or_else(|| panic!("Expected identifier, got {:?}", expr))
    }

    fn error_messages(diagnostics: &Diagnostics) -> Vec<&str> {
        diagnostics.errors().iter().map(Issue::message).collect()
    }

    #[test]
    fn test_operator_precedence() {
        let expr = parse_expr("a + b * c");
        match expr {
            Expr::Binary {
                left,
                op: BinaryOp::Add,
                right,
                span,
            } => {
                assert_eq!(ident(&left), "a");
                assert_eq!(span, Span::new(0, 0, 9));
                match *right {
                    Expr::Binary {
                        left,
                        op: BinaryOp::Mul,
                        right,
                        ..
                    } => {
                        assert_eq!(ident(&left), "b");
                        assert_eq!(ident(&right), "c");
                    }
                    other => panic!("Expected b * c, got {:?}", other),
                }
            }
            other => panic!("Expected Binary, got {:?}", other),
        }
    }

    #[test]
    fn test_left_associative_additive() {
        let expr = parse_expr("a - b - c");
        match expr {
            Expr::Binary {
                left,
                op: BinaryOp::Sub,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Binary { op: BinaryOp::Sub, .. }));
                assert_eq!(ident(&right), "c");
            }
            other => panic!("Expected Binary, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_and_comparison() {
        let expr = parse_expr("!a == -b < c");
        match expr {
            Expr::Binary {
                left,
                op: BinaryOp::Eq,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Unary { op: UnaryOp::Not, .. }));
                assert!(matches!(*right, Expr::Binary { op: BinaryOp::Lt, .. }));
            }
            other => panic!("Expected Binary, got {:?}", other),
        }
    }

    #[test]
    fn test_ambiguous_logical_expression() {
        let (_, diagnostics) = parse_str("a && b || c");
        assert_eq!(
            error_messages(&diagnostics),
            ["ambiguous logical expression, add parentheses"]
        );

        let (_, diagnostics) = parse_str("a || b && c");
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn test_parenthesized_operand_does_not_hide_ambiguity() {
        for text in ["a && (b) || c", "a || (b) && c", "a && (b || c) || d"] {
            let (_, diagnostics) = parse_str(text);
            assert_eq!(
                error_messages(&diagnostics),
                ["ambiguous logical expression, add parentheses"],
                "{text}"
            );
        }
        parse_expr("a || (b && c)");
        parse_expr("(a) && (b)");
        parse_expr("a && (b || c) && d");
    }

    #[test]
    fn test_parenthesized_logical_expression() {
        let expr = parse_expr("(a && b) || c");
        match expr {
            Expr::Binary {
                left,
                op: BinaryOp::Or,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Binary { op: BinaryOp::And, .. }));
                assert_eq!(ident(&right), "c");
            }
            other => panic!("Expected Binary, got {:?}", other),
        }
        parse_expr("a && (b || c)");
        parse_expr("a && b && c");
    }

    #[test]
    fn test_range_forms() {
        let cases = [
            ("1..5", true, true, false),
            ("..5", false, true, false),
            ("1..", true, false, false),
            ("1..=5", true, true, true),
        ];
        for (text, has_start, has_end, is_inclusive) in cases {
            match parse_expr(text) {
                Expr::Range {
                    start,
                    end,
                    inclusive,
                    ..
                } => {
                    assert_eq!(start.is_some(), has_start, "{text}");
                    assert_eq!(end.is_some(), has_end, "{text}");
                    assert_eq!(inclusive, is_inclusive, "{text}");
                }
                other => panic!("Expected Range for {text}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_range_binds_looser_than_additive() {
        match parse_expr("a + 1..b * 2") {
            Expr::Range {
                start: Some(start),
                end: Some(end),
                ..
            } => {
                assert!(matches!(*start, Expr::Binary { op: BinaryOp::Add, .. }));
                assert!(matches!(*end, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("Expected Range, got {:?}", other),
        }
    }

    #[test]
    fn test_postfix_chain() {
        match parse_expr("a.b[1](2, 3)") {
            Expr::Call { callee, args, span } => {
                assert_eq!(args.len(), 2);
                assert_eq!(span, Span::new(0, 0, 12));
                match *callee {
                    Expr::Index { target, .. } => {
                        assert!(matches!(*target, Expr::Get { .. }));
                    }
                    other => panic!("Expected Index, got {:?}", other),
                }
            }
            other => panic!("Expected Call, got {:?}", other),
        }
    }

    #[test]
    fn test_array_with_optional_commas() {
        let stmts = parse_ok("x = {1 2, 3}");
        match &stmts[0] {
            Stmt::Assign {
                value: Expr::Array { elements, span },
                ..
            } => {
                assert_eq!(elements.len(), 3);
                assert_eq!(*span, Span::new(0, 4, 12));
            }
            other => panic!("Expected array assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment() {
        let stmts = parse_ok("x = 1\ny += 2\nz **= 3\nw ** 4");
        assert_eq!(stmts.len(), 4);
        assert!(matches!(&stmts[0], Stmt::Assign { op: None, .. }));
        assert!(matches!(
            &stmts[1],
            Stmt::Assign {
                op: Some(BinaryOp::Add),
                ..
            }
        ));
        assert!(matches!(
            &stmts[2],
            Stmt::Assign {
                op: Some(BinaryOp::Pow),
                ..
            }
        ));
        match &stmts[3] {
            Stmt::Expr {
                expr: Expr::Binary {
                    op: BinaryOp::Pow, ..
                },
                ..
            } => {}
            other => panic!("Expected Pow expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_compound_assignment_after_product() {
        let stmts = parse_ok("a * b -= c");
        match &stmts[0] {
            Stmt::Assign {
                target,
                op: Some(BinaryOp::Sub),
                value,
                ..
            } => {
                assert!(matches!(target, Expr::Binary { op: BinaryOp::Mul, .. }));
                assert_eq!(ident(value), "c");
            }
            other => panic!("Expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn test_compound_assignment_in_expression() {
        let (_, diagnostics) = parse_str("f(a += 1)");
        assert_eq!(
            error_messages(&diagnostics),
            ["compound assignment is not allowed here"]
        );
    }

    #[test]
    fn test_statement_span_includes_semicolon() {
        let stmts = parse_ok("x = 1;");
        assert_eq!(stmts[0].span(), Span::new(0, 0, 6));
        let stmts = parse_ok("x = 1\n");
        assert_eq!(stmts[0].span(), Span::new(0, 0, 5));
    }

    #[test]
    fn test_set_statement() {
        let stmts = parse_ok("set x\nset y = 1\nset z += 2");
        assert!(matches!(&stmts[0], Stmt::SetVar { value: None, .. }));
        assert!(matches!(
            &stmts[1],
            Stmt::SetVar {
                op: None,
                value: Some(_),
                ..
            }
        ));
        assert!(matches!(
            &stmts[2],
            Stmt::SetVar {
                op: Some(BinaryOp::Add),
                ..
            }
        ));
        assert_eq!(stmts[1].span(), Span::new(0, 6, 15));
    }

    #[test]
    fn test_if_elif_else() {
        let stmts = parse_ok("if a { x = 1 } elif b { x = 2 } else { x = 3 }");
        match &stmts[0] {
            Stmt::If {
                else_branch: Some(else_branch),
                span,
                ..
            } => {
                assert_eq!(span.end, 46);
                match else_branch.as_ref() {
                    Stmt::If {
                        condition,
                        else_branch: Some(last),
                        ..
                    } => {
                        assert_eq!(ident(condition), "b");
                        assert!(matches!(last.as_ref(), Stmt::Block { .. }));
                    }
                    other => panic!("Expected elif, got {:?}", other),
                }
            }
            other => panic!("Expected If, got {:?}", other),
        }
    }

    #[test]
    fn test_else_on_next_line() {
        let stmts = parse_ok("if a {\n}\nelse {\n}\nb = 1");
        assert_eq!(stmts.len(), 2);
        assert!(matches!(
            &stmts[0],
            Stmt::If {
                else_branch: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_for_forms() {
        let stmts = parse_ok("for { }\nfor x in xs { }\nfor i < 10 { }\nfor x { }");
        assert!(matches!(
            &stmts[0],
            Stmt::For {
                var: None,
                iterable: None,
                ..
            }
        ));
        match &stmts[1] {
            Stmt::For {
                var: Some(var),
                iterable: Some(iterable),
                ..
            } => {
                assert_eq!(var.name, "x");
                assert_eq!(ident(iterable), "xs");
            }
            other => panic!("Expected for-in, got {:?}", other),
        }
        assert!(matches!(
            &stmts[2],
            Stmt::For {
                var: None,
                iterable: Some(Expr::Binary { .. }),
                ..
            }
        ));
        assert!(matches!(
            &stmts[3],
            Stmt::For {
                var: Some(_),
                iterable: None,
                ..
            }
        ));
    }

    #[test]
    fn test_while_break_continue_return() {
        let stmts = parse_ok("while x { break\ncontinue }\nfn f() { return }\nfn g() { return 1; }");
        match &stmts[0] {
            Stmt::While { body, .. } => {
                let inner = body.statements().unwrap();
                assert!(matches!(inner[0], Stmt::Break { .. }));
                assert!(matches!(inner[1], Stmt::Continue { .. }));
            }
            other => panic!("Expected While, got {:?}", other),
        }
        match &stmts[1] {
            Stmt::Fn { body, .. } => {
                assert!(matches!(
                    body.statements().unwrap()[0],
                    Stmt::Return { value: None, .. }
                ));
            }
            other => panic!("Expected Fn, got {:?}", other),
        }
        match &stmts[2] {
            Stmt::Fn { body, .. } => match &body.statements().unwrap()[0] {
                Stmt::Return {
                    value: Some(_),
                    span,
                } => assert_eq!(span.len(), 9),
                other => panic!("Expected Return, got {:?}", other),
            },
            other => panic!("Expected Fn, got {:?}", other),
        }
    }

    #[test]
    fn test_fn_declaration() {
        let stmts = parse_ok("fn add(a, b) -> r { r = a + b }");
        match &stmts[0] {
            Stmt::Fn {
                name,
                params,
                results,
                body,
                span,
            } => {
                assert_eq!(name.name, "add");
                assert_eq!(params.len(), 2);
                assert_eq!(results.len(), 1);
                assert_eq!(*span, Span::new(0, 0, 31));
                let inner = body.statements().unwrap();
                assert_eq!(inner.len(), 1);
                match &inner[0] {
                    Stmt::Assign {
                        target,
                        op: None,
                        value,
                        ..
                    } => {
                        assert_eq!(ident(target), "r");
                        assert!(matches!(value, Expr::Binary { op: BinaryOp::Add, .. }));
                    }
                    other => panic!("Expected Assign, got {:?}", other),
                }
            }
            other => panic!("Expected Fn, got {:?}", other),
        }
    }

    #[test]
    fn test_fn_without_results() {
        let stmts = parse_ok("fn f(a b) {\n}");
        match &stmts[0] {
            Stmt::Fn {
                params, results, ..
            } => {
                assert_eq!(params.len(), 2);
                assert!(results.is_empty());
            }
            other => panic!("Expected Fn, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_results() {
        let (_, diagnostics) = parse_str("fn f() -> { }");
        assert_eq!(error_messages(&diagnostics), ["missing results"]);
    }

    #[test]
    fn test_recovery_is_contained_to_statement() {
        let (program, diagnostics) = parse_str("{\n    x = )\n    a = 1\n    b = 2\n}\n");
        assert_eq!(error_messages(&diagnostics), ["expected expression"]);

        let stmts = program.statements().unwrap();
        assert_eq!(stmts.len(), 1);
        let inner = stmts[0].statements().unwrap();
        assert_eq!(inner.len(), 2);
        for (stmt, name) in inner.iter().zip(["a", "b"]) {
            match stmt {
                Stmt::Assign { target, .. } => assert_eq!(ident(target), name),
                other => panic!("Expected Assign, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_missing_closer_blames_line_end() {
        let cases = [
            ("x = (a\ny = 1", "expected `)`"),
            ("x = a[1\ny = 1", "expected `]`"),
            ("while x\ny = 1", "missing body"),
        ];
        for (text, message) in cases {
            let (program, diagnostics) = parse_str(text);
            assert_eq!(error_messages(&diagnostics), [message], "{text:?}");
            let rendered = diagnostics.errors()[0].render(false);
            let locator = format!("--><input>:1:{}", text.find('\n').unwrap() + 1);
            assert_eq!(rendered.lines().nth(1), Some(locator.as_str()), "{text:?}");
            assert_eq!(program.statements().map(<[Stmt]>::len), Some(1), "{text:?}");
        }
    }

    #[test]
    fn test_body_on_next_line() {
        let stmts = parse_ok("while x\n{\n}\nif y\n{ z = 1 }");
        assert!(matches!(&stmts[0], Stmt::While { .. }));
        assert!(matches!(&stmts[1], Stmt::If { .. }));
    }

    #[test]
    fn test_missing_statement_end() {
        let (program, diagnostics) = parse_str("a = 1 b = 2\nc = 3");
        assert_eq!(
            error_messages(&diagnostics),
            ["missing newline or semicolon as statement end"]
        );
        assert_eq!(program.statements().unwrap().len(), 1);
    }

    #[test]
    fn test_unmatched_closing_brace() {
        let (program, diagnostics) = parse_str("}\nx = 1");
        assert_eq!(error_messages(&diagnostics), ["unmatched `}`"]);
        assert_eq!(program.statements().unwrap().len(), 1);
    }

    #[test]
    fn test_unterminated_argument_list() {
        let (_, diagnostics) = parse_str("f(a, b");
        assert_eq!(error_messages(&diagnostics), ["unterminated argument list"]);
    }

    #[test]
    fn test_bad_argument_becomes_placeholder() {
        let (program, diagnostics) = parse_str("f(a, +, b)");
        assert_eq!(diagnostics.error_count(), 1);
        match &program.statements().unwrap()[0] {
            Stmt::Expr {
                expr: Expr::Call { args, .. },
                ..
            } => {
                assert_eq!(args.len(), 3);
                assert!(args[1].is_error());
            }
            other => panic!("Expected Call, got {:?}", other),
        }
    }

    #[test]
    fn test_lexer_error_token_is_not_reported_twice() {
        let (program, diagnostics) = parse_str("x = $\ny = 2");
        assert_eq!(error_messages(&diagnostics), ["unknown character"]);
        let stmts = program.statements().unwrap();
        assert_eq!(stmts.len(), 2);
        match &stmts[0] {
            Stmt::Assign { value, .. } => assert!(value.is_error()),
            other => panic!("Expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_block() {
        let (program, diagnostics) = parse_str("{\nx = 1\n");
        assert_eq!(error_messages(&diagnostics), ["unterminated block"]);
        let block = &program.statements().unwrap()[0];
        assert_eq!(block.statements().map(<[Stmt]>::len), Some(1));
    }

    #[test]
    fn test_expression_continues_after_operator() {
        match parse_expr("a +\n    b") {
            Expr::Binary {
                op: BinaryOp::Add, ..
            } => {}
            other => panic!("Expected Binary, got {:?}", other),
        }
    }

    #[test]
    fn test_doc_comments_are_skipped() {
        let stmts = parse_ok("#/ docs /#\nx = 1");
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_error_notes_accumulate_on_one_issue() {
        let (_, diagnostics) = parse_str("while (a { }");
        assert_eq!(diagnostics.error_count(), 1);
        let issue = &diagnostics.errors()[0];
        assert!(issue.annotations().count() >= 2);
    }

    #[test]
    fn test_parse_expression_entry_point() {
        let mut diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new(Arc::new(SourceMap::new(3, "x[0] + 1")));
        let mut parser = Parser::new(&mut lexer, &mut diagnostics);
        let expr = parser.parse_expression().unwrap();
        assert_eq!(expr.span(), Span::new(3, 0, 8));
    }
}
