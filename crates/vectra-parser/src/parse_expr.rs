//! Expression parsing with operator precedence.
//!
//! Precedence (lowest → highest):
//! 4. `+`, `-`
//! 3. `*`, `/`
//! 2. unary `-`
//! 1. `^` (right-associative, binds tighter than unary minus on its left)

use vectra_lexer::token::TokenKind;
use vectra_types::ast::*;
use vectra_types::{ErrorCode, ScriptError};

use crate::parser::{Parser, MAX_EXPR_DEPTH, MAX_EXPR_OPERATORS};

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ScriptError> {
        self.enter()?;
        let result = self.parse_additive();
        self.expr_depth -= 1;
        result
    }

    fn enter(&mut self) -> Result<(), ScriptError> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            let depth = self.expr_depth;
            self.expr_depth -= 1;
            return Err(self.error_at_current(
                ErrorCode::STRUCTURAL_LIMIT_EXCEEDED,
                format!("maximum expression nesting depth is {MAX_EXPR_DEPTH}, got {depth}"),
            ));
        }
        Ok(())
    }

    /// Build `left op right`, counting it against the line's operator budget.
    fn binary(&mut self, left: Expr, op: BinOp, right: Expr) -> Result<Expr, ScriptError> {
        self.expr_operators += 1;
        if self.expr_operators > MAX_EXPR_OPERATORS {
            return Err(self
                .error_at(
                    ErrorCode::STRUCTURAL_LIMIT_EXCEEDED,
                    format!("expression too complex: more than {MAX_EXPR_OPERATORS} operators on one line"),
                    right.span,
                )
                .with_suggestion("split the expression over several assignments"));
        }
        let span = left.span.merge(right.span);
        Ok(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `Expr = Term { ("+" | "-") Term }`
    fn parse_additive(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = self.binary(left, op, right)?;
        }
        Ok(left)
    }

    /// `Term = Unary { ("*" | "/") Unary }`
    fn parse_term(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(left, op, right)?;
        }
        Ok(left)
    }

    /// `Unary = "-" Unary | Power`
    fn parse_unary(&mut self) -> Result<Expr, ScriptError> {
        if self.check_exact(&TokenKind::Minus) {
            let start = self.advance();
            self.enter()?;
            let operand = self.parse_unary();
            self.expr_depth -= 1;
            let operand = operand?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_power()
    }

    /// `Power = Primary [ "^" Unary ]`
    fn parse_power(&mut self) -> Result<Expr, ScriptError> {
        let base = self.parse_primary()?;
        if self.eat(&TokenKind::Caret) {
            self.enter()?;
            let exponent = self.parse_unary();
            self.expr_depth -= 1;
            return self.binary(base, BinOp::Pow, exponent?);
        }
        Ok(base)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    /// `Primary = Number | Ident | Ident "(" Args ")" | "(" Expr ")" | "[" Rows "]"`
    fn parse_primary(&mut self) -> Result<Expr, ScriptError> {
        match self.peek_kind().clone() {
            TokenKind::NumberLit(n) => {
                let span = self.advance();
                Ok(Expr::new(ExprKind::NumberLit(n), span))
            }
            TokenKind::Identifier(name) => {
                let span = self.advance();
                if self.check_exact(&TokenKind::LParen) {
                    self.parse_call(Ident::new(name, span))
                } else {
                    Ok(Expr::new(ExprKind::Identifier(name), span))
                }
            }
            TokenKind::LParen => {
                let start = self.advance();
                let inner = self.parse_expression()?;
                let end = self.expect(&TokenKind::RParen)?;
                Ok(Expr::new(
                    ExprKind::Paren(Box::new(inner)),
                    start.merge(end),
                ))
            }
            TokenKind::LBracket => self.parse_list(),
            other => {
                let message = if other.is_line_end() {
                    format!("expected expression, got {other}")
                } else {
                    format!("expected expression, got '{other}'")
                };
                Err(self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, message))
            }
        }
    }

    /// `Call = Ident "(" [ Expr { "," Expr } ] ")"`
    fn parse_call(&mut self, name: Ident) -> Result<Expr, ScriptError> {
        self.advance(); // `(`
        let mut args = Vec::new();
        if !self.check_exact(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(&TokenKind::RParen)?;
        let span = name.span.merge(end);
        Ok(Expr::new(ExprKind::Call { name, args }, span))
    }

    /// `List = "[" [ Row { ";" Row } ] "]"` where `Row = Expr { "," Expr }`.
    ///
    /// A single row is a flat list; several rows become a list of lists.
    fn parse_list(&mut self) -> Result<Expr, ScriptError> {
        let start = self.advance(); // `[`
        if self.check_exact(&TokenKind::RBracket) {
            let end = self.advance();
            return Ok(Expr::new(ExprKind::ListLit(Vec::new()), start.merge(end)));
        }

        let mut rows: Vec<Expr> = Vec::new();
        loop {
            let row_start = self.current_span();
            let mut elements = vec![self.parse_expression()?];
            while self.eat(&TokenKind::Comma) {
                elements.push(self.parse_expression()?);
            }
            let row_span = row_start.merge(self.previous_span());
            rows.push(Expr::new(ExprKind::ListLit(elements), row_span));
            if !self.eat(&TokenKind::Semicolon) {
                break;
            }
        }
        let end = self.expect(&TokenKind::RBracket)?;
        let span = start.merge(end);

        if rows.len() == 1 {
            if let Some(Expr {
                kind: ExprKind::ListLit(elements),
                ..
            }) = rows.pop()
            {
                return Ok(Expr::new(ExprKind::ListLit(elements), span));
            }
        }
        Ok(Expr::new(ExprKind::ListLit(rows), span))
    }
}
