//! Line parsing: `name = expr` or a bare expression.

use vectra_lexer::token::TokenKind;
use vectra_types::ast::{ExprKind, Statement, StatementKind};
use vectra_types::{ErrorCode, ScriptError};

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// `Line = Ident "=" Expr | Expr`
    ///
    /// Consumes the terminating newline on success.
    pub(crate) fn parse_line(&mut self) -> Result<Statement, ScriptError> {
        let start = self.current_span();

        let stmt = if matches!(self.peek_kind(), TokenKind::Identifier(_))
            && self.look_ahead(1) == &TokenKind::Eq
        {
            let target = self.expect_identifier()?;
            self.advance(); // `=`
            let value = self.parse_expression()?;
            let span = start.merge(value.span);
            Statement {
                kind: StatementKind::Assign { target, value },
                span,
            }
        } else {
            let expr = self.parse_expression()?;
            if self.check_exact(&TokenKind::Eq) {
                let message = match &expr.kind {
                    ExprKind::NumberLit(n) => format!("cannot assign to the number {n}"),
                    _ => "only a plain name can be assigned to".to_string(),
                };
                return Err(self
                    .error_at(ErrorCode::INVALID_ASSIGNMENT_TARGET, message, expr.span)
                    .with_suggestion("write `name = expression`"));
            }
            let span = expr.span;
            Statement {
                kind: StatementKind::Expr(expr),
                span,
            }
        };

        if !self.at_line_end() {
            return Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("unexpected '{}' after expression", self.peek_kind()),
            ));
        }
        self.eat(&TokenKind::Newline);
        Ok(stmt)
    }
}
