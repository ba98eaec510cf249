//! Core parser infrastructure: token cursor, error construction, helpers.

use vectra_lexer::token::{Token, TokenKind};
use vectra_types::ast::{Ident, Statement};
use vectra_types::scene::LineId;
use vectra_types::{ErrorCode, ScriptError, ScriptSource, Span};

/// Maximum expression nesting depth before a line is rejected.
pub(crate) const MAX_EXPR_DEPTH: u32 = 32;

/// Maximum number of binary operators on one line.
///
/// Operator chains build left-deep trees, so this also bounds the depth every
/// later tree walk has to recurse through.
pub(crate) const MAX_EXPR_OPERATORS: u32 = 256;

/// The Vectra parser.
///
/// Consumes a token stream produced by the lexer and builds one statement
/// per non-blank line. A failing line is skipped up to its newline so the
/// following lines parse as if it were not there.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Script source for error context.
    script: &'src ScriptSource,
    /// Current expression nesting depth.
    pub(crate) expr_depth: u32,
    /// Binary operators seen so far on the current line.
    pub(crate) expr_operators: u32,
}

/// Outcome of parsing one non-blank line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub line: LineId,
    pub outcome: Result<Statement, ScriptError>,
}

impl ParsedLine {
    /// 1-based line number, matching [`Span::line`].
    pub fn line_number(&self) -> u32 {
        self.line.0 as u32 + 1
    }
}

/// Result of parsing a script: non-blank lines in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedScript {
    pub lines: Vec<ParsedLine>,
}

impl ParsedScript {
    /// Lines that failed to parse.
    pub fn errors(&self) -> impl Iterator<Item = (LineId, &ScriptError)> {
        self.lines
            .iter()
            .filter_map(|l| l.outcome.as_ref().err().map(|e| (l.line, e)))
    }

    /// Successfully parsed statements.
    pub fn statements(&self) -> impl Iterator<Item = (LineId, &Statement)> {
        self.lines
            .iter()
            .filter_map(|l| l.outcome.as_ref().ok().map(|s| (l.line, s)))
    }
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and its script.
    pub fn new(tokens: Vec<Token>, script: &'src ScriptSource) -> Self {
        Self {
            tokens,
            pos: 0,
            script,
            expr_depth: 0,
            expr_operators: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).or_else(|| self.tokens.last())
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        self.peek().map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    /// Advance the cursor by one and return the consumed token's span.
    pub(crate) fn advance(&mut self) -> Span {
        let span = self.current_span();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        span
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(1, 1))
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().map(|t| t.span).unwrap_or_else(|| Span::point(1, 1))
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Returns `true` if the current token ends the statement.
    pub(crate) fn at_line_end(&self) -> bool {
        self.peek_kind().is_line_end()
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Look ahead by `n` tokens from current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind, returning its span.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Result<Span, ScriptError> {
        if self.check_exact(expected) {
            Ok(self.advance())
        } else {
            let code = if expected_closer(expected) && self.at_line_end() {
                ErrorCode::UNCLOSED_DELIMITER
            } else {
                ErrorCode::UNEXPECTED_TOKEN
            };
            Err(self.error_at_current(
                code,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            ))
        }
    }

    /// Expect an identifier token.
    pub(crate) fn expect_identifier(&mut self) -> Result<Ident, ScriptError> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance();
                Ok(Ident::new(name, span))
            }
            other => Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected identifier, got '{other}'"),
            )),
        }
    }

    // ── Error Construction ────────────────────────────────────────────────────

    /// Build an error at the current token position.
    pub(crate) fn error_at_current(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> ScriptError {
        self.error_at(code, message, self.current_span())
    }

    /// Build an error at a specific span.
    pub(crate) fn error_at(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> ScriptError {
        let source_line = self.script.line(span.line).unwrap_or("").to_string();
        ScriptError::new(code, message, span, source_line)
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Skip tokens up to and including the next newline.
    pub(crate) fn synchronize(&mut self) {
        while !self.at_end() {
            if self.eat(&TokenKind::Newline) {
                return;
            }
            self.advance();
        }
    }

    /// Skip all consecutive newline tokens.
    pub(crate) fn skip_newlines(&mut self) {
        while self.eat(&TokenKind::Newline) {}
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into per-line statements.
    pub fn parse(mut self) -> ParsedScript {
        let mut lines = Vec::new();
        loop {
            self.skip_newlines();
            if self.at_end() {
                break;
            }
            let line = LineId(self.current_span().line_index());
            self.expr_depth = 0;
            self.expr_operators = 0;
            let outcome = self.parse_line();
            if outcome.is_err() {
                self.synchronize();
            }
            lines.push(ParsedLine { line, outcome });
        }
        ParsedScript { lines }
    }
}

fn expected_closer(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::RParen | TokenKind::RBracket)
}
