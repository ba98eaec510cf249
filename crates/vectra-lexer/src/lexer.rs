//! Core lexer: converts a whole script into a token stream.
//!
//! - Lines are kept apart by [`TokenKind::Newline`] tokens so the parser can
//!   treat every line as an independent statement.
//! - `#` starts a comment that runs to the end of the line.
//! - Unknown characters are reported and skipped; lexing never stops early,
//!   so one bad line cannot hide the tokens of the next one.

use vectra_types::{ErrorCode, ScriptError, ScriptSource, Span};

use crate::token::{Token, TokenKind};

/// The Vectra lexer.
pub struct Lexer<'src> {
    /// The full script text as bytes.
    source: &'src [u8],
    /// Script source for error reporting.
    script: &'src ScriptSource,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Collected errors.
    errors: Vec<ScriptError>,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Errors encountered during lexing, in source order.
    pub errors: Vec<ScriptError>,
}

impl LexResult {
    /// The first lexing error reported on a 1-based line, if any.
    pub fn error_on_line(&self, line: u32) -> Option<&ScriptError> {
        self.errors.iter().find(|e| e.span.line == line)
    }
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given script.
    pub fn new(script: &'src ScriptSource) -> Self {
        Self {
            source: script.source.as_bytes(),
            script,
            pos: 0,
            line: 1,
            col: 1,
            errors: Vec::new(),
        }
    }

    /// Lex the entire script into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_col: u32) -> Span {
        Span::new(self.line, start_col, self.col.saturating_sub(1).max(start_col))
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.script.line(span.line).unwrap_or("").to_string();
        self.errors
            .push(ScriptError::new(code, message, span, source_line));
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip spaces, tabs and carriage returns (NOT newlines, those are tokens).
    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\r') = self.peek() {
            self.advance();
        }
    }

    /// Skip a `# ...` comment, leaving the newline in place.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == b'\n' {
                break;
            }
            self.advance();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'#') {
                self.skip_comment();
                continue;
            }

            let start_col = self.col;
            let start_pos = self.pos;
            let Some(ch) = self.advance() else {
                return Token::new(TokenKind::Eof, self.current_span());
            };

            let kind = match ch {
                b'\n' => {
                    // The newline belongs to the line it terminates.
                    let span = Span::point(self.line - 1, start_col);
                    return Token::new(TokenKind::Newline, span);
                }
                b'0'..=b'9' => self.scan_number(start_pos),
                b'.' if matches!(self.peek(), Some(b'0'..=b'9')) => self.scan_number(start_pos),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(start_pos),
                b'+' => TokenKind::Plus,
                b'-' => TokenKind::Minus,
                b'*' => TokenKind::Star,
                b'/' => TokenKind::Slash,
                b'^' => TokenKind::Caret,
                b'=' => TokenKind::Eq,
                b'(' => TokenKind::LParen,
                b')' => TokenKind::RParen,
                b'[' => TokenKind::LBracket,
                b']' => TokenKind::RBracket,
                b',' => TokenKind::Comma,
                b';' => TokenKind::Semicolon,
                _ => {
                    let span = self.span_from(start_col);
                    let shown = self.char_at(start_pos);
                    self.emit_error(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        format!("unexpected character '{shown}'"),
                        span,
                    );
                    // Error recovery: skip the rest of a multi-byte char and rescan
                    while let Some(0x80..=0xBF) = self.peek() {
                        self.pos += 1;
                    }
                    continue;
                }
            };
            return Token::new(kind, self.span_from(start_col));
        }
    }

    fn char_at(&self, pos: usize) -> char {
        std::str::from_utf8(&self.source[pos..])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(self.source[pos] as char)
    }

    fn scan_number(&mut self, start_pos: usize) -> TokenKind {
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }

        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            self.advance();
            while let Some(b'0'..=b'9') = self.peek() {
                self.advance();
            }
        }

        // Exponent: `e5`, `E-3`, `e+2`
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let digits_at = match self.peek_at(1) {
                Some(b'+' | b'-') => 2,
                _ => 1,
            };
            if matches!(self.peek_at(digits_at), Some(b'0'..=b'9')) {
                for _ in 0..digits_at {
                    self.advance();
                }
                while let Some(b'0'..=b'9') = self.peek() {
                    self.advance();
                }
            }
        }

        let text = std::str::from_utf8(&self.source[start_pos..self.pos]).unwrap_or("0");
        TokenKind::NumberLit(text.parse().unwrap_or(0.0))
    }

    fn scan_identifier(&mut self, start_pos: usize) -> TokenKind {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.source[start_pos..self.pos]).unwrap_or("");
        TokenKind::Identifier(text.to_string())
    }
}
