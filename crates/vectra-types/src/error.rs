use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Evaluation,
}

/// Numeric error code (E100–E299).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNEXPECTED_CHARACTER: Self = Self(101);
    pub const UNCLOSED_DELIMITER: Self = Self(102);
    pub const INVALID_ASSIGNMENT_TARGET: Self = Self(103);
    pub const STRUCTURAL_LIMIT_EXCEEDED: Self = Self(104);

    // ── Evaluation errors (E200–E299) ──
    pub const UNKNOWN_IDENTIFIER: Self = Self(200);
    pub const DIMENSION_MISMATCH: Self = Self(201);
    pub const UNSUPPORTED_SHAPE: Self = Self(202);
    pub const TYPE_MISMATCH: Self = Self(203);
    pub const UNKNOWN_FUNCTION: Self = Self(204);
    pub const WRONG_ARG_COUNT: Self = Self(205);
    pub const ARITHMETIC: Self = Self(206);
    pub const NUMERIC_FAILURE: Self = Self(207);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Syntax,
            _ => ErrorCategory::Evaluation,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Evaluation => write!(f, "evaluation"),
        }
    }
}

/// A structured error scoped to a single script line.
///
/// Parse errors and evaluation errors share this shape so the store layer
/// can show either one beside the offending line.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{code} at {span}: {message}")]
pub struct ScriptError {
    /// Error code (e.g., E201).
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ScriptError {
    /// Create a new error.
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Returns `true` for errors raised before evaluation started.
    pub fn is_syntax(&self) -> bool {
        self.category == ErrorCategory::Syntax
    }
}
