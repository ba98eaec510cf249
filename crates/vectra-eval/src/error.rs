//! Runtime error types for the Vectra evaluator.

use thiserror::Error;
use vectra_linalg::{LinalgError, LinalgResult};
use vectra_types::{ErrorCode, ScriptError, ScriptSource, Span};

/// Evaluation error, scoped to the expression that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String, span: Span },

    #[error("dimension mismatch: {message}")]
    DimensionMismatch { message: String, span: Span },

    #[error("type mismatch: {message}")]
    TypeMismatch { message: String, span: Span },

    /// A literal that is neither a vector nor a rectangular matrix.
    #[error("unsupported shape: {message}")]
    UnsupportedShape { message: String, span: Span },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String, span: Span },

    #[error("{name}() takes {expected} argument(s), got {found}")]
    WrongArgCount {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// Division by zero, non-finite powers.
    #[error("arithmetic trap: {message}")]
    ArithmeticTrap { message: String, span: Span },

    #[error("{source}")]
    Linalg { source: LinalgError, span: Span },
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

impl EvalError {
    pub fn span(&self) -> Span {
        match self {
            EvalError::UndefinedVariable { span, .. }
            | EvalError::DimensionMismatch { span, .. }
            | EvalError::TypeMismatch { span, .. }
            | EvalError::UnsupportedShape { span, .. }
            | EvalError::UnknownFunction { span, .. }
            | EvalError::WrongArgCount { span, .. }
            | EvalError::ArithmeticTrap { span, .. }
            | EvalError::Linalg { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EvalError::UndefinedVariable { .. } => ErrorCode::UNKNOWN_IDENTIFIER,
            EvalError::DimensionMismatch { .. } => ErrorCode::DIMENSION_MISMATCH,
            EvalError::TypeMismatch { .. } => ErrorCode::TYPE_MISMATCH,
            EvalError::UnsupportedShape { .. } => ErrorCode::UNSUPPORTED_SHAPE,
            EvalError::UnknownFunction { .. } => ErrorCode::UNKNOWN_FUNCTION,
            EvalError::WrongArgCount { .. } => ErrorCode::WRONG_ARG_COUNT,
            EvalError::ArithmeticTrap { .. } => ErrorCode::ARITHMETIC,
            EvalError::Linalg { source, .. } => match source {
                LinalgError::DimensionMismatch(_) | LinalgError::NotIn3D { .. } => {
                    ErrorCode::DIMENSION_MISMATCH
                }
                LinalgError::NotSquare { .. } | LinalgError::NotSquareMatrix { .. } => {
                    ErrorCode::UNSUPPORTED_SHAPE
                }
                LinalgError::InvalidType(_) => ErrorCode::TYPE_MISMATCH,
                LinalgError::Singular
                | LinalgError::ComplexEigenvalues
                | LinalgError::InvalidBasis(_)
                | LinalgError::ComputationFailed(_) => ErrorCode::NUMERIC_FAILURE,
            },
        }
    }

    /// Render as a line-scoped [`ScriptError`].
    pub fn to_script_error(&self, script: &ScriptSource) -> ScriptError {
        let span = self.span();
        let source_line = script.line(span.line).unwrap_or("");
        let error = ScriptError::new(self.code(), self.to_string(), span, source_line);
        match self {
            EvalError::UndefinedVariable { name, .. } => {
                error.with_suggestion(format!("assign '{name}' on an earlier line"))
            }
            EvalError::TypeMismatch { message, .. } if message.contains("vector * vector") => {
                error.with_suggestion("use cross(a, b) or dot(a, b)")
            }
            _ => error,
        }
    }
}

/// Attach a source span to linear-algebra failures.
pub(crate) trait AtSpan<T> {
    fn at(self, span: Span) -> EvalResult<T>;
}

impl<T> AtSpan<T> for LinalgResult<T> {
    fn at(self, span: Span) -> EvalResult<T> {
        self.map_err(|source| EvalError::Linalg { source, span })
    }
}
