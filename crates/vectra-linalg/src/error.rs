use serde::{Deserialize, Serialize};
use thiserror::Error;
use vectra_types::ShapeError;

/// Numeric and structural failures of the linear-algebra routines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinalgError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("eigen-decomposition needs a square matrix, got {rows}x{cols}")]
    NotSquareMatrix { rows: usize, cols: usize },

    #[error("matrix is singular")]
    Singular,

    #[error("cross product needs two 3-component vectors, got {left} and {right}")]
    NotIn3D { left: usize, right: usize },

    #[error("matrix has complex eigenvalues")]
    ComplexEigenvalues,

    #[error("invalid basis: {0}")]
    InvalidBasis(String),

    #[error("computation failed: {0}")]
    ComputationFailed(String),

    #[error("{0} objects cannot be transformed")]
    InvalidType(&'static str),
}

impl LinalgError {
    /// The status string reported at the boundary.
    pub fn status(&self) -> &'static str {
        match self {
            LinalgError::DimensionMismatch(_) => "DimensionMismatch",
            LinalgError::NotSquare { .. } => "NotSquare",
            LinalgError::NotSquareMatrix { .. } => "NotSquareMatrix",
            LinalgError::Singular => "Singular",
            LinalgError::NotIn3D { .. } => "NotIn3D",
            LinalgError::ComplexEigenvalues => "ComplexEigenvalues",
            LinalgError::InvalidBasis(_) => "InvalidBasis",
            LinalgError::ComputationFailed(_) => "ComputationFailed",
            LinalgError::InvalidType(_) => "InvalidType",
        }
    }
}

impl From<ShapeError> for LinalgError {
    fn from(err: ShapeError) -> Self {
        LinalgError::ComputationFailed(err.to_string())
    }
}

pub type LinalgResult<T> = Result<T, LinalgError>;

/// `{status: "Success" | <error kind>, payload: T | null}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    pub status: String,
    pub payload: Option<T>,
}

impl<T> Response<T> {
    pub const SUCCESS: &'static str = "Success";

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

impl<T> From<LinalgResult<T>> for Response<T> {
    fn from(result: LinalgResult<T>) -> Self {
        match result {
            Ok(payload) => Response {
                status: Self::SUCCESS.to_string(),
                payload: Some(payload),
            },
            Err(err) => Response {
                status: err.status().to_string(),
                payload: None,
            },
        }
    }
}
