use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons raw row data cannot form a [`MatrixValue`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("matrix has no rows")]
    Empty,
    #[error("matrix rows must not be empty")]
    EmptyRow,
    #[error("row {row} has {found} entries, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A rectangular matrix stored row-major.
///
/// Always holds at least one row, every row is non-empty, and all rows
/// have the same length. Deserialization goes through the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct MatrixValue {
    rows: Vec<Vec<f64>>,
}

impl MatrixValue {
    /// Build a matrix from row data, rejecting empty or ragged input.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        let expected = rows.first().ok_or(ShapeError::Empty)?.len();
        if expected == 0 {
            return Err(ShapeError::EmptyRow);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(ShapeError::Ragged {
                row,
                expected,
                found: r.len(),
            });
        }
        Ok(Self { rows })
    }

    /// Build a matrix whose columns are the given vectors.
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self, ShapeError> {
        let height = columns.first().ok_or(ShapeError::Empty)?.len();
        if let Some((row, c)) = columns.iter().enumerate().find(|(_, c)| c.len() != height) {
            return Err(ShapeError::Ragged {
                row,
                expected: height,
                found: c.len(),
            });
        }
        let rows = (0..height)
            .map(|i| columns.iter().map(|c| c[i]).collect())
            .collect();
        Self::new(rows)
    }

    /// The `n × n` identity matrix. `n` is clamped to at least 1.
    pub fn identity(n: usize) -> Self {
        let n = n.max(1);
        let rows = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows[0].len()
    }

    pub fn is_square(&self) -> bool {
        self.row_count() == self.col_count()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[col]).collect()
    }

    /// Apply `f` to every entry. The shape is unchanged.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .map(|r| r.iter().map(|&x| f(x)).collect())
                .collect(),
        }
    }

    /// `(rows, cols)` for error messages.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.col_count())
    }
}

impl TryFrom<Vec<Vec<f64>>> for MatrixValue {
    type Error = ShapeError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<MatrixValue> for Vec<Vec<f64>> {
    fn from(m: MatrixValue) -> Self {
        m.rows
    }
}

/// A runtime value produced by evaluating an expression.
///
/// The variant is the classification: rank-1 data is a vector, rectangular
/// rank-2 data is a matrix. Anything nested deeper cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Vector(Vec<f64>),
    Matrix(MatrixValue),
}

impl Value {
    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Scalar(_) => "scalar".into(),
            Value::Vector(v) => format!("vector[{}]", v.len()),
            Value::Matrix(m) => format!("matrix[{}x{}]", m.row_count(), m.col_count()),
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&MatrixValue> {
        match self {
            Value::Matrix(m) => Some(m),
            _ => None,
        }
    }
}
