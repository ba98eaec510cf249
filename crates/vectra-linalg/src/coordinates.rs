//! Coordinates of a vector with respect to a basis.

use crate::elimination::check_linear_dependency;
use crate::{LinalgError, LinalgResult, PIVOT_TOLERANCE};

/// Solve `B c = v` where the columns of `B` are the basis vectors.
///
/// Scene vectors always carry three components. A two-vector basis is
/// accepted when every basis vector and the target lie in the leading
/// plane (trailing components within tolerance of zero); the system is
/// then solved in that plane.
pub fn get_vector_coordinates_in_basis(vector: &[f64], basis: &[Vec<f64>]) -> LinalgResult<Vec<f64>> {
    if basis.is_empty() {
        return Err(LinalgError::InvalidBasis("basis is empty".to_string()));
    }
    let dim = vector.len();
    if let Some(b) = basis.iter().find(|b| b.len() != dim) {
        return Err(LinalgError::InvalidBasis(format!(
            "basis vector has {} components, target has {dim}",
            b.len()
        )));
    }
    if check_linear_dependency(basis) {
        return Err(LinalgError::InvalidBasis(
            "basis vectors are linearly dependent".to_string(),
        ));
    }

    let n = basis.len();
    if n < dim {
        let off_plane = |v: &[f64]| v[n..].iter().any(|x| x.abs() > PIVOT_TOLERANCE);
        if basis.iter().any(|b| off_plane(b)) || off_plane(vector) {
            return Err(LinalgError::InvalidBasis(format!(
                "{n} vectors cannot span a {dim}-dimensional space"
            )));
        }
    }

    // Augmented [B | v], truncated to the first n rows.
    let mut aug: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let mut row: Vec<f64> = basis.iter().map(|b| b[i]).collect();
            row.push(vector[i]);
            row
        })
        .collect();

    for c in 0..n {
        let best = (c..n)
            .max_by(|&i, &j| aug[i][c].abs().total_cmp(&aug[j][c].abs()))
            .unwrap_or(c);
        if aug[best][c].abs() <= PIVOT_TOLERANCE {
            return Err(LinalgError::InvalidBasis("basis matrix is singular".to_string()));
        }
        aug.swap(c, best);
        let pivot_row = aug[c].clone();
        for row in aug.iter_mut().skip(c + 1) {
            let factor = row[c] / pivot_row[c];
            for (x, p) in row.iter_mut().zip(&pivot_row).skip(c) {
                *x -= factor * p;
            }
        }
    }

    let mut solution = vec![0.0; n];
    for i in (0..n).rev() {
        let tail: f64 = (i + 1..n).map(|j| aug[i][j] * solution[j]).sum();
        solution[i] = (aug[i][n] - tail) / aug[i][i];
    }
    Ok(solution)
}
