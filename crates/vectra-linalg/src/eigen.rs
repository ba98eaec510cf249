//! Real eigen-decomposition.
//!
//! Eigenvalues come from nalgebra's Schur decomposition. Eigenvectors are
//! read off the null space of `A - λI`, so they are exact for symmetric
//! and non-symmetric matrices alike.

use serde::{Deserialize, Serialize};
use vectra_types::MatrixValue;

use crate::elimination::reduce;
use crate::matrix::to_dmatrix;
use crate::vector::norm;
use crate::{LinalgError, LinalgResult, COMPLEX_TOLERANCE};

/// Eigenvalues close enough to be treated as one repeated value.
const MULTIPLICITY_TOLERANCE: f64 = 1e-8;

/// Relative pivot tolerance for `A - λI`, whose smallest pivot carries the
/// rounding error of `λ`.
const NULL_SPACE_TOLERANCE: f64 = 1e-8;

/// Eigenvalues in ascending order; `eigenvectors[i]` belongs to
/// `eigenvalues[i]` and has unit length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eigen {
    pub eigenvalues: Vec<f64>,
    pub eigenvectors: Vec<Vec<f64>>,
}

pub fn calculate_eigen(m: &MatrixValue) -> LinalgResult<Eigen> {
    if !m.is_square() {
        let (rows, cols) = m.shape();
        return Err(LinalgError::NotSquareMatrix { rows, cols });
    }
    if m.rows().iter().flatten().any(|x| !x.is_finite()) {
        return Err(LinalgError::ComputationFailed(
            "matrix has non-finite entries".to_string(),
        ));
    }

    let complex = to_dmatrix(m).complex_eigenvalues();
    if complex.iter().any(|z| z.im.abs() > COMPLEX_TOLERANCE) {
        return Err(LinalgError::ComplexEigenvalues);
    }
    let mut eigenvalues: Vec<f64> = complex.iter().map(|z| z.re).collect();
    eigenvalues.sort_by(f64::total_cmp);

    let scale = m
        .rows()
        .iter()
        .flatten()
        .fold(1.0_f64, |acc, x| acc.max(x.abs()));

    let mut eigenvectors = Vec::with_capacity(eigenvalues.len());
    let mut i = 0;
    while i < eigenvalues.len() {
        let group_end = (i..eigenvalues.len())
            .take_while(|&j| (eigenvalues[j] - eigenvalues[i]).abs() <= MULTIPLICITY_TOLERANCE * scale)
            .last()
            .map_or(i + 1, |j| j + 1);
        let lambda = eigenvalues[i..group_end].iter().sum::<f64>() / (group_end - i) as f64;

        let vectors = eigenvectors_for(m, lambda, scale);
        if vectors.is_empty() {
            return Err(LinalgError::ComputationFailed(format!(
                "no eigenvector found for eigenvalue {lambda}"
            )));
        }
        // A defective eigenvalue has fewer vectors than its multiplicity.
        for k in 0..(group_end - i) {
            eigenvectors.push(vectors[k % vectors.len()].clone());
        }
        i = group_end;
    }

    Ok(Eigen {
        eigenvalues,
        eigenvectors,
    })
}

fn eigenvectors_for(m: &MatrixValue, lambda: f64, scale: f64) -> Vec<Vec<f64>> {
    let shifted: Vec<Vec<f64>> = m
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, &x)| if i == j { x - lambda } else { x })
                .collect()
        })
        .collect();
    reduce(shifted, NULL_SPACE_TOLERANCE * scale)
        .null_space()
        .into_iter()
        .filter_map(|v| normalize(&v))
        .collect()
}

/// Unit length, first non-zero component positive.
fn normalize(v: &[f64]) -> Option<Vec<f64>> {
    let len = norm(v);
    if len <= f64::EPSILON {
        return None;
    }
    let sign = v
        .iter()
        .find(|x| x.abs() > NULL_SPACE_TOLERANCE)
        .map_or(1.0, |x| x.signum());
    Some(v.iter().map(|x| x * sign / len).collect())
}
