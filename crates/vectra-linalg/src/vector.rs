//! Component-wise vector arithmetic.

use crate::{LinalgError, LinalgResult};

fn check_same_length(a: &[f64], b: &[f64]) -> LinalgResult<()> {
    if a.len() != b.len() {
        return Err(LinalgError::DimensionMismatch(format!(
            "vectors have {} and {} components",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

pub fn add_vectors(a: &[f64], b: &[f64]) -> LinalgResult<Vec<f64>> {
    check_same_length(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

pub fn subtract_vectors(a: &[f64], b: &[f64]) -> LinalgResult<Vec<f64>> {
    check_same_length(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}

pub fn dot_product(a: &[f64], b: &[f64]) -> LinalgResult<f64> {
    check_same_length(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Standard right-handed cross product. Both inputs must have exactly 3
/// components.
pub fn cross_product(a: &[f64], b: &[f64]) -> LinalgResult<Vec<f64>> {
    match (a, b) {
        ([a0, a1, a2], [b0, b1, b2]) => Ok(vec![
            a1 * b2 - a2 * b1,
            a2 * b0 - a0 * b2,
            a0 * b1 - a1 * b0,
        ]),
        _ => Err(LinalgError::NotIn3D {
            left: a.len(),
            right: b.len(),
        }),
    }
}

/// Euclidean length.
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

pub fn scale_vector(v: &[f64], k: f64) -> Vec<f64> {
    v.iter().map(|x| x * k).collect()
}
