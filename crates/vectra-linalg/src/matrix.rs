//! Matrix products, inversion, and determinants.

use nalgebra::DMatrix;
use vectra_types::MatrixValue;

use crate::{LinalgError, LinalgResult, PIVOT_TOLERANCE};

pub(crate) fn to_dmatrix(m: &MatrixValue) -> DMatrix<f64> {
    DMatrix::from_fn(m.row_count(), m.col_count(), |i, j| m.get(i, j))
}

fn from_dmatrix(m: &DMatrix<f64>) -> LinalgResult<MatrixValue> {
    let rows = m
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect();
    Ok(MatrixValue::new(rows)?)
}

/// Fails with `ComputationFailed` when the inner dimensions disagree.
pub fn multiply_matrices(a: &MatrixValue, b: &MatrixValue) -> LinalgResult<MatrixValue> {
    if a.col_count() != b.row_count() {
        return Err(LinalgError::ComputationFailed(format!(
            "cannot multiply {}x{} by {}x{}",
            a.row_count(),
            a.col_count(),
            b.row_count(),
            b.col_count()
        )));
    }
    from_dmatrix(&(to_dmatrix(a) * to_dmatrix(b)))
}

pub fn matrix_vector_product(m: &MatrixValue, v: &[f64]) -> LinalgResult<Vec<f64>> {
    if m.col_count() != v.len() {
        return Err(LinalgError::DimensionMismatch(format!(
            "cannot multiply {}x{} matrix by a {}-component vector",
            m.row_count(),
            m.col_count(),
            v.len()
        )));
    }
    Ok(m.rows()
        .iter()
        .map(|row| row.iter().zip(v).map(|(x, y)| x * y).sum())
        .collect())
}

pub fn transpose(m: &MatrixValue) -> MatrixValue {
    let rows: Vec<Vec<f64>> = (0..m.col_count()).map(|j| m.column(j)).collect();
    // A valid matrix transposes into a valid matrix.
    MatrixValue::new(rows).unwrap_or_else(|_| m.clone())
}

pub fn determinant(m: &MatrixValue) -> LinalgResult<f64> {
    if !m.is_square() {
        let (rows, cols) = m.shape();
        return Err(LinalgError::NotSquare { rows, cols });
    }
    Ok(to_dmatrix(m).determinant())
}

/// Gauss-Jordan inversion with partial pivoting.
pub fn invert_matrix(m: &MatrixValue) -> LinalgResult<MatrixValue> {
    if !m.is_square() {
        let (rows, cols) = m.shape();
        return Err(LinalgError::NotSquare { rows, cols });
    }
    let n = m.row_count();
    let mut aug: Vec<Vec<f64>> = m
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut r = row.clone();
            r.extend((0..n).map(|j| if i == j { 1.0 } else { 0.0 }));
            r
        })
        .collect();

    for c in 0..n {
        let best = (c..n)
            .max_by(|&i, &j| aug[i][c].abs().total_cmp(&aug[j][c].abs()))
            .unwrap_or(c);
        if aug[best][c].abs() <= PIVOT_TOLERANCE {
            return Err(LinalgError::Singular);
        }
        aug.swap(c, best);

        let pivot = aug[c][c];
        for x in aug[c].iter_mut() {
            *x /= pivot;
        }
        let pivot_row = aug[c].clone();
        for (i, row) in aug.iter_mut().enumerate() {
            if i == c {
                continue;
            }
            let factor = row[c];
            if factor != 0.0 {
                for (x, p) in row.iter_mut().zip(&pivot_row) {
                    *x -= factor * p;
                }
            }
        }
    }

    let rows = aug.into_iter().map(|r| r[n..].to_vec()).collect();
    Ok(MatrixValue::new(rows)?)
}

/// `m` raised to a non-negative integer power by repeated squaring.
pub fn matrix_power(m: &MatrixValue, exponent: u32) -> LinalgResult<MatrixValue> {
    if !m.is_square() {
        let (rows, cols) = m.shape();
        return Err(LinalgError::NotSquare { rows, cols });
    }
    let mut result = MatrixValue::identity(m.row_count());
    let mut base = m.clone();
    let mut e = exponent;
    while e > 0 {
        if e & 1 == 1 {
            result = multiply_matrices(&result, &base)?;
        }
        e >>= 1;
        if e > 0 {
            base = multiply_matrices(&base, &base)?;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> MatrixValue {
        MatrixValue::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn assert_close(a: &MatrixValue, b: &MatrixValue) {
        assert_eq!(a.shape(), b.shape());
        for (ra, rb) in a.rows().iter().zip(b.rows()) {
            for (x, y) in ra.iter().zip(rb) {
                assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
            }
        }
    }

    #[test]
    fn test_multiply() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[0.0, 1.0], &[1.0, 0.0]]);
        assert_eq!(multiply_matrices(&a, &b).unwrap(), m(&[&[2.0, 1.0], &[4.0, 3.0]]));
    }

    #[test]
    fn test_multiply_rectangular_and_mismatch() {
        let a = m(&[&[1.0, 2.0, 3.0]]);
        let b = m(&[&[1.0], &[1.0], &[1.0]]);
        assert_eq!(multiply_matrices(&a, &b).unwrap(), m(&[&[6.0]]));
        assert_eq!(
            multiply_matrices(&a, &a).unwrap_err().status(),
            "ComputationFailed"
        );
    }

    #[test]
    fn test_matrix_vector_product() {
        let rot = m(&[&[0.0, -1.0], &[1.0, 0.0]]);
        assert_eq!(matrix_vector_product(&rot, &[1.0, 0.0]).unwrap(), vec![0.0, 1.0]);
        assert!(matrix_vector_product(&rot, &[1.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_transpose() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert_eq!(transpose(&a), m(&[&[1.0, 4.0], &[2.0, 5.0], &[3.0, 6.0]]));
    }

    #[test]
    fn test_determinant() {
        let d = determinant(&m(&[&[1.0, 2.0], &[3.0, 4.0]])).unwrap();
        assert!((d + 2.0).abs() < 1e-12);
        assert!(determinant(&m(&[&[1.0, 2.0]])).is_err());
    }

    #[test]
    fn test_invert() {
        let a = m(&[&[4.0, 7.0], &[2.0, 6.0]]);
        let inv = invert_matrix(&a).unwrap();
        assert_close(&inv, &m(&[&[0.6, -0.7], &[-0.2, 0.4]]));
        assert_close(&multiply_matrices(&a, &inv).unwrap(), &MatrixValue::identity(2));
    }

    #[test]
    fn test_invert_needs_pivoting() {
        let a = m(&[&[0.0, 1.0], &[1.0, 0.0]]);
        assert_close(&invert_matrix(&a).unwrap(), &a);
    }

    #[test]
    fn test_invert_failures() {
        assert_eq!(
            invert_matrix(&m(&[&[1.0, 2.0], &[2.0, 4.0]])),
            Err(LinalgError::Singular)
        );
        assert_eq!(
            invert_matrix(&m(&[&[1.0, 2.0, 3.0]])).unwrap_err().status(),
            "NotSquare"
        );
    }

    #[test]
    fn test_matrix_power() {
        let a = m(&[&[1.0, 1.0], &[0.0, 1.0]]);
        assert_eq!(matrix_power(&a, 0).unwrap(), MatrixValue::identity(2));
        assert_eq!(matrix_power(&a, 5).unwrap(), m(&[&[1.0, 5.0], &[0.0, 1.0]]));
    }
}
