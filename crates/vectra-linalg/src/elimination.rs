//! Gaussian elimination with partial pivoting, and the subspace queries
//! built on it.

use vectra_types::MatrixValue;

use crate::PIVOT_TOLERANCE;

/// A matrix in reduced row echelon form.
pub(crate) struct Reduced {
    pub rows: Vec<Vec<f64>>,
    /// Column index of each pivot, one per non-zero row, ascending.
    pub pivots: Vec<usize>,
    pub cols: usize,
}

/// Gauss-Jordan reduction to RREF. Column entries whose largest remaining
/// magnitude is within `tolerance` are treated as zero.
pub(crate) fn reduce(mut rows: Vec<Vec<f64>>, tolerance: f64) -> Reduced {
    let height = rows.len();
    let cols = rows.first().map_or(0, Vec::len);
    let mut pivots = Vec::new();
    let mut r = 0;

    for c in 0..cols {
        if r == height {
            break;
        }
        let (best, magnitude) = (r..height)
            .map(|i| (i, rows[i][c].abs()))
            .fold((r, -1.0), |acc, cand| if cand.1 > acc.1 { cand } else { acc });
        if magnitude <= tolerance {
            for row in rows.iter_mut().skip(r) {
                row[c] = 0.0;
            }
            continue;
        }
        rows.swap(r, best);

        let pivot = rows[r][c];
        for x in rows[r].iter_mut() {
            *x /= pivot;
        }
        let pivot_row = rows[r].clone();
        for (i, row) in rows.iter_mut().enumerate() {
            if i == r {
                continue;
            }
            let factor = row[c];
            if factor != 0.0 {
                for (x, p) in row.iter_mut().zip(&pivot_row) {
                    *x -= factor * p;
                }
            }
        }
        pivots.push(c);
        r += 1;
    }

    Reduced { rows, pivots, cols }
}

impl Reduced {
    pub fn rank(&self) -> usize {
        self.pivots.len()
    }

    /// One basis vector of the null space per free column.
    pub fn null_space(&self) -> Vec<Vec<f64>> {
        (0..self.cols)
            .filter(|c| !self.pivots.contains(c))
            .map(|free| {
                let mut v = vec![0.0; self.cols];
                v[free] = 1.0;
                for (row, &p) in self.pivots.iter().enumerate() {
                    v[p] = -self.rows[row][free];
                }
                v
            })
            .collect()
    }
}

/// Zero-pad every vector to the longest one's length.
pub(crate) fn pad(vectors: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let dim = vectors.iter().map(Vec::len).max().unwrap_or(0);
    vectors
        .iter()
        .map(|v| {
            let mut p = v.clone();
            p.resize(dim, 0.0);
            p
        })
        .collect()
}

/// Rows of the matrix whose columns are `vectors`.
fn columns_to_rows(vectors: &[Vec<f64>], dim: usize) -> Vec<Vec<f64>> {
    (0..dim)
        .map(|i| vectors.iter().map(|v| v[i]).collect())
        .collect()
}

/// Number of linearly independent rows (equivalently columns).
pub fn rank(matrix: &MatrixValue) -> usize {
    reduce(matrix.rows().to_vec(), PIVOT_TOLERANCE).rank()
}

/// `true` when the vectors are linearly dependent.
///
/// Vectors of different lengths are zero-padded. An empty set is
/// independent; more vectors than dimensions is always dependent.
pub fn check_linear_dependency(vectors: &[Vec<f64>]) -> bool {
    if vectors.is_empty() {
        return false;
    }
    let padded = pad(vectors);
    let dim = padded[0].len();
    if vectors.len() > dim {
        return true;
    }
    let reduced = reduce(columns_to_rows(&padded, dim), PIVOT_TOLERANCE);
    reduced.rank() < vectors.len()
}

/// Basis of the null space `{x : A x = 0}`.
pub fn kernel(matrix: &MatrixValue) -> Vec<Vec<f64>> {
    reduce(matrix.rows().to_vec(), PIVOT_TOLERANCE).null_space()
}

/// Basis of the column space: the pivot columns of the original matrix.
pub fn image(matrix: &MatrixValue) -> Vec<Vec<f64>> {
    reduce(matrix.rows().to_vec(), PIVOT_TOLERANCE)
        .pivots
        .iter()
        .map(|&c| matrix.column(c))
        .collect()
}

/// Basis of the vectors orthogonal to every vector in `subspace`.
pub fn orthogonal_complement(subspace: &[Vec<f64>]) -> Vec<Vec<f64>> {
    if subspace.is_empty() {
        return Vec::new();
    }
    reduce(pad(subspace), PIVOT_TOLERANCE).null_space()
}
