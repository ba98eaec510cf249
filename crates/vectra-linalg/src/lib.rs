//! Linear-algebra primitives for Vectra.
//!
//! Every routine is a pure function: inputs are borrowed, results are new
//! values, and failures come back as a typed [`LinalgError`]. The
//! [`Response`] wrapper renders any result in the `{status, payload}`
//! shape used at the browser boundary.

mod coordinates;
mod eigen;
mod elimination;
mod error;
mod matrix;
mod transform;
mod vector;

pub use coordinates::get_vector_coordinates_in_basis;
pub use eigen::{calculate_eigen, Eigen};
pub use elimination::{check_linear_dependency, image, kernel, orthogonal_complement, rank};
pub use error::{LinalgError, LinalgResult, Response};
pub use matrix::{
    determinant, invert_matrix, matrix_power, matrix_vector_product, multiply_matrices, transpose,
};
pub use transform::apply_transform_to_object;
pub use vector::{add_vectors, cross_product, dot_product, norm, scale_vector, subtract_vectors};

/// Pivots at or below this magnitude count as zero during elimination.
pub const PIVOT_TOLERANCE: f64 = 1e-10;

/// Eigenvalues whose imaginary part exceeds this magnitude are rejected.
pub const COMPLEX_TOLERANCE: f64 = 1e-10;
