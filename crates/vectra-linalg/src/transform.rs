//! Applying a matrix to scene geometry.

use vectra_types::scene::{SceneObject, Vec3};
use vectra_types::MatrixValue;

use crate::matrix::matrix_vector_product;
use crate::{LinalgError, LinalgResult, PIVOT_TOLERANCE};

/// Multiply `matrix` into a vector's components or a point's position.
///
/// A vector keeps its `start`; its `end` and `components` move together.
/// A 2x2 matrix is accepted for geometry lying in the z = 0 plane.
pub fn apply_transform_to_object(object: &SceneObject, matrix: &MatrixValue) -> LinalgResult<SceneObject> {
    match object {
        SceneObject::Vector(v) => {
            let components = transform_vec3(matrix, v.components())?;
            let mut moved = v.clone();
            moved.set_components(components);
            Ok(SceneObject::Vector(moved))
        }
        SceneObject::Point(p) => {
            let mut moved = p.clone();
            moved.position = transform_vec3(matrix, p.position)?;
            Ok(SceneObject::Point(moved))
        }
        SceneObject::Matrix(_) => Err(LinalgError::InvalidType("matrix")),
    }
}

fn transform_vec3(matrix: &MatrixValue, v: Vec3) -> LinalgResult<Vec3> {
    let (rows, cols) = matrix.shape();
    match (rows, cols) {
        (3, 3) => {
            let out = matrix_vector_product(matrix, &v)?;
            Ok([out[0], out[1], out[2]])
        }
        (2, 2) if v[2].abs() <= PIVOT_TOLERANCE => {
            let out = matrix_vector_product(matrix, &v[..2])?;
            Ok([out[0], out[1], 0.0])
        }
        _ => Err(LinalgError::DimensionMismatch(format!(
            "a {rows}x{cols} matrix cannot transform [{}, {}, {}]",
            v[0], v[1], v[2]
        ))),
    }
}
