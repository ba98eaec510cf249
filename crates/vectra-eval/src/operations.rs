//! Direct operations on selected scene objects.
//!
//! These bypass the script: they take objects, call the linear-algebra
//! routines, report the outcome to a [`NotificationSink`], and hand back a
//! new object (or number) for the store to keep.

use std::collections::BTreeMap;

use log::warn;
use thiserror::Error;
use vectra_linalg::{self as linalg, Eigen, LinalgError};
use vectra_types::scene::{
    Derivation, DerivationKind, MatrixObject, ObjectId, SceneObject, Vec3, VectorObject,
};
use vectra_types::MatrixValue;

use crate::basis::ActiveBasis;
use crate::config::{EngineConfig, Palette};
use crate::materialize::mint_id;
use crate::notify::NotificationSink;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperationError {
    #[error("'{0}' is not a vector")]
    NotAVector(String),

    #[error("'{0}' is not a matrix")]
    NotAMatrix(String),

    #[error("no basis is set")]
    NoBasis,

    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

pub type OperationResult<T> = Result<T, OperationError>;

fn vector_of(obj: &SceneObject) -> OperationResult<&VectorObject> {
    obj.as_vector()
        .ok_or_else(|| OperationError::NotAVector(obj.name().to_string()))
}

fn matrix_of(obj: &SceneObject) -> OperationResult<&MatrixValue> {
    obj.as_matrix()
        .map(|m| &m.values)
        .ok_or_else(|| OperationError::NotAMatrix(obj.name().to_string()))
}

fn to_vec3(v: &[f64]) -> Vec3 {
    let mut out = [0.0; 3];
    for (o, x) in out.iter_mut().zip(v) {
        *o = *x;
    }
    out
}

/// Report `result` to the sink, then pass it through.
fn report<T>(
    sink: &mut impl NotificationSink,
    action: &str,
    result: OperationResult<T>,
    describe: impl FnOnce(&T) -> String,
) -> OperationResult<T> {
    match &result {
        Ok(value) => sink.success(describe(value)),
        Err(err) => {
            warn!("{action} failed: {err}");
            sink.error(format!("{action} failed: {err}"));
        }
    }
    result
}

/// Operations bound to an engine palette.
#[derive(Debug, Clone, Default)]
pub struct Operations {
    palette: Palette,
}

impl Operations {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            palette: config.palette.clone(),
        }
    }

    /// A vector from `start` to `end`; its components follow from them.
    pub fn new_vector(&self, name: &str, start: Vec3, end: Vec3) -> SceneObject {
        SceneObject::Vector(VectorObject::new(
            ObjectId::new(mint_id(name)),
            name,
            start,
            end,
            self.palette.vector.clone(),
        ))
    }

    fn derived_vector(&self, name: String, components: &[f64], derivation: Derivation) -> SceneObject {
        let color = match derivation.kind {
            DerivationKind::CrossProduct => self.palette.cross_product.clone(),
            DerivationKind::Other => self.palette.vector.clone(),
        };
        let id = ObjectId::new(mint_id(&name));
        SceneObject::Vector(
            VectorObject::from_origin(id, name, to_vec3(components), color).with_derivation(derivation),
        )
    }

    pub fn add(
        &self,
        a: &SceneObject,
        b: &SceneObject,
        sink: &mut impl NotificationSink,
    ) -> OperationResult<SceneObject> {
        let result = (|| -> OperationResult<SceneObject> {
            let (va, vb) = (vector_of(a)?, vector_of(b)?);
            let sum = linalg::add_vectors(&va.components(), &vb.components())?;
            Ok(self.derived_vector(
                format!("{}+{}", va.name, vb.name),
                &sum,
                Derivation::new(DerivationKind::Other, &va.name, &vb.name),
            ))
        })();
        report(sink, "Addition", result, |o| format!("Created {}", o.name()))
    }

    pub fn subtract(
        &self,
        a: &SceneObject,
        b: &SceneObject,
        sink: &mut impl NotificationSink,
    ) -> OperationResult<SceneObject> {
        let result = (|| -> OperationResult<SceneObject> {
            let (va, vb) = (vector_of(a)?, vector_of(b)?);
            let diff = linalg::subtract_vectors(&va.components(), &vb.components())?;
            Ok(self.derived_vector(
                format!("{}-{}", va.name, vb.name),
                &diff,
                Derivation::new(DerivationKind::Other, &va.name, &vb.name),
            ))
        })();
        report(sink, "Subtraction", result, |o| format!("Created {}", o.name()))
    }

    pub fn dot(
        &self,
        a: &SceneObject,
        b: &SceneObject,
        sink: &mut impl NotificationSink,
    ) -> OperationResult<f64> {
        let result = (|| -> OperationResult<f64> {
            let (va, vb) = (vector_of(a)?, vector_of(b)?);
            Ok(linalg::dot_product(&va.components(), &vb.components())?)
        })();
        report(sink, "Dot product", result, |d| {
            format!("{} · {} = {d}", a.name(), b.name())
        })
    }

    pub fn cross(
        &self,
        a: &SceneObject,
        b: &SceneObject,
        sink: &mut impl NotificationSink,
    ) -> OperationResult<SceneObject> {
        let result = (|| -> OperationResult<SceneObject> {
            let (va, vb) = (vector_of(a)?, vector_of(b)?);
            let c = linalg::cross_product(&va.components(), &vb.components())?;
            Ok(self.derived_vector(
                format!("{}x{}", va.name, vb.name),
                &c,
                Derivation::new(DerivationKind::CrossProduct, &va.name, &vb.name),
            ))
        })();
        report(sink, "Cross product", result, |o| format!("Created {}", o.name()))
    }

    pub fn invert(
        &self,
        m: &SceneObject,
        sink: &mut impl NotificationSink,
    ) -> OperationResult<SceneObject> {
        let result = (|| -> OperationResult<SceneObject> {
            let values = linalg::invert_matrix(matrix_of(m)?)?;
            let name = format!("inv({})", m.name());
            Ok(SceneObject::Matrix(MatrixObject {
                id: ObjectId::new(mint_id(&name)),
                name,
                values,
                color: self.palette.matrix.clone(),
                visible: true,
            }))
        })();
        report(sink, "Inversion", result, |o| format!("Created {}", o.name()))
    }

    pub fn eigen(&self, m: &SceneObject, sink: &mut impl NotificationSink) -> OperationResult<Eigen> {
        let result = matrix_of(m).and_then(|values| Ok(linalg::calculate_eigen(values)?));
        report(sink, "Eigen-decomposition", result, |e| {
            format!("{} has {} real eigenvalues", m.name(), e.eigenvalues.len())
        })
    }

    /// `obj` with the matrix in `m` applied.
    pub fn transform(
        &self,
        obj: &SceneObject,
        m: &SceneObject,
        sink: &mut impl NotificationSink,
    ) -> OperationResult<SceneObject> {
        let result = matrix_of(m)
            .and_then(|values| Ok(linalg::apply_transform_to_object(obj, values)?));
        report(sink, "Transform", result, |o| {
            format!("Transformed {} by {}", o.name(), m.name())
        })
    }

    /// Apply `m` to every vector and point in `objects`. Objects the matrix
    /// cannot transform are returned unchanged.
    pub fn apply_scene_transform(
        &self,
        objects: &BTreeMap<ObjectId, SceneObject>,
        m: &SceneObject,
        sink: &mut impl NotificationSink,
    ) -> OperationResult<BTreeMap<ObjectId, SceneObject>> {
        let values = match matrix_of(m) {
            Ok(values) => values,
            Err(err) => return report(sink, "Scene transform", Err(err), |_| String::new()),
        };
        let mut moved = 0;
        let out = objects
            .iter()
            .map(|(id, obj)| {
                let next = match obj {
                    SceneObject::Matrix(_) => obj.clone(),
                    _ => match linalg::apply_transform_to_object(obj, values) {
                        Ok(t) => {
                            moved += 1;
                            t
                        }
                        Err(err) => {
                            warn!("left {} unchanged: {err}", obj.name());
                            obj.clone()
                        }
                    },
                };
                (id.clone(), next)
            })
            .collect();
        report(sink, "Scene transform", Ok(out), |_| {
            format!("Transformed {moved} objects by {}", m.name())
        })
    }

    /// Coordinates of a vector in the active basis, resolved against the
    /// current scene.
    pub fn coordinates_in_basis(
        &self,
        obj: &SceneObject,
        basis: &ActiveBasis,
        objects: &BTreeMap<ObjectId, SceneObject>,
        sink: &mut impl NotificationSink,
    ) -> OperationResult<Vec<f64>> {
        let result = (|| -> OperationResult<Vec<f64>> {
            let v = vector_of(obj)?;
            if !basis.is_set() {
                return Err(OperationError::NoBasis);
            }
            Ok(basis.coordinates_of(&v.components(), objects)?)
        })();
        report(sink, "Basis coordinates", result, |c| {
            let parts: Vec<String> = c.iter().map(|x| format!("{x:.3}")).collect();
            format!("{} = [{}] in the current basis", obj.name(), parts.join(", "))
        })
    }
}
