//! The active display basis.

use std::collections::BTreeMap;

use log::{info, warn};
use thiserror::Error;
use vectra_linalg::{
    check_linear_dependency, get_vector_coordinates_in_basis, LinalgError, LinalgResult,
};
use vectra_types::scene::{ObjectId, SceneObject};

use crate::notify::NotificationSink;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BasisError {
    #[error("a basis needs 2 or 3 vectors, got {0}")]
    WrongCount(usize),

    #[error("object '{0}' does not exist")]
    NotFound(ObjectId),

    #[error("'{0}' is not a vector")]
    NotAVector(String),

    #[error("basis vectors must be linearly independent")]
    LinearlyDependent,
}

/// An ordered set of 2 or 3 linearly independent vectors, or nothing.
///
/// Only [`ActiveBasis::set_basis`] can install a basis, and it refuses any
/// set that would break the invariant. The basis holds ids only; geometry is
/// looked up in the scene each time it is used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveBasis {
    ids: Vec<ObjectId>,
}

impl ActiveBasis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn is_set(&self) -> bool {
        !self.ids.is_empty()
    }

    /// Validate and install a new basis. On rejection the previous basis is
    /// left as it was. Either way the outcome is reported to `sink`.
    pub fn set_basis(
        &mut self,
        ids: &[ObjectId],
        objects: &BTreeMap<ObjectId, SceneObject>,
        sink: &mut impl NotificationSink,
    ) -> Result<(), BasisError> {
        match Self::validate(ids, objects) {
            Ok(()) => {
                self.ids = ids.to_vec();
                info!("basis set to {} vectors", self.ids.len());
                sink.success(format!("Basis set ({} vectors)", self.ids.len()));
                Ok(())
            }
            Err(err) => {
                warn!("basis rejected: {err}");
                sink.error(format!("Invalid basis: {err}"));
                Err(err)
            }
        }
    }

    fn validate(
        ids: &[ObjectId],
        objects: &BTreeMap<ObjectId, SceneObject>,
    ) -> Result<(), BasisError> {
        if !(2..=3).contains(&ids.len()) {
            return Err(BasisError::WrongCount(ids.len()));
        }
        let vectors = ids
            .iter()
            .map(|id| match objects.get(id) {
                Some(SceneObject::Vector(v)) => Ok(v.components().to_vec()),
                Some(other) => Err(BasisError::NotAVector(other.name().to_string())),
                None => Err(BasisError::NotFound(id.clone())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        if check_linear_dependency(&vectors) {
            return Err(BasisError::LinearlyDependent);
        }
        Ok(())
    }

    /// Coordinates of `components` in the active basis, using the current
    /// geometry of the basis vectors in `objects`.
    ///
    /// Fails with `InvalidBasis` when no basis is set, or when a basis
    /// vector has since been removed or stopped being a vector.
    pub fn coordinates_of(
        &self,
        components: &[f64],
        objects: &BTreeMap<ObjectId, SceneObject>,
    ) -> LinalgResult<Vec<f64>> {
        if self.ids.is_empty() {
            return Err(LinalgError::InvalidBasis("no basis is set".to_string()));
        }
        let vectors = self
            .ids
            .iter()
            .map(|id| match objects.get(id) {
                Some(SceneObject::Vector(v)) => Ok(v.components().to_vec()),
                _ => Err(LinalgError::InvalidBasis(format!(
                    "basis vector '{id}' is no longer in the scene"
                ))),
            })
            .collect::<LinalgResult<Vec<_>>>()?;
        get_vector_coordinates_in_basis(components, &vectors)
    }

    /// Return to the standard basis.
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Notification, NotificationLevel};
    use vectra_types::scene::{MatrixObject, VectorObject};
    use vectra_types::MatrixValue;

    fn scene() -> BTreeMap<ObjectId, SceneObject> {
        let mut objects = BTreeMap::new();
        for (id, c) in [
            ("x", [1.0, 0.0, 0.0]),
            ("y", [0.0, 1.0, 0.0]),
            ("z", [0.0, 0.0, 1.0]),
            ("x2", [2.0, 0.0, 0.0]),
        ] {
            objects.insert(
                ObjectId::from(id),
                SceneObject::Vector(VectorObject::from_origin(ObjectId::from(id), id, c, "#ff0000")),
            );
        }
        objects.insert(
            ObjectId::from("M"),
            SceneObject::Matrix(MatrixObject {
                id: ObjectId::from("M"),
                name: "M".into(),
                values: MatrixValue::identity(3),
                color: "#00ff00".into(),
                visible: true,
            }),
        );
        objects
    }

    fn ids(names: &[&str]) -> Vec<ObjectId> {
        names.iter().map(|n| ObjectId::from(*n)).collect()
    }

    #[test]
    fn test_accepts_independent_vectors() {
        let mut basis = ActiveBasis::new();
        let mut sink: Vec<Notification> = Vec::new();
        let objects = scene();
        basis.set_basis(&ids(&["x", "y"]), &objects, &mut sink).unwrap();
        assert_eq!(basis.ids(), ids(&["x", "y"]).as_slice());
        assert_eq!(sink[0].level, NotificationLevel::Success);
        assert_eq!(basis.coordinates_of(&[3.0, 4.0, 0.0], &objects).unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_rejections_keep_previous_basis() {
        let objects = scene();
        let mut basis = ActiveBasis::new();
        let mut sink: Vec<Notification> = Vec::new();
        basis.set_basis(&ids(&["x", "y", "z"]), &objects, &mut sink).unwrap();

        let cases = [
            (ids(&["x", "y", "z", "x2"]), BasisError::WrongCount(4)),
            (ids(&["x"]), BasisError::WrongCount(1)),
            (ids(&["x", "nope"]), BasisError::NotFound(ObjectId::from("nope"))),
            (ids(&["x", "M"]), BasisError::NotAVector("M".into())),
            (ids(&["x", "x2"]), BasisError::LinearlyDependent),
        ];
        for (attempt, expected) in cases {
            assert_eq!(basis.set_basis(&attempt, &objects, &mut sink), Err(expected));
            assert_eq!(basis.ids(), ids(&["x", "y", "z"]).as_slice());
        }
        assert_eq!(sink.len(), 6);
        assert!(sink[1..].iter().all(|n| n.level == NotificationLevel::Error));
    }

    #[test]
    fn test_clear() {
        let mut basis = ActiveBasis::new();
        let mut sink: Vec<Notification> = Vec::new();
        let objects = scene();
        basis.set_basis(&ids(&["x", "y"]), &objects, &mut sink).unwrap();
        basis.clear();
        assert!(!basis.is_set());
        assert!(basis.coordinates_of(&[1.0, 0.0, 0.0], &objects).is_err());
    }

    #[test]
    fn test_coordinates_follow_moved_basis_vectors() {
        let mut objects = scene();
        let mut basis = ActiveBasis::new();
        let mut sink: Vec<Notification> = Vec::new();
        basis.set_basis(&ids(&["x", "y"]), &objects, &mut sink).unwrap();

        // `x` is re-evaluated to twice its length.
        objects.insert(
            ObjectId::from("x"),
            SceneObject::Vector(VectorObject::from_origin(
                ObjectId::from("x"),
                "x",
                [2.0, 0.0, 0.0],
                "#ff0000",
            )),
        );
        assert_eq!(basis.coordinates_of(&[4.0, 1.0, 0.0], &objects).unwrap(), vec![2.0, 1.0]);

        objects.remove(&ObjectId::from("y"));
        assert_eq!(
            basis.coordinates_of(&[4.0, 1.0, 0.0], &objects).unwrap_err().status(),
            "InvalidBasis"
        );
    }
}
