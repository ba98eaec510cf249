//! The persisted form of a scene.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vectra_types::scene::{ObjectId, SceneObject, VisualizationMode};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed scene document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("basis refers to missing object '{0}'")]
    DanglingBasis(ObjectId),

    #[error("two objects are named '{0}'")]
    DuplicateName(String),
}

/// Everything needed to restore a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub basis: Vec<ObjectId>,
    #[serde(default)]
    pub visualization_mode: VisualizationMode,
    #[serde(default)]
    pub script: String,
}

impl SceneDocument {
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and check a document: names are unique and the basis only
    /// refers to objects that exist.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: SceneDocument = serde_json::from_str(json)?;
        let mut names = std::collections::BTreeSet::new();
        for obj in &doc.objects {
            if !names.insert(obj.name()) {
                return Err(DocumentError::DuplicateName(obj.name().to_string()));
            }
        }
        if let Some(missing) = doc
            .basis
            .iter()
            .find(|id| !doc.objects.iter().any(|o| o.id() == *id))
        {
            return Err(DocumentError::DanglingBasis(missing.clone()));
        }
        Ok(doc)
    }

    /// The name-keyed snapshot an evaluation pass starts from.
    pub fn object_snapshot(&self) -> BTreeMap<String, SceneObject> {
        self.objects
            .iter()
            .map(|o| (o.name().to_string(), o.clone()))
            .collect()
    }

    /// The id-keyed view used by basis and scene operations.
    pub fn objects_by_id(&self) -> BTreeMap<ObjectId, SceneObject> {
        self.objects
            .iter()
            .map(|o| (o.id().clone(), o.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectra_types::scene::VectorObject;

    fn doc() -> SceneDocument {
        SceneDocument {
            objects: vec![
                SceneObject::Vector(VectorObject::from_origin(
                    ObjectId::from("id-a"),
                    "a",
                    [1.0, 0.0, 0.0],
                    "#ff0000",
                )),
                SceneObject::Vector(VectorObject::from_origin(
                    ObjectId::from("id-b"),
                    "b",
                    [0.0, 1.0, 0.0],
                    "#ff0000",
                )),
            ],
            basis: vec![ObjectId::from("id-a"), ObjectId::from("id-b")],
            visualization_mode: VisualizationMode::Parallelogram,
            script: "a = [1, 0, 0]\nb = [0, 1, 0]".into(),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let original = doc();
        let json = original.to_json().unwrap();
        assert!(json.contains("\"visualizationMode\":\"parallelogram\""));
        assert_eq!(SceneDocument::from_json(&json).unwrap(), original);
    }

    #[test]
    fn test_snapshot_is_keyed_by_name() {
        let snapshot = doc().object_snapshot();
        assert_eq!(snapshot["a"].id(), &ObjectId::from("id-a"));
        assert_eq!(doc().objects_by_id().len(), 2);
    }

    #[test]
    fn test_dangling_basis() {
        let mut d = doc();
        d.basis.push(ObjectId::from("ghost"));
        let json = d.to_json().unwrap();
        assert!(matches!(
            SceneDocument::from_json(&json),
            Err(DocumentError::DanglingBasis(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SceneDocument::from_json("{\"objects\": 1}"),
            Err(DocumentError::Json(_))
        ));
    }
}
