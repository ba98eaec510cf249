//! Turning evaluated values into scene objects.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use vectra_types::scene::{
    Derivation, DerivationKind, MatrixObject, ObjectId, SceneObject, VectorObject,
};
use vectra_types::Value;

use crate::config::Palette;

/// Name → id registry for one pass.
///
/// Seeded from the snapshot so an unchanged name keeps its id; a name seen
/// for the first time gets an id derived from the name itself, so the same
/// script always produces the same ids.
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    ids: BTreeMap<String, ObjectId>,
}

impl IdRegistry {
    pub fn from_snapshot(existing: &BTreeMap<String, SceneObject>) -> Self {
        let ids = existing
            .iter()
            .map(|(name, obj)| (name.clone(), obj.id().clone()))
            .collect();
        Self { ids }
    }

    pub fn get(&self, name: &str) -> Option<&ObjectId> {
        self.ids.get(name)
    }

    /// The id for `name`, minting one if the name is new.
    pub fn id_for(&mut self, name: &str) -> ObjectId {
        if let Some(id) = self.ids.get(name) {
            return id.clone();
        }
        let base = mint_id(name);
        let mut candidate = base.clone();
        let mut n = 1;
        while self.ids.values().any(|id| id.as_str() == candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        let id = ObjectId::new(candidate);
        self.ids.insert(name.to_string(), id.clone());
        id
    }
}

/// `obj-` followed by the first 12 hex digits of the name's SHA-256.
pub fn mint_id(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    let hex: String = digest.iter().take(6).map(|b| format!("{b:02x}")).collect();
    format!("obj-{hex}")
}

/// Builds scene objects for one pass.
pub struct Materializer<'a> {
    palette: &'a Palette,
    snapshot: &'a BTreeMap<String, SceneObject>,
    pub registry: IdRegistry,
}

impl<'a> Materializer<'a> {
    pub fn new(palette: &'a Palette, snapshot: &'a BTreeMap<String, SceneObject>) -> Self {
        Self {
            palette,
            snapshot,
            registry: IdRegistry::from_snapshot(snapshot),
        }
    }

    /// Build the object for `name = value`, or `None` when the value has
    /// no scene representation (scalars, vectors longer than 3).
    ///
    /// `produced` holds the objects built earlier in this pass; an object of
    /// the same name there (else in the snapshot) donates its color and
    /// visibility when it has the same kind.
    pub fn materialize(
        &mut self,
        name: &str,
        value: &Value,
        derivation: Option<Derivation>,
        produced: &BTreeMap<ObjectId, SceneObject>,
    ) -> Option<SceneObject> {
        match value {
            Value::Scalar(_) => None,
            Value::Vector(v) if v.len() > 3 => None,
            Value::Vector(v) => {
                let mut components = [0.0; 3];
                components[..v.len()].copy_from_slice(v);
                let id = self.registry.id_for(name);
                let prior = self.prior(name, &id, produced).and_then(SceneObject::as_vector);

                let mut vector =
                    VectorObject::from_origin(id, name, components, self.palette.vector.clone());
                if let Some(prior) = prior {
                    // The cross color belongs to the derivation, not the name.
                    if !is_cross_product(prior.derivation.as_ref()) {
                        vector.color = prior.color.clone();
                    }
                    vector.visible = prior.visible;
                }
                if let Some(derivation) = derivation {
                    if is_cross_product(Some(&derivation)) {
                        vector.color = self.palette.cross_product.clone();
                    }
                    vector = vector.with_derivation(derivation);
                }
                Some(SceneObject::Vector(vector))
            }
            Value::Matrix(m) => {
                let id = self.registry.id_for(name);
                let prior = self.prior(name, &id, produced).and_then(SceneObject::as_matrix);
                let (color, visible) = prior
                    .map(|p| (p.color.clone(), p.visible))
                    .unwrap_or_else(|| (self.palette.matrix.clone(), true));
                Some(SceneObject::Matrix(MatrixObject {
                    id,
                    name: name.to_string(),
                    values: m.clone(),
                    color,
                    visible,
                }))
            }
        }
    }

    fn prior<'p>(
        &'p self,
        name: &str,
        id: &ObjectId,
        produced: &'p BTreeMap<ObjectId, SceneObject>,
    ) -> Option<&'p SceneObject> {
        produced.get(id).or_else(|| self.snapshot.get(name))
    }
}

fn is_cross_product(derivation: Option<&Derivation>) -> bool {
    derivation.is_some_and(|d| d.kind == DerivationKind::CrossProduct)
}
