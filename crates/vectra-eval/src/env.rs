//! Symbol table for one evaluation pass.

use std::collections::BTreeMap;

use vectra_parser::{Shape, ShapeLookup};
use vectra_types::scene::SceneObject;
use vectra_types::Value;

/// Name → value bindings, rebuilt from the object snapshot on every pass.
///
/// Later bindings replace earlier ones; there is no scoping.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    bindings: BTreeMap<String, Value>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table with every vector and matrix in the snapshot.
    /// Points carry no value a script can use.
    pub fn from_snapshot(existing: &BTreeMap<String, SceneObject>) -> Self {
        let mut table = Self::new();
        for (name, object) in existing {
            match object {
                SceneObject::Vector(v) => {
                    table.define(name, Value::Vector(v.components().to_vec()));
                }
                SceneObject::Matrix(m) => {
                    table.define(name, Value::Matrix(m.values.clone()));
                }
                SceneObject::Point(_) => {}
            }
        }
        table
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl ShapeLookup for SymbolTable {
    fn shape_of(&self, name: &str) -> Shape {
        match self.get(name) {
            Some(Value::Scalar(_)) => Shape::Scalar,
            Some(Value::Vector(_)) => Shape::Vector,
            Some(Value::Matrix(_)) => Shape::Matrix,
            None => Shape::Unknown,
        }
    }
}
