//! Scene object model shared by the engine, the store layer, and persistence.

use crate::MatrixValue;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A 3-component point or direction in scene space.
pub type Vec3 = [f64; 3];

/// Stable identifier of a scene object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Derivation
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DerivationKind {
    CrossProduct,
    Other,
}

/// Provenance of a computed vector. Only affects optional extra rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub kind: DerivationKind,
    pub operands: [String; 2],
}

impl Derivation {
    pub fn new(kind: DerivationKind, left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            kind,
            operands: [left.into(), right.into()],
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Scene objects
// ══════════════════════════════════════════════════════════════════════════════

/// A vector drawn from `start` to `end`.
///
/// `components` is always `end - start`; the only way to move the endpoints
/// is through methods that recompute it, including deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawVector")]
pub struct VectorObject {
    pub id: ObjectId,
    pub name: String,
    start: Vec3,
    end: Vec3,
    components: Vec3,
    pub color: String,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derivation: Option<Derivation>,
}

#[derive(Deserialize)]
struct RawVector {
    id: ObjectId,
    name: String,
    start: Vec3,
    end: Vec3,
    color: String,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default)]
    derivation: Option<Derivation>,
}

fn default_visible() -> bool {
    true
}

impl From<RawVector> for VectorObject {
    fn from(raw: RawVector) -> Self {
        let mut v = VectorObject::new(raw.id, raw.name, raw.start, raw.end, raw.color);
        v.visible = raw.visible;
        v.derivation = raw.derivation;
        v
    }
}

impl VectorObject {
    pub fn new(
        id: ObjectId,
        name: impl Into<String>,
        start: Vec3,
        end: Vec3,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            start,
            end,
            components: sub3(end, start),
            color: color.into(),
            visible: true,
            derivation: None,
        }
    }

    /// A vector anchored at the origin.
    pub fn from_origin(
        id: ObjectId,
        name: impl Into<String>,
        components: Vec3,
        color: impl Into<String>,
    ) -> Self {
        Self::new(id, name, [0.0; 3], components, color)
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    pub fn components(&self) -> Vec3 {
        self.components
    }

    /// Move both endpoints, recomputing the components.
    pub fn set_endpoints(&mut self, start: Vec3, end: Vec3) {
        self.start = start;
        self.end = end;
        self.components = sub3(end, start);
    }

    /// Keep `start`, replace the components, and move `end` to match.
    pub fn set_components(&mut self, components: Vec3) {
        self.end = add3(self.start, components);
        self.components = components;
    }

    pub fn with_derivation(mut self, derivation: Derivation) -> Self {
        self.derivation = Some(derivation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointObject {
    pub id: ObjectId,
    pub name: String,
    pub position: Vec3,
    pub color: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixObject {
    pub id: ObjectId,
    pub name: String,
    pub values: MatrixValue,
    pub color: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

/// Any object that can live in a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneObject {
    Vector(VectorObject),
    Point(PointObject),
    Matrix(MatrixObject),
}

impl SceneObject {
    pub fn id(&self) -> &ObjectId {
        match self {
            SceneObject::Vector(v) => &v.id,
            SceneObject::Point(p) => &p.id,
            SceneObject::Matrix(m) => &m.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SceneObject::Vector(v) => &v.name,
            SceneObject::Point(p) => &p.name,
            SceneObject::Matrix(m) => &m.name,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            SceneObject::Vector(v) => &v.color,
            SceneObject::Point(p) => &p.color,
            SceneObject::Matrix(m) => &m.color,
        }
    }

    pub fn visible(&self) -> bool {
        match self {
            SceneObject::Vector(v) => v.visible,
            SceneObject::Point(p) => p.visible,
            SceneObject::Matrix(m) => m.visible,
        }
    }

    /// `"vector"`, `"point"` or `"matrix"`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SceneObject::Vector(_) => "vector",
            SceneObject::Point(_) => "point",
            SceneObject::Matrix(_) => "matrix",
        }
    }

    pub fn as_vector(&self) -> Option<&VectorObject> {
        match self {
            SceneObject::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&MatrixObject> {
        match self {
            SceneObject::Matrix(m) => Some(m),
            _ => None,
        }
    }
}

pub fn add3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

// ══════════════════════════════════════════════════════════════════════════════
// Evaluation pass types
// ══════════════════════════════════════════════════════════════════════════════

/// How vector sums are illustrated with temporary ghost objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationMode {
    None,
    #[default]
    TipToTail,
    Parallelogram,
}

/// 0-based index of a script line, rendered as `line-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub usize);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line-{}", self.0)
    }
}

impl Serialize for LineId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LineId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.strip_prefix("line-")
            .and_then(|n| n.parse().ok())
            .map(LineId)
            .ok_or_else(|| D::Error::custom(format!("invalid line id '{raw}'")))
    }
}

/// Everything one evaluation pass produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub new_objects: BTreeMap<ObjectId, SceneObject>,
    pub temp_objects: Vec<SceneObject>,
    pub errors: BTreeMap<LineId, String>,
}

impl EvaluationResult {
    /// Find a materialized object by its script name.
    pub fn object_named(&self, name: &str) -> Option<&SceneObject> {
        self.new_objects.values().find(|o| o.name() == name)
    }

    pub fn error_for(&self, line: usize) -> Option<&str> {
        self.errors.get(&LineId(line)).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
