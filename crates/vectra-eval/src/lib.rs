//! Vectra evaluation engine.
//!
//! ```text
//! script ─► parse ─► per line: desugar → evaluate → bind ─► materialize ─► EvaluationResult
//!                                                     └──► visualization hints (temp objects)
//! ```
//!
//! [`evaluate`] is the entry point used by the scene layer. Everything is
//! synchronous and stateless between calls: a pass starts from the object
//! snapshot it is given and returns a complete result.
//!
//! Direct UI operations live in [`operations`], the basis invariant in
//! [`basis`], and the persisted scene in [`document`].

pub mod basis;
pub mod config;
pub mod document;
mod engine;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod hints;
pub mod materialize;
pub mod notify;
pub mod operations;

pub use basis::{ActiveBasis, BasisError};
pub use config::{EngineConfig, Palette};
pub use document::{DocumentError, SceneDocument};
pub use engine::{evaluate, Engine};
pub use error::{EvalError, EvalResult};
pub use notify::{Notification, NotificationLevel, NotificationSink};
pub use operations::{OperationError, Operations};

pub use vectra_types::scene::{EvaluationResult, LineId, ObjectId, SceneObject, VisualizationMode};
