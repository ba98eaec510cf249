//! One evaluation pass: parse, evaluate line by line, materialize.

use std::collections::BTreeMap;

use log::{debug, warn};
use vectra_parser::parse_script;
use vectra_types::ast::{Expr, ExprKind};
use vectra_types::scene::{
    Derivation, DerivationKind, EvaluationResult, ObjectId, SceneObject, VisualizationMode,
};
use vectra_types::{ScriptSource, Value};

use crate::config::EngineConfig;
use crate::env::SymbolTable;
use crate::evaluator::Evaluator;
use crate::hints::{HintGenerator, Placement};
use crate::materialize::{IdRegistry, Materializer};

/// The evaluation engine.
///
/// Holds configuration only. Every call to [`Engine::evaluate`] starts from
/// the snapshot it is given and returns a complete result; nothing carries
/// over between calls.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a whole script against the current scene objects, keyed by
    /// name.
    ///
    /// A failing line is recorded in `errors` under its 0-based line id and
    /// never stops the lines after it.
    pub fn evaluate(
        &self,
        script: &str,
        existing: &BTreeMap<String, SceneObject>,
        mode: VisualizationMode,
    ) -> EvaluationResult {
        let source = ScriptSource::new(script);
        let parsed = parse_script(script);

        let mut evaluator = Evaluator::new(SymbolTable::from_snapshot(existing));
        let mut materializer = Materializer::new(&self.config.palette, existing);
        let mut hints = HintGenerator::new(mode, self.config.palette.ghost.clone());
        let mut result = EvaluationResult::default();

        for line in parsed.lines {
            let stmt = match line.outcome {
                Ok(stmt) => stmt,
                Err(err) => {
                    warn!("{}: {err}", line.line);
                    result.errors.insert(line.line, err.to_string());
                    continue;
                }
            };

            let executed = match evaluator.execute(&stmt) {
                Ok(executed) => executed,
                Err(err) => {
                    let err = err.to_script_error(&source);
                    warn!("{}: {err}", line.line);
                    result.errors.insert(line.line, err.to_string());
                    continue;
                }
            };
            debug!("{} evaluated to {}", line.line, executed.value.type_name());

            let Some(target) = executed.statement.target() else {
                continue;
            };
            let rhs = executed.statement.value();

            let ghosts = hints.hints_for(rhs, |name| {
                locate(
                    name,
                    &evaluator.symbols,
                    &materializer.registry,
                    &result.new_objects,
                    existing,
                )
            });
            result.temp_objects.extend(ghosts);

            let derivation = cross_derivation(rhs);
            match materializer.materialize(&target.name, &executed.value, derivation, &result.new_objects) {
                Some(object) => {
                    debug!("{} materialized '{}' as {} {}", line.line, target.name, object.kind_name(), object.id());
                    result.new_objects.insert(object.id().clone(), object);
                }
                None => {
                    // The name no longer holds something drawable.
                    if let Some(id) = materializer.registry.get(&target.name) {
                        result.new_objects.remove(id);
                    }
                }
            }
        }

        result
    }
}

/// Evaluate with the default configuration.
pub fn evaluate(
    script: &str,
    existing: &BTreeMap<String, SceneObject>,
    mode: VisualizationMode,
) -> EvaluationResult {
    Engine::default().evaluate(script, existing, mode)
}

/// `cross(x, y)` over two plain names records where the result came from.
fn cross_derivation(rhs: &Expr) -> Option<Derivation> {
    let ExprKind::Call { name, args } = &rhs.kind else {
        return None;
    };
    match (name.name.as_str(), args.as_slice()) {
        ("cross", [a, b]) => Some(Derivation::new(
            DerivationKind::CrossProduct,
            a.as_identifier()?,
            b.as_identifier()?,
        )),
        _ => None,
    }
}

/// Geometry of a name that currently holds a drawable vector: the object
/// built earlier in this pass, else the snapshot object, else the raw
/// components at the origin.
fn locate(
    name: &str,
    symbols: &SymbolTable,
    registry: &IdRegistry,
    produced: &BTreeMap<ObjectId, SceneObject>,
    snapshot: &BTreeMap<String, SceneObject>,
) -> Option<Placement> {
    let Some(Value::Vector(components)) = symbols.get(name) else {
        return None;
    };
    if components.len() > 3 {
        return None;
    }
    let object = registry
        .get(name)
        .and_then(|id| produced.get(id))
        .or_else(|| snapshot.get(name))
        .and_then(SceneObject::as_vector);
    if let Some(v) = object {
        return Some(Placement {
            start: v.start(),
            end: v.end(),
        });
    }
    let mut end = [0.0; 3];
    end[..components.len()].copy_from_slice(components);
    Some(Placement {
        start: [0.0; 3],
        end,
    })
}
