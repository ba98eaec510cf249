//! End-to-end evaluation passes: object creation, identity across passes,
//! per-line failures, derivations, and visualization hints.

use std::collections::BTreeMap;

use vectra_eval::{evaluate, Engine, EngineConfig, EvaluationResult, LineId, SceneObject, VisualizationMode};
use vectra_types::scene::{DerivationKind, ObjectId, PointObject, VectorObject};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn run(script: &str) -> EvaluationResult {
    init_logging();
    evaluate(script, &BTreeMap::new(), VisualizationMode::TipToTail)
}

/// Turn a result into the name-keyed snapshot the next pass receives.
fn snapshot(result: &EvaluationResult) -> BTreeMap<String, SceneObject> {
    result
        .new_objects
        .values()
        .map(|o| (o.name().to_string(), o.clone()))
        .collect()
}

fn vector_end(result: &EvaluationResult, name: &str) -> [f64; 3] {
    result
        .object_named(name)
        .and_then(SceneObject::as_vector)
        .unwrap_or_else(|| panic!("no vector named {name}"))
        .end()
}

fn names(result: &EvaluationResult) -> Vec<String> {
    let mut names: Vec<String> = result.new_objects.values().map(|o| o.name().to_string()).collect();
    names.sort();
    names
}

// ─────────────────────────────────────────────────────────────────────
// Objects
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_one_object_per_assigned_name() {
    let result = run("a = [1, 0, 0]\nb = [0, 1]\nM = [1, 2; 3, 4]\na = [2, 0, 0]");
    assert!(result.errors.is_empty());
    assert_eq!(names(&result), vec!["M", "a", "b"]);
    assert_eq!(vector_end(&result, "a"), [2.0, 0.0, 0.0]);
    assert_eq!(vector_end(&result, "b"), [0.0, 1.0, 0.0]);
    assert_eq!(result.object_named("M").unwrap().kind_name(), "matrix");
}

#[test]
fn test_scalars_and_long_vectors_are_not_materialized() {
    let result = run("k = 3\nw = [1, 2, 3, 4]\nv = [1, 0, 0] * k");
    assert!(result.errors.is_empty());
    assert_eq!(names(&result), vec!["v"]);
    assert_eq!(vector_end(&result, "v"), [3.0, 0.0, 0.0]);
}

#[test]
fn test_reassigning_to_scalar_drops_object() {
    let result = run("a = [1, 0, 0]\na = 5");
    assert!(result.new_objects.is_empty());
}

#[test]
fn test_bare_expression_creates_nothing() {
    let result = run("[1, 2, 3]\n1 + 2");
    assert!(result.new_objects.is_empty());
    assert!(result.errors.is_empty());
}

#[test]
fn test_snapshot_values_are_visible_to_script() {
    init_logging();
    let mut existing = BTreeMap::new();
    existing.insert(
        "u".to_string(),
        SceneObject::Vector(VectorObject::new(
            ObjectId::from("u-id"),
            "u",
            [1.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            "#ff0000",
        )),
    );
    existing.insert(
        "p".to_string(),
        SceneObject::Point(PointObject {
            id: ObjectId::from("p-id"),
            name: "p".into(),
            position: [1.0, 2.0, 3.0],
            color: "#ffffff".into(),
            visible: true,
        }),
    );
    let result = evaluate("w = u * 2\nq = p", &existing, VisualizationMode::None);
    assert_eq!(vector_end(&result, "w"), [2.0, 0.0, 0.0]);
    assert!(result.error_for(1).unwrap().starts_with("E200"));
}

// ─────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_evaluation_is_idempotent() {
    let script = "a = [1, 0, 0]\nb = [0, 1, 0]\nc = a * b\nM = [1, 0; 0, 1]";
    let first = run(script);
    let second = run(script);
    assert_eq!(first.new_objects, second.new_objects);
}

#[test]
fn test_ids_survive_reevaluation() {
    let first = run("a = [1, 0, 0]\nb = [0, 1, 0]");
    let id_a = first.object_named("a").unwrap().id().clone();

    let second = evaluate(
        "a = [5, 5, 0]\nb = [0, 1, 0]\nc = a + b",
        &snapshot(&first),
        VisualizationMode::None,
    );
    assert_eq!(second.object_named("a").unwrap().id(), &id_a);
    assert_eq!(vector_end(&second, "a"), [5.0, 5.0, 0.0]);
    assert!(second.object_named("c").is_some());
}

#[test]
fn test_color_and_visibility_survive_reevaluation() {
    let first = run("a = [1, 0, 0]");
    let mut snap = snapshot(&first);
    if let Some(SceneObject::Vector(v)) = snap.get_mut("a") {
        v.color = "#123456".into();
        v.visible = false;
    }
    let second = evaluate("a = [0, 0, 1]", &snap, VisualizationMode::None);
    let a = second.object_named("a").unwrap();
    assert_eq!(a.color(), "#123456");
    assert!(!a.visible());
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_syntax_error_is_isolated_to_its_line() {
    let result = run("a = [1, 0, 0]\nb = (1 +\nc = [0, 0, 1]");
    assert_eq!(names(&result), vec!["a", "c"]);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors.contains_key(&LineId(1)));
}

#[test]
fn test_evaluation_error_is_isolated_to_its_line() {
    let result = run("a = [1, 0, 0]\nb = a + [1, 0]\nc = a * 2");
    assert_eq!(names(&result), vec!["a", "c"]);
    let message = result.error_for(1).unwrap();
    assert!(message.starts_with("E201 at 2:"), "got {message}");
}

#[test]
fn test_overlong_line_fails_alone() {
    let script = format!(
        "a = [1, 0, 0]\nx = 1{}\nb = a * 2\ny = 1{}",
        "+1".repeat(3000),
        "+1".repeat(200)
    );
    let result = run(&script);
    assert_eq!(result.errors.len(), 1);
    assert!(result.error_for(1).unwrap().starts_with("E104"));
    assert_eq!(vector_end(&result, "b"), [2.0, 0.0, 0.0]);
}

#[test]
fn test_later_lines_cannot_see_failed_names() {
    let result = run("a = 1 / 0\nb = a + 1");
    assert!(result.error_for(0).unwrap().starts_with("E206"));
    assert!(result.error_for(1).unwrap().contains("undefined variable 'a'"));
}

#[test]
fn test_error_keys_are_line_ids() {
    let result = run("\n\nx = nope");
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["errors"]["line-2"].is_string());
}

// ─────────────────────────────────────────────────────────────────────
// Derivations
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_cross_product_is_tagged() {
    let result = run("a = [1, 0, 0]\nb = [0, 1, 0]\nc = a * b");
    let c = result.object_named("c").and_then(SceneObject::as_vector).unwrap();
    assert_eq!(c.end(), [0.0, 0.0, 1.0]);
    let derivation = c.derivation.as_ref().unwrap();
    assert_eq!(derivation.kind, DerivationKind::CrossProduct);
    assert_eq!(derivation.operands, ["a".to_string(), "b".to_string()]);
    assert_eq!(c.color, "#ff00ff");
}

#[test]
fn test_cross_color_is_dropped_with_the_derivation() {
    let first = run("a = [1, 0, 0]\nb = [0, 1, 0]\nc = a * b");
    assert_eq!(first.object_named("c").unwrap().color(), "#ff00ff");

    let second = evaluate(
        "a = [1, 0, 0]\nb = [0, 1, 0]\nc = a + b",
        &snapshot(&first),
        VisualizationMode::None,
    );
    let c = second.object_named("c").and_then(SceneObject::as_vector).unwrap();
    assert!(c.derivation.is_none());
    assert_eq!(c.color, "#ff0000");
    assert_eq!(&c.id, first.object_named("c").unwrap().id());
}

#[test]
fn test_other_results_have_no_derivation() {
    let result = run("a = [1, 0, 0]\nb = [0, 1, 0]\nc = a + b\nd = cross(a, b) * 2");
    for name in ["c", "d"] {
        let v = result.object_named(name).and_then(SceneObject::as_vector).unwrap();
        assert!(v.derivation.is_none(), "{name} should have no derivation");
    }
}

// ─────────────────────────────────────────────────────────────────────
// Visualization hints
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_tip_to_tail_hint_for_sum() {
    let result = run("a = [1, 0, 0]\nb = [0, 1, 0]\nc = a + b");
    assert_eq!(names(&result), vec!["a", "b", "c"]);
    assert_eq!(result.temp_objects.len(), 1);
    let ghost = result.temp_objects[0].as_vector().unwrap();
    assert_eq!(ghost.start(), [1.0, 0.0, 0.0]);
    assert_eq!(ghost.end(), [1.0, 1.0, 0.0]);
    assert!(!result.new_objects.contains_key(&ghost.id));
}

#[test]
fn test_parallelogram_hints() {
    init_logging();
    let result = evaluate(
        "a = [2, 0, 0]\nb = [0, 1, 0]\nc = a + b",
        &BTreeMap::new(),
        VisualizationMode::Parallelogram,
    );
    assert_eq!(result.temp_objects.len(), 2);
    let ends: Vec<[f64; 3]> = result
        .temp_objects
        .iter()
        .map(|o| o.as_vector().unwrap().end())
        .collect();
    assert!(ends.iter().all(|e| *e == [2.0, 1.0, 0.0]));
}

#[test]
fn test_no_hints_when_disabled() {
    init_logging();
    let result = evaluate(
        "a = [1, 0, 0]\nb = [0, 1, 0]\nc = a + b",
        &BTreeMap::new(),
        VisualizationMode::None,
    );
    assert!(result.temp_objects.is_empty());
}

#[test]
fn test_hint_uses_snapshot_geometry() {
    init_logging();
    let mut existing = BTreeMap::new();
    existing.insert(
        "a".to_string(),
        SceneObject::Vector(VectorObject::new(
            ObjectId::from("a-id"),
            "a",
            [1.0, 1.0, 1.0],
            [2.0, 1.0, 1.0],
            "#ff0000",
        )),
    );
    let result = evaluate("b = [0, 1, 0]\nc = a - b", &existing, VisualizationMode::TipToTail);
    let ghost = result.temp_objects[0].as_vector().unwrap();
    assert_eq!(ghost.start(), [2.0, 1.0, 1.0]);
    assert_eq!(ghost.end(), [2.0, 0.0, 1.0]);
}

#[test]
fn test_custom_palette() {
    init_logging();
    let config = EngineConfig::from_json(r##"{"palette": {"vector": "#0000ff", "ghost": "#010101"}}"##).unwrap();
    let engine = Engine::new(config);
    let result = engine.evaluate(
        "a = [1, 0, 0]\nb = [0, 1, 0]\nc = a + b",
        &BTreeMap::new(),
        VisualizationMode::TipToTail,
    );
    assert_eq!(result.object_named("a").unwrap().color(), "#0000ff");
    assert_eq!(result.temp_objects[0].color(), "#010101");
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_evaluation_is_deterministic() {
    let script = "a = [1, 2, 0]\nb = [0, 1, 3]\nc = a + b\nd = a * b\nbad = a +\nM = [1, 2; 3, 4]\nN = inv(M)";
    let first = run(script);
    for i in 0..100 {
        assert_eq!(first, run(script), "Determinism failure at iteration {i}");
    }
}
