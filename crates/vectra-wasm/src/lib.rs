//! Vectra evaluation engine as a WASM module for browser environments.
//!
//! This crate exposes script evaluation and the standalone linear-algebra
//! operations via `wasm-bindgen`, suitable for running in a Web Worker.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { evaluate } from 'vectra-wasm';
//!
//! await init();
//!
//! const result = JSON.parse(evaluate("a = [1, 0, 0]\nb = a * 2", "{}", "tip-to-tail"));
//! // { new_objects: { "obj-...": { type: "vector", ... } }, temp_objects: [], errors: {} }
//! ```

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use vectra_eval::{SceneObject, VisualizationMode};
use vectra_linalg::{LinalgResult, Response};
use vectra_types::MatrixValue;
use wasm_bindgen::prelude::*;

/// Evaluate a script against the current scene.
///
/// `objects_json` is a JSON object of scene objects keyed by name (an empty
/// string counts as no objects). `mode` is `"none"`, `"tip-to-tail"` or
/// `"parallelogram"`.
///
/// Returns a JSON `EvaluationResult`:
/// ```json
/// { "new_objects": { ... }, "temp_objects": [ ... ], "errors": { "line-1": "E201 at 2:5: ..." } }
/// ```
///
/// Malformed `objects_json` or an unknown mode yields `{"error": "..."}`.
#[wasm_bindgen]
pub fn evaluate(script: &str, objects_json: &str, mode: &str) -> String {
    let run = || -> Result<_, String> {
        let existing = parse_objects(objects_json)?;
        let mode = parse_mode(mode)?;
        Ok(vectra_eval::evaluate(script, &existing, mode))
    };
    match run() {
        Ok(result) => to_json(&result),
        Err(message) => error_json(&message),
    }
}

/// [`evaluate`] over JS values instead of JSON strings.
#[wasm_bindgen(js_name = evaluateJs)]
pub fn evaluate_js(script: &str, objects: JsValue, mode: &str) -> Result<JsValue, JsValue> {
    let existing: BTreeMap<String, SceneObject> = if objects.is_null() || objects.is_undefined() {
        BTreeMap::new()
    } else {
        serde_wasm_bindgen::from_value(objects)?
    };
    let mode = parse_mode(mode).map_err(|message| JsValue::from_str(&message))?;
    let result = vectra_eval::evaluate(script, &existing, mode);
    Ok(serde_wasm_bindgen::to_value(&result)?)
}

/// Return the engine version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ── Linear algebra ──────────────────────────────────────────────────
//
// Each takes JSON arrays and returns `{"status": ..., "payload": ...}`.

/// `vectors_json`: `[[1,0,0],[2,0,0]]`. Payload is `true` when dependent.
#[wasm_bindgen(js_name = checkLinearDependency)]
pub fn check_linear_dependency(vectors_json: &str) -> String {
    respond(vectors_json, |vectors: Vec<Vec<f64>>| {
        Ok(vectra_linalg::check_linear_dependency(&vectors))
    })
}

/// `matrix_json`: rows, e.g. `[[1,2],[3,4]]`.
#[wasm_bindgen(js_name = invertMatrix)]
pub fn invert_matrix(matrix_json: &str) -> String {
    respond(matrix_json, |m: MatrixValue| vectra_linalg::invert_matrix(&m))
}

/// Payload is `{"eigenvalues": [...], "eigenvectors": [[...], ...]}`.
#[wasm_bindgen(js_name = calculateEigen)]
pub fn calculate_eigen(matrix_json: &str) -> String {
    respond(matrix_json, |m: MatrixValue| vectra_linalg::calculate_eigen(&m))
}

#[wasm_bindgen(js_name = coordinatesInBasis)]
pub fn coordinates_in_basis(vector_json: &str, basis_json: &str) -> String {
    let basis: Vec<Vec<f64>> = match parse(basis_json) {
        Ok(basis) => basis,
        Err(message) => return error_json(&message),
    };
    respond(vector_json, |vector: Vec<f64>| {
        vectra_linalg::get_vector_coordinates_in_basis(&vector, &basis)
    })
}

// ── Helpers ─────────────────────────────────────────────────────────

fn parse<T: DeserializeOwned>(json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid input: {e}"))
}

fn parse_objects(json: &str) -> Result<BTreeMap<String, SceneObject>, String> {
    if json.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(json).map_err(|e| format!("invalid scene objects: {e}"))
}

fn parse_mode(mode: &str) -> Result<VisualizationMode, String> {
    serde_json::from_value(serde_json::Value::String(mode.to_string()))
        .map_err(|_| format!("unknown visualization mode '{mode}'"))
}

fn respond<I, T>(input: &str, op: impl FnOnce(I) -> LinalgResult<T>) -> String
where
    I: DeserializeOwned,
    T: Serialize,
{
    match parse(input) {
        Ok(input) => to_json(&Response::from(op(input))),
        Err(message) => error_json(&message),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| error_json(&format!("Serialization error: {e}")))
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
