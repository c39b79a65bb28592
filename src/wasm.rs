//! WebAssembly bindings for soqlkit
//!
//! # Usage from JavaScript
//!
//! ```javascript
//! import init, { validateSoql, composeQuery, importQuery } from 'soqlkit';
//!
//! await init();
//!
//! // Validate against a describe fetched from the org
//! const result = validateSoql('SELECT Name FROM Account WHERE CreatedDate = TODAY', describe);
//! if (!result.ok) {
//!   result.diagnostics.forEach(d => console.warn(d.severity, d.message));
//! }
//!
//! // Keep a visual builder and a text editor in sync
//! const text = composeQuery(state);
//! const imported = importQuery(editedText, state);
//! if (imported.success) {
//!   state = imported.state;
//! }
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::builder::BuilderState;
use crate::composer::{compose_query, quote_value};
use crate::importer::import_query;
use crate::parser::parse_query_parts;
use crate::schema::{demo_describe, SObjectDescribe, DEMO_OBJECTS};
use crate::validator::{SoqlValidator, ValidatorConfig};

/// Helper to serialize values as plain JS objects (not Maps)
fn to_js_value<T: Serialize>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

fn builder_state(value: JsValue) -> Result<BuilderState, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(BuilderState::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid builder state: {}", e)))
}

fn describe(value: JsValue) -> Result<Option<SObjectDescribe>, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| JsValue::from_str(&format!("Invalid describe: {}", e)))
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Split a query into its clauses
///
/// Returns the parsed parts: `objectName`, `selectFields`, `filters`,
/// `groupByFields`, `orderByFields`, `limit`, `offset` and flags.
#[wasm_bindgen(js_name = parseSoql)]
pub fn parse_soql(query: &str) -> JsValue {
    to_js_value(&parse_query_parts(query))
}

/// Validate a query against an optional describe
///
/// Returns a JSON object with:
/// - `ok`: boolean
/// - `messages`: one string per finding
/// - `diagnostics`: `{ severity, message }` per finding
/// - `parts`: the parsed query
#[wasm_bindgen(js_name = validateSoql)]
pub fn validate_soql(query: &str, describe_json: JsValue, options: JsValue) -> JsValue {
    let describe = match describe(describe_json) {
        Ok(describe) => describe,
        Err(e) => return e,
    };
    let options: serde_json::Value = serde_wasm_bindgen::from_value(options).unwrap_or_default();
    let flag = |name: &str| options[name].as_bool();

    let defaults = ValidatorConfig::default();
    let config = ValidatorConfig {
        require_describe: flag("requireDescribe").unwrap_or(defaults.require_describe),
        check_value_types: flag("checkValueTypes").unwrap_or(defaults.check_value_types),
        warn_id_semi_join: flag("warnIdSemiJoin").unwrap_or(defaults.warn_id_semi_join),
    };

    let result = SoqlValidator::new(config).validate(query, describe.as_ref());
    let diagnostics: Vec<serde_json::Value> = result
        .diagnostics
        .iter()
        .map(|d| {
            serde_json::json!({
                "severity": d.severity(),
                "message": d.to_string(),
            })
        })
        .collect();

    to_js_value(&serde_json::json!({
        "ok": result.ok,
        "messages": result.messages,
        "diagnostics": diagnostics,
        "parts": result.parts,
    }))
}

/// Compose query text from builder state; empty while no object is set
#[wasm_bindgen(js_name = composeQuery)]
pub fn compose(state: JsValue) -> Result<String, JsValue> {
    Ok(compose_query(&builder_state(state)?))
}

/// Import free-typed query text into builder state
///
/// Returns `{ success: true, state, report }` or
/// `{ success: false, error }`; on failure the caller keeps its state.
#[wasm_bindgen(js_name = importQuery)]
pub fn import(text: &str, previous: JsValue) -> JsValue {
    let previous = match builder_state(previous) {
        Ok(state) => state,
        Err(e) => return e,
    };
    match import_query(text, &previous) {
        Ok((state, report)) => to_js_value(&serde_json::json!({
            "success": true,
            "state": state,
            "report": report,
            "lossless": report.is_lossless(),
        })),
        Err(e) => to_js_value(&serde_json::json!({
            "success": false,
            "error": e.to_string(),
        })),
    }
}

/// Render a single literal for a WHERE clause
#[wasm_bindgen(js_name = quoteValue)]
pub fn quote(value: Option<String>) -> String {
    quote_value(value.as_deref())
}

/// Describe of a built-in demo object, or `null`
#[wasm_bindgen(js_name = demoDescribe)]
pub fn demo(name: &str) -> JsValue {
    match demo_describe(name) {
        Some(describe) => to_js_value(&describe),
        None => JsValue::NULL,
    }
}

#[wasm_bindgen(js_name = demoObjectNames)]
pub fn demo_object_names() -> JsValue {
    to_js_value(&DEMO_OBJECTS)
}
