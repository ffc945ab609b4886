//! WASM bindings for PhLynx Core.
//!
//! This module provides JavaScript-friendly bindings for running the
//! compiler inside the browser-based editor. The project store lives on the
//! JavaScript side of the boundary as a [`WasmProject`]; each compile call
//! takes the current graph export and returns a JSON result object.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmProject } from 'phlynx_core';
//!
//! await init();
//!
//! const project = new WasmProject();
//! project.add_module_file('vessels.xml', vesselsXml);
//! project.add_units_file('circulation.xml', circulationXml);
//! project.set_global_parameter('R_total', '1.5', 'mmHg_s_per_ml');
//!
//! const result = JSON.parse(project.compile(JSON.stringify(graph)));
//! if (result.document) {
//!   download(result.document, result.content_type);
//! } else {
//!   showIssues(result.issues);
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::compiler;
use crate::error::IssueCategory;
use crate::graph::Graph;
use crate::store::ProjectStore;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible project holding module files, unit libraries, and global
/// parameter values between compile calls.
#[wasm_bindgen]
pub struct WasmProject {
    store: ProjectStore,
}

#[wasm_bindgen]
impl WasmProject {
    /// Create an empty project.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmProject {
        WasmProject {
            store: ProjectStore::new(),
        }
    }

    /// Add or replace a module file.
    #[wasm_bindgen]
    pub fn add_module_file(&mut self, filename: &str, source: &str) {
        self.store.add_module_file(filename, source);
    }

    /// Add or replace a unit-library file; catalogue order is call order.
    #[wasm_bindgen]
    pub fn add_units_file(&mut self, filename: &str, source: &str) {
        self.store.add_units_file(filename, source);
    }

    /// Record a global parameter value for a variable name.
    #[wasm_bindgen]
    pub fn set_global_parameter(&mut self, variable_name: &str, value: &str, units: &str) {
        self.store.set_global_parameter(variable_name, value, units);
    }

    /// Compile a graph export against this project.
    ///
    /// # Arguments
    /// * `graph_json` - The editor's graph export as a JSON string
    ///
    /// # Returns
    /// A JSON string with `document` (null on failure), `content_type`,
    /// `issues` (array of strings), and `category` (null on success).
    #[wasm_bindgen]
    pub fn compile(&self, graph_json: &str) -> Result<String, JsValue> {
        let graph: Graph = serde_json::from_str(graph_json)
            .map_err(|e| JsValue::from_str(&format!("invalid graph export: {e}")))?;
        let output = compiler::compile(&graph, &self.store);
        let result = serde_json::json!({
            "document": output.document,
            "content_type": output.content_type,
            "issues": output
                .issues
                .iter()
                .map(|i| i.description.as_str())
                .collect::<Vec<_>>(),
            "category": output.category.map(IssueCategory::as_str),
        });
        Ok(result.to_string())
    }
}

impl Default for WasmProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the media type of compiled model documents.
#[wasm_bindgen]
pub fn model_content_type() -> String {
    compiler::MODEL_CONTENT_TYPE.to_string()
}
