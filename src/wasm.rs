//! WASM bindings for deptree.
//!
//! Exposes `render` and `renderWithOptions` to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::RenderConfig;

/// Render an edge list to Unicode text with default settings.
#[wasm_bindgen]
pub fn render(src: &str) -> Result<String, JsError> {
    crate::render_edge_list(src, &[], &RenderConfig::default()).map_err(|e| JsError::new(&e.to_string()))
}

/// Render an edge list with full control over options.
///
/// - `entrypoint`: node to start from, or empty string for the first declared node
/// - `unicode`: true for Unicode box-drawing chars, false for plain ASCII
#[wasm_bindgen(js_name = "renderWithOptions")]
pub fn render_with_options(src: &str, entrypoint: &str, unicode: bool) -> Result<String, JsError> {
    let entrypoints = if entrypoint.is_empty() {
        Vec::new()
    } else {
        vec![entrypoint.to_string()]
    };
    let config = RenderConfig {
        unicode,
        ..RenderConfig::default()
    };
    crate::render_edge_list(src, &entrypoints, &config).map_err(|e| JsError::new(&e.to_string()))
}
