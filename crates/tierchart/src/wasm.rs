//! WebAssembly bindings for Tierchart
//!
//! Browser-facing wrappers around the layout façade. Errors come back as
//! JavaScript exceptions carrying the error message.

use wasm_bindgen::prelude::*;

use crate::core::{CharacterSet, ChartConfig};

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn parse_style(style: &str) -> Result<CharacterSet, JsValue> {
    match style {
        "ascii" => Ok(CharacterSet::Ascii),
        "unicode" => Ok(CharacterSet::Unicode),
        _ => Err(JsValue::from_str(&format!(
            "Unknown style: {}. Use 'ascii' or 'unicode'",
            style
        ))),
    }
}

/// Lay out a JSON org chart and return the layout report as JSON
///
/// # Arguments
/// * `input` - org chart JSON (`{"title": ..., "children": [...]}`)
/// * `width` - available width, in the caller's measurement unit
#[wasm_bindgen]
pub fn layout_chart(input: &str, width: f64) -> Result<String, JsValue> {
    let config = ChartConfig::default().with_available_space(width);
    let layout = crate::layout_with_config(input, &config)
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    let report = layout
        .to_report()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render a JSON org chart as a text preview
///
/// # Arguments
/// * `input` - org chart JSON
/// * `width` - available width in character cells
/// * `style` - "ascii" or "unicode"
#[wasm_bindgen]
pub fn render_chart(input: &str, width: f64, style: &str) -> Result<String, JsValue> {
    let style = parse_style(style)?;
    let config = ChartConfig::default().with_available_space(width);
    crate::render_with_style(input, &config, style)
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
