//! WASM bindings for exporting a notebook from the browser.
//!
//! Each function takes a notebook snapshot as JSON
//! (`{"pages": [{"title": "<html>", "body": "<html>"}]}`) and returns the
//! export as a string, or `undefined` when every page is blank.

use wasm_bindgen::prelude::*;

use crate::export::{export_markdown, export_text, print_document};
use crate::model::{Document, DocumentSnapshot};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn load(snapshot_json: &str) -> Result<Document, JsValue> {
    let snapshot: DocumentSnapshot =
        serde_json::from_str(snapshot_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(Document::from_snapshot(&snapshot))
}

/// Plain-text export.
#[wasm_bindgen]
pub fn notebook_to_text(snapshot_json: &str) -> Result<Option<String>, JsValue> {
    Ok(export_text(&load(snapshot_json)?))
}

/// Markdown export.
#[wasm_bindgen]
pub fn notebook_to_markdown(snapshot_json: &str) -> Result<Option<String>, JsValue> {
    Ok(export_markdown(&load(snapshot_json)?))
}

/// Print-ready HTML; the caller opens it in a window and prints it.
#[wasm_bindgen]
pub fn notebook_to_print_html(snapshot_json: &str, title: &str) -> Result<Option<String>, JsValue> {
    Ok(print_document(&load(snapshot_json)?, title))
}

/// Standalone page markup for a rasterizer, one string per non-blank page.
#[wasm_bindgen]
pub fn notebook_page_markup(snapshot_json: &str) -> Result<Vec<String>, JsValue> {
    let document = load(snapshot_json)?;
    let frame = crate::export::PageFrame::default();
    Ok(document
        .non_blank_pages()
        .map(|(_, page)| frame.page_markup(page))
        .collect())
}
