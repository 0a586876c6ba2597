//! WASM-compatible wrapper for slide deck assembly and range selection.
//!
//! This crate exposes document assembly and slide-range filtering to
//! JavaScript for use in Cloudflare Workers.

use deck_core::{
    assemble, parse_ranges_with_report, select_slides, Document, Slide, StyleDescriptor,
    DEFAULT_TITLE,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of assembling a document.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssembleResult {
    /// The Marp document text.
    pub markdown: String,
    /// Number of slide blocks.
    pub slide_count: usize,
}

/// A parsed range, as exposed to JavaScript.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeDto {
    pub start: usize,
    pub end: usize,
}

/// Result of parsing a range expression.
#[derive(Debug, Serialize, Deserialize)]
pub struct RangesResult {
    /// Accepted ranges in ascending order.
    pub ranges: Vec<RangeDto>,
    /// Tokens that were ignored.
    pub rejected: Vec<String>,
    /// True when no filter applies.
    pub select_all: bool,
}

/// Assemble a Marp document.
///
/// # Arguments
/// * `slides` - Array of `{title, content, layout?, notes?}` objects
/// * `style` - `{colors, fonts}` object, or `undefined` for the default style
/// * `title` - Presentation title
#[wasm_bindgen]
pub fn assemble_document(
    slides: JsValue,
    style: JsValue,
    title: Option<String>,
) -> Result<JsValue, JsValue> {
    let slides: Vec<Slide> = serde_wasm_bindgen::from_value(slides)
        .map_err(|e| JsValue::from_str(&format!("Invalid slides array: {}", e)))?;

    let style: StyleDescriptor = if style.is_undefined() || style.is_null() {
        StyleDescriptor::default()
    } else {
        serde_wasm_bindgen::from_value(style)
            .map_err(|e| JsValue::from_str(&format!("Invalid style: {}", e)))?
    };

    let result = assemble_impl(&slides, &style, title.as_deref());

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn assemble_impl(slides: &[Slide], style: &StyleDescriptor, title: Option<&str>) -> AssembleResult {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);
    let document = assemble(slides, style, title);

    AssembleResult {
        markdown: document.to_markdown(),
        slide_count: document.slide_count(),
    }
}

/// Parse a range expression such as `"1-3, 5, 7-9"`.
#[wasm_bindgen]
pub fn parse_ranges(expression: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&parse_ranges_impl(expression))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_ranges_impl(expression: &str) -> RangesResult {
    let parsed = parse_ranges_with_report(expression);

    RangesResult {
        select_all: parsed.selects_all(),
        ranges: parsed
            .ranges
            .iter()
            .map(|r| RangeDto {
                start: r.start(),
                end: r.end(),
            })
            .collect(),
        rejected: parsed.rejected,
    }
}

/// Keep only the slides named by `expression`; an empty expression keeps all.
#[wasm_bindgen]
pub fn filter_document(document: &str, expression: &str) -> String {
    select_slides(document, expression)
}

/// Number of slides in a Marp document.
#[wasm_bindgen]
pub fn slide_count(document: &str) -> usize {
    Document::parse(document).slide_count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_default_title() {
        let slides = vec![Slide::new("One", "a"), Slide::new("Two", "b")];
        let result = assemble_impl(&slides, &StyleDescriptor::default(), Some("  "));

        assert_eq!(result.slide_count, 2);
        assert!(result.markdown.contains("title: \"Untitled Presentation\"\n"));
    }

    #[test]
    fn test_parse_ranges_result() {
        let result = parse_ranges_impl("5, 1-2, oops");

        assert!(!result.select_all);
        assert_eq!(
            result.ranges,
            vec![RangeDto { start: 1, end: 2 }, RangeDto { start: 5, end: 5 }]
        );
        assert_eq!(result.rejected, vec!["oops"]);
        assert!(parse_ranges_impl("").select_all);
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test::wasm_bindgen_test]
    fn test_parse_ranges_to_js() {
        let value = parse_ranges("2-3, x").unwrap();
        let result: RangesResult = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(result.ranges, vec![RangeDto { start: 2, end: 3 }]);
        assert_eq!(result.rejected, vec!["x"]);
    }

    #[test]
    fn test_filter_and_count() {
        let slides: Vec<Slide> = (1..=4).map(|i| Slide::new(format!("S{}", i), "x")).collect();
        let doc = assemble_impl(&slides, &StyleDescriptor::default(), Some("Deck")).markdown;

        assert_eq!(slide_count(&filter_document(&doc, "2-3")), 2);
        assert_eq!(filter_document(&doc, ""), doc);
    }
}
