//! Parsing model output into slides.

use deck_core::{Error, Result, Slide};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Matches a fenced block that opens at a line start and closes the text.
static CODE_FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(?:^|\n)```[A-Za-z]*[ \t]*\r?\n(.*)\r?\n```\s*$").unwrap()
});

/// Accepted top-level shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum SlidePayload {
    Bare(Vec<Slide>),
    Wrapped { slides: Vec<Slide> },
}

/// Strip a surrounding code fence and any prose before the JSON value.
fn extract_json(text: &str) -> &str {
    let inner = CODE_FENCE_REGEX
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(text);

    // Models sometimes prefix the payload with a sentence.
    match inner.find(|c: char| c == '[' || c == '{') {
        Some(pos) => &inner[pos..],
        None => inner,
    }
}

/// Parse a model response into slides.
///
/// Accepts a bare JSON array or an object with a `slides` array, optionally
/// wrapped in a Markdown code fence. Anything else, including an empty
/// array, is an [`Error::InvalidResponse`].
pub fn parse_slides_response(text: &str) -> Result<Vec<Slide>> {
    let text = text.trim();

    let payload: SlidePayload = match serde_json::from_str(text) {
        Ok(payload) => payload,
        Err(_) => serde_json::from_str(extract_json(text)).map_err(|e| {
            Error::InvalidResponse(format!("expected a JSON array of slides ({})", e))
        })?,
    };

    let slides = match payload {
        SlidePayload::Bare(slides) | SlidePayload::Wrapped { slides } => slides,
    };

    if slides.is_empty() {
        return Err(Error::InvalidResponse(
            "response contained no slides".to_string(),
        ));
    }

    log::debug!("Parsed {} slides from provider response", slides.len());
    Ok(slides)
}
