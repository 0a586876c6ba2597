//! Marp document assembly and block segmentation.
//!
//! A document is one header block (front matter plus generated style rules)
//! followed by slide blocks. In text form the blocks are separated by a
//! bare `---` line:
//!
//! ```text
//! ---
//! marp: true
//! theme: default
//! paginate: true
//! title: "Quarterly Review"
//! ---
//!
//! <style>
//! ...
//! </style>
//!
//! ---
//!
//! # First slide
//!
//! Body text
//! ```
//!
//! [`Document`] keeps the blocks apart in memory and only joins them at the
//! text boundary, so selecting slides never re-splits assembled content.

use crate::range::RangeSet;
use crate::types::{Slide, StyleDescriptor};
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

/// The delimiter token. Only counts when it is alone on its line.
pub const DELIMITER: &str = "---";

/// Text placed between two blocks of a serialized document.
pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// Title callers fall back to when none was supplied.
pub const DEFAULT_TITLE: &str = "Untitled Presentation";

/// Collapses whitespace runs (including line breaks) to one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Check whether a line is a block delimiter.
fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Squash a value into a single line for front matter and headings.
fn single_line(text: &str) -> String {
    WHITESPACE_COLLAPSE_REGEX
        .replace_all(text.trim(), " ")
        .into_owned()
}

/// A presentation document: a header block and ordered slide blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    header: String,
    slides: Vec<String>,
}

impl Document {
    /// Create a document from already-built blocks.
    ///
    /// Blocks are trimmed; empty slide blocks are discarded.
    pub fn new(header: impl Into<String>, slides: impl IntoIterator<Item = String>) -> Self {
        Self {
            header: header.into().trim().to_string(),
            slides: slides
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Split serialized text into header and slide blocks.
    ///
    /// A leading front-matter fence (`---` as the first non-blank line) opens
    /// the header, and its closing `---` stays inside the header. Every other
    /// bare `---` line separates blocks. Blank blocks are dropped, the first
    /// remaining block is the header. Text without any block becomes an empty
    /// header-only document.
    pub fn parse(text: &str) -> Self {
        let mut blocks: Vec<&str> = Vec::new();
        let mut block_start = 0;
        let mut offset = 0;
        let mut front_matter_seen = false;
        let mut in_front_matter = false;

        for line in text.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();

            if !is_delimiter(line) {
                continue;
            }

            if in_front_matter {
                in_front_matter = false;
                continue;
            }

            if !front_matter_seen && blocks.is_empty() && text[..line_start].trim().is_empty() {
                front_matter_seen = true;
                in_front_matter = true;
                continue;
            }

            blocks.push(&text[block_start..line_start]);
            block_start = offset;
        }
        blocks.push(&text[block_start..]);

        if in_front_matter {
            log::debug!("Front matter is never closed; treating the whole text as header");
        }

        let mut blocks = blocks
            .into_iter()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string);

        let header = blocks.next().unwrap_or_default();
        Self {
            header,
            slides: blocks.collect(),
        }
    }

    /// The header block (front matter and style rules).
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Slide blocks in original order.
    pub fn slides(&self) -> &[String] {
        &self.slides
    }

    /// Number of slide blocks.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Whether the document has no slide blocks.
    pub fn is_header_only(&self) -> bool {
        self.slides.is_empty()
    }

    /// Build a new document holding the header and the selected slides.
    ///
    /// Positions are 1-based against this document. Positions beyond the
    /// slide count are ignored, duplicates collapse, and the output keeps
    /// ascending original order whatever order the ranges came in. An
    /// empty selection yields a header-only document.
    pub fn select(&self, ranges: &RangeSet) -> Document {
        let count = self.slides.len();
        let mut positions = BTreeSet::new();

        for range in ranges {
            let end = range.end().min(count);
            for position in range.start().max(1)..=end {
                positions.insert(position - 1);
            }
        }

        log::debug!(
            "Selected {} of {} slides from {} range(s)",
            positions.len(),
            count,
            ranges.len()
        );

        Document {
            header: self.header.clone(),
            slides: positions
                .into_iter()
                .map(|idx| self.slides[idx].clone())
                .collect(),
        }
    }

    /// Serialize to Marp Markdown with a trailing newline.
    pub fn to_markdown(&self) -> String {
        let capacity = self.header.len()
            + self
                .slides
                .iter()
                .map(|s| s.len() + BLOCK_SEPARATOR.len())
                .sum::<usize>()
            + 1;
        let mut out = String::with_capacity(capacity);

        out.push_str(&self.header);
        for slide in &self.slides {
            out.push_str(BLOCK_SEPARATOR);
            out.push_str(slide);
        }
        out.push('\n');
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markdown())
    }
}

/// Builds Marp documents from slides and a style descriptor.
#[derive(Debug, Clone)]
pub struct MarpAssembler {
    /// Marp theme name written to the front matter.
    theme: String,

    /// Whether page numbers are shown.
    paginate: bool,
}

impl Default for MarpAssembler {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            paginate: true,
        }
    }
}

impl MarpAssembler {
    /// Create an assembler with the default theme and pagination on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different Marp theme.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Turn pagination on or off.
    pub fn with_paginate(mut self, paginate: bool) -> Self {
        self.paginate = paginate;
        self
    }

    /// Assemble a document. Never fails; style values pass through verbatim.
    ///
    /// Slide content is kept as written apart from surrounding blank lines,
    /// which are dropped. A content or notes line consisting of the bare
    /// delimiter is written as `\---` so the slide stays one block.
    pub fn assemble(&self, slides: &[Slide], style: &StyleDescriptor, title: &str) -> Document {
        let header = self.header_block(style, title);
        let blocks = slides
            .iter()
            .enumerate()
            .map(|(idx, slide)| slide_block(idx + 1, slide));

        Document::new(header, blocks)
    }

    /// Front matter followed by the generated style rules.
    pub fn header_block(&self, style: &StyleDescriptor, title: &str) -> String {
        let colors = &style.colors;
        let fonts = &style.fonts;

        format!(
            "---\n\
             marp: true\n\
             theme: {theme}\n\
             paginate: {paginate}\n\
             title: {title}\n\
             ---\n\
             \n\
             <style>\n\
             section {{\n  background-color: {background};\n  color: {text};\n  font-family: {body_font};\n}}\n\
             h1, h2, h3 {{\n  color: {primary};\n  font-family: {title_font};\n}}\n\
             a {{\n  color: {secondary};\n}}\n\
             blockquote {{\n  border-left: 4px solid {secondary};\n}}\n\
             </style>",
            theme = self.theme,
            paginate = self.paginate,
            title = yaml_quoted(&single_line(title)),
            background = colors.background,
            text = colors.text,
            body_font = fonts.body,
            primary = colors.primary,
            title_font = fonts.title,
            secondary = colors.secondary,
        )
    }
}

/// Quote a value as a double-quoted YAML scalar.
fn yaml_quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Backslash-escape bare delimiter lines so they render as text and never
/// split the block.
fn escape_delimiters(text: &str) -> String {
    if !text.lines().any(is_delimiter) {
        return text.to_string();
    }

    text.split_inclusive('\n')
        .map(|line| {
            if is_delimiter(line) {
                format!("\\{}", line)
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Render one slide as a block: heading, blank line, body, optional notes.
fn slide_block(number: usize, slide: &Slide) -> String {
    // Leading indentation of the first body line is significant.
    let body = slide.content.trim_end().trim_start_matches(['\r', '\n']);
    if body.lines().any(is_delimiter) {
        log::debug!("Escaping delimiter lines in slide {}", number);
    }

    let mut block = format!(
        "# {}\n\n{}",
        single_line(&slide.title),
        escape_delimiters(body)
    );
    if let Some(notes) = slide.visible_notes() {
        block.push_str("\n\n<!-- ");
        block.push_str(&escape_delimiters(&notes.trim().replace("-->", "-- >")));
        block.push_str(" -->");
    }
    block
}

/// Assemble a document with the default assembler settings.
pub fn assemble(slides: &[Slide], style: &StyleDescriptor, title: &str) -> Document {
    MarpAssembler::new().assemble(slides, style, title)
}
