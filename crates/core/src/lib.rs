//! Core domain types, Marp document assembly, and slide-range selection
//! for AI-generated slide decks.

pub mod document;
pub mod error;
pub mod range;
pub mod types;

pub use document::{assemble, Document, MarpAssembler, BLOCK_SEPARATOR, DEFAULT_TITLE, DELIMITER};
pub use error::{Error, Result};
pub use range::{
    filter_document, parse_ranges, parse_ranges_with_report, select_slides, slide_count,
    ParsedRanges, RangeSet, SlideRange,
};
pub use types::{
    ColorScheme, FontScheme, NewPresentation, PresentationRecord, Slide, StyleDescriptor,
    DEFAULT_LAYOUT,
};
