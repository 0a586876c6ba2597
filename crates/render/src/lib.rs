//! Marp CLI render backend for exporting slide decks.
//!
//! Converts serialized Marp documents into HTML, PPTX or PDF by running the
//! external Marp command line tool.

pub mod format;
pub mod marp;
pub mod renderer;

pub use format::ExportFormat;
pub use marp::{MarpConfig, MarpRenderer};
pub use renderer::Renderer;
