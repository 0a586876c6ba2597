//! Render backend interface.

use crate::format::ExportFormat;
use deck_core::{Error, Result};

/// Turns a serialized Marp document into an exportable file.
pub trait Renderer: Send + Sync {
    /// Render the document into the requested format.
    fn render(&self, document: &str, format: ExportFormat) -> Result<Vec<u8>>;

    /// Whether binary formats (PPTX, PDF) can be produced here.
    fn can_render_binary(&self) -> bool;

    /// Render to an HTML string.
    fn render_html(&self, document: &str) -> Result<String> {
        let bytes = self.render(document, ExportFormat::Html)?;
        String::from_utf8(bytes).map_err(|e| Error::Render {
            status: Some(0),
            diagnostics: format!("HTML output is not valid UTF-8: {}", e),
        })
    }

    /// Render to PPTX bytes.
    fn render_pptx(&self, document: &str) -> Result<Vec<u8>> {
        self.render(document, ExportFormat::Pptx)
    }

    /// Render to PDF bytes.
    fn render_pdf(&self, document: &str) -> Result<Vec<u8>> {
        self.render(document, ExportFormat::Pdf)
    }
}
