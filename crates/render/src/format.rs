//! Export formats supported by the render backend.

use deck_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Standalone HTML slideshow.
    Html,
    /// PowerPoint (Office Open XML).
    Pptx,
    /// PDF, one page per slide.
    Pdf,
}

impl ExportFormat {
    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "pptx" => Some(Self::Pptx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pptx => "pptx",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type for downloads.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Pptx => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            Self::Pdf => "application/pdf",
        }
    }

    /// Whether producing this format needs a headless browser.
    pub fn is_binary(&self) -> bool {
        !matches!(self, Self::Html)
    }

    /// Marp CLI switch selecting this format, if any.
    pub(crate) fn marp_flag(&self) -> Option<&'static str> {
        match self {
            Self::Html => None,
            Self::Pptx => Some("--pptx"),
            Self::Pdf => Some("--pdf"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s).ok_or_else(|| Error::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(ExportFormat::from_extension("HTML"), Some(ExportFormat::Html));
        assert_eq!(ExportFormat::from_extension(".pptx"), Some(ExportFormat::Pptx));
        assert_eq!(ExportFormat::from_extension("pdf"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::from_extension("key"), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "docx".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(f) if f == "docx"));
    }

    #[test]
    fn test_binary_formats() {
        assert!(!ExportFormat::Html.is_binary());
        assert!(ExportFormat::Pptx.is_binary());
        assert!(ExportFormat::Pdf.is_binary());
        assert_eq!(ExportFormat::Html.marp_flag(), None);
        assert_eq!(ExportFormat::Pdf.marp_flag(), Some("--pdf"));
    }
}
