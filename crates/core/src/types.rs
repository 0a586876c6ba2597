//! Domain types for generated slide decks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Layout tag used when a slide does not carry one.
pub const DEFAULT_LAYOUT: &str = "content";

/// A single generated slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Slide heading.
    pub title: String,

    /// Markdown body, emitted verbatim.
    pub content: String,

    /// Layout hint (informational only).
    #[serde(default = "default_layout")]
    pub layout: String,

    /// Speaker notes, rendered as a hidden annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_layout() -> String {
    DEFAULT_LAYOUT.to_string()
}

impl Slide {
    /// Create a new slide with the default layout and no notes.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            layout: default_layout(),
            notes: None,
        }
    }

    /// Set the layout tag.
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Attach speaker notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Notes that should be emitted, i.e. present and not blank.
    pub fn visible_notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// Color tokens applied across a presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub text: String,
}

/// Font families applied across a presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontScheme {
    pub title: String,
    pub body: String,
}

/// Colors and fonts, constant for the lifetime of a presentation.
///
/// Values are opaque tokens and are substituted into the generated style
/// rules without validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub colors: ColorScheme,
    pub fonts: FontScheme,
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self {
            colors: ColorScheme {
                primary: "#1a73e8".to_string(),
                secondary: "#34a853".to_string(),
                background: "#ffffff".to_string(),
                text: "#202124".to_string(),
            },
            fonts: FontScheme {
                title: "Helvetica, Arial, sans-serif".to_string(),
                body: "Helvetica, Arial, sans-serif".to_string(),
            },
        }
    }
}

/// Input for creating a stored presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPresentation {
    pub title: String,

    /// The free-form text the deck was generated from.
    pub content: String,

    /// Optional extra instructions given to the model.
    pub guidance: Option<String>,

    pub provider: String,
    pub model: String,

    /// Number of slides actually generated.
    pub slide_count: usize,

    pub style: StyleDescriptor,

    /// The assembled Marp document.
    pub markdown: String,
}

impl NewPresentation {
    /// Turn the input into a record with the given identity.
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> PresentationRecord {
        PresentationRecord {
            id,
            title: self.title,
            content: self.content,
            guidance: self.guidance,
            provider: self.provider,
            model: self.model,
            slide_count: self.slide_count,
            style: self.style,
            markdown: self.markdown,
            created_at,
        }
    }
}

/// A stored presentation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationRecord {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub guidance: Option<String>,
    pub provider: String,
    pub model: String,
    pub slide_count: usize,
    pub style: StyleDescriptor,
    pub markdown: String,
    pub created_at: DateTime<Utc>,
}
