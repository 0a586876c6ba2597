//! Record store interface.

use chrono::Utc;
use deck_core::{NewPresentation, PresentationRecord, Result};
use uuid::Uuid;

/// Storage for generated presentations.
///
/// Records are immutable once created; the only mutation is deletion.
pub trait PresentationStore: Send + Sync {
    /// Store a new presentation and return it with its id and timestamp.
    fn create(&self, presentation: NewPresentation) -> Result<PresentationRecord>;

    /// Look up a record by id.
    fn get(&self, id: &Uuid) -> Result<Option<PresentationRecord>>;

    /// Up to `limit` records, newest first.
    fn list(&self, limit: usize) -> Result<Vec<PresentationRecord>>;

    /// Remove a record. Returns whether it existed.
    fn delete(&self, id: &Uuid) -> Result<bool>;
}

/// Give a new presentation a fresh id and creation time.
pub(crate) fn new_record(presentation: NewPresentation) -> PresentationRecord {
    presentation.into_record(Uuid::new_v4(), Utc::now())
}

/// Sort newest first. Stable, so equal timestamps keep their given order.
pub(crate) fn sort_newest_first(records: &mut [PresentationRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
pub(crate) mod test_support {
    use deck_core::{NewPresentation, StyleDescriptor};

    pub fn sample(title: &str) -> NewPresentation {
        NewPresentation {
            title: title.to_string(),
            content: "Source text".to_string(),
            guidance: None,
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            slide_count: 0,
            style: StyleDescriptor::default(),
            markdown: format!("---\nmarp: true\ntitle: {}\n---\n", title),
        }
    }
}
