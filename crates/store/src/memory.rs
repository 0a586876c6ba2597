//! In-memory record store.

use crate::store::{new_record, sort_newest_first, PresentationStore};
use deck_core::{NewPresentation, PresentationRecord, Result};
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// Keeps records in process memory; contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<PresentationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PresentationStore for MemoryStore {
    fn create(&self, presentation: NewPresentation) -> Result<PresentationRecord> {
        let record = new_record(presentation);
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        log::debug!("Stored presentation {} in memory", record.id);
        Ok(record)
    }

    fn get(&self, id: &Uuid) -> Result<Option<PresentationRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.iter().find(|r| &r.id == id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<PresentationRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        // Insertion order is creation order, so reversing breaks timestamp ties.
        let mut listed: Vec<PresentationRecord> = records.iter().rev().cloned().collect();
        sort_newest_first(&mut listed);
        listed.truncate(limit);
        Ok(listed)
    }

    fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let before = records.len();
        records.retain(|r| &r.id != id);
        Ok(records.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::sample;

    #[test]
    fn test_create_and_get() {
        let store = MemoryStore::new();
        let record = store.create(sample("Deck")).unwrap();

        assert_eq!(store.get(&record.id).unwrap(), Some(record));
        assert_eq!(store.get(&Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn test_list_newest_first_with_limit() {
        let store = MemoryStore::new();
        let first = store.create(sample("First")).unwrap();
        let second = store.create(sample("Second")).unwrap();
        let third = store.create(sample("Third")).unwrap();

        let ids: Vec<Uuid> = store.list(10).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let ids: Vec<Uuid> = store.list(2).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third.id, second.id]);

        assert!(store.list(0).unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let record = store.create(sample("Deck")).unwrap();

        assert!(store.delete(&record.id).unwrap());
        assert!(!store.delete(&record.id).unwrap());
        assert!(store.is_empty());
    }
}
