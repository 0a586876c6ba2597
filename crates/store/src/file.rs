//! JSON file record store: one `<id>.json` per record in a directory.

use crate::store::{new_record, sort_newest_first, PresentationStore};
use deck_core::{NewPresentation, PresentationRecord, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Stores each record as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn read_record(path: &Path) -> Result<PresentationRecord> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl PresentationStore for FileStore {
    fn create(&self, presentation: NewPresentation) -> Result<PresentationRecord> {
        let record = new_record(presentation);
        let path = self.path_for(&record.id);

        // Write beside the target and rename so a failed write leaves no record.
        let mut file = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &record)?;
            writer.flush()?;
        }
        file.persist(&path).map_err(|e| e.error)?;

        log::debug!("Stored presentation {} at {}", record.id, path.display());
        Ok(record)
    }

    fn get(&self, id: &Uuid) -> Result<Option<PresentationRecord>> {
        match Self::read_record(&self.path_for(id)) {
            Ok(record) => Ok(Some(record)),
            Err(deck_core::Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn list(&self, limit: usize) -> Result<Vec<PresentationRecord>> {
        let mut records = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match Self::read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping unreadable record {}: {}", path.display(), e),
            }
        }

        sort_newest_first(&mut records);
        records.truncate(limit);
        Ok(records)
    }

    fn delete(&self, id: &Uuid) -> Result<bool> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
