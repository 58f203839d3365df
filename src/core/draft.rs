//! Draft persistence - one serialized deed under one key

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entities::deed::DeedModel;

/// Storage key for the in-progress deed
pub const STORAGE_KEY: &str = "vehicle-sale-deed-draft";

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Failed to access draft at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Draft is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Draft storage unavailable: {0}")]
    Unavailable(String),
}

/// Local key-value storage for the draft deed
pub trait DraftStore {
    /// Read the stored draft, `Ok(None)` when nothing has been saved
    fn load(&self) -> Result<Option<DeedModel>, DraftError>;

    /// Replace the stored draft
    fn save(&mut self, model: &DeedModel) -> Result<(), DraftError>;

    /// Remove the stored draft; clearing an empty store is not an error
    fn clear(&mut self) -> Result<(), DraftError>;
}

/// Draft kept as a JSON file
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's data directory
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "vehicle-sale-deed")
            .map(|dirs| dirs.data_dir().join(format!("{}.json", STORAGE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn io_error(&self, source: io::Error) -> DraftError {
        DraftError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> Result<Option<DeedModel>, DraftError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let model = serde_json::from_str(&contents)?;
        Ok(Some(model))
    }

    fn save(&mut self, model: &DeedModel) -> Result<(), DraftError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let json = serde_json::to_string_pretty(model)?;

        // Write beside the target then rename, so a failed write never
        // leaves a truncated draft behind
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn clear(&mut self) -> Result<(), DraftError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-memory store holding the serialized draft
///
/// Can be told to fail writes, to exercise the recovery paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    slot: Option<String>,
    fail_writes: bool,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw serialized content
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Some(raw.into()),
            fail_writes: false,
        }
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Result<Option<DeedModel>, DraftError> {
        match &self.slot {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, model: &DeedModel) -> Result<(), DraftError> {
        if self.fail_writes {
            return Err(DraftError::Unavailable("quota exceeded".to_string()));
        }
        self.slot = Some(serde_json::to_string(model)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DraftError> {
        if self.fail_writes {
            return Err(DraftError::Unavailable("storage locked".to_string()));
        }
        self.slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::deed::Title;
    use tempfile::TempDir;

    fn sample() -> DeedModel {
        let mut model = DeedModel::default();
        model.seller.title = Title::Dr;
        model.seller.full_name = "Karma Dorji".to_string();
        model.vehicle.registration_number = "BP-1-A1234".to_string();
        model.sale.price = "450000".to_string();
        model.sale.is_non_refundable = true;
        model
    }

    #[test]
    fn test_file_store_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileDraftStore::new(tmp.path().join("nested").join("draft.json"));
        assert!(store.load().unwrap().is_none());

        let model = sample();
        store.save(&model).unwrap();
        assert!(store.exists());

        let fresh = FileDraftStore::new(store.path());
        assert_eq!(fresh.load().unwrap(), Some(model));
    }

    #[test]
    fn test_file_store_clear() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileDraftStore::new(tmp.path().join("draft.json"));
        store.save(&sample()).unwrap();
        store.clear().unwrap();
        assert!(!store.exists());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_corrupt() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("draft.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileDraftStore::new(&path);
        assert!(matches!(store.load(), Err(DraftError::Corrupt(_))));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryDraftStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        store.clear().unwrap();
        assert!(store.raw().is_none());
    }

    #[test]
    fn test_memory_store_failing_writes() {
        let mut store = MemoryDraftStore::new();
        store.set_fail_writes(true);
        assert!(matches!(
            store.save(&sample()),
            Err(DraftError::Unavailable(_))
        ));
        assert!(store.raw().is_none());
    }

    #[test]
    fn test_default_path_uses_storage_key() {
        if let Some(path) = FileDraftStore::default_path() {
            assert!(path.to_string_lossy().contains(STORAGE_KEY));
        }
    }
}
