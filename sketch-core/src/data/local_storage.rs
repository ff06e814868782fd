use gloo_storage::{LocalStorage, Storage};
use tracing::warn;

use crate::data::sketch_store::{STORAGE_KEY, SketchStore, decode_sketches};
use crate::domain::error::StoreError;
use crate::domain::sketch::Sketch;

/// Browser LocalStorage slot. The browser enforces its own quota and
/// reports overflow as a storage error.
#[derive(Debug, Clone)]
pub struct LocalStorageSketchStore {
    key: String,
}

impl LocalStorageSketchStore {
    pub fn new() -> Self {
        Self::with_key(STORAGE_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for LocalStorageSketchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchStore for LocalStorageSketchStore {
    fn load(&self) -> Vec<Sketch> {
        match LocalStorage::raw().get_item(&self.key) {
            Ok(Some(raw)) => decode_sketches(&raw, &self.key),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(
                    key = %self.key,
                    error = ?e,
                    "local storage unavailable, starting empty"
                );
                Vec::new()
            }
        }
    }

    fn save(&mut self, sketches: &[Sketch]) -> Result<(), StoreError> {
        LocalStorage::set(&self.key, sketches).map_err(|e| StoreError::Backend(e.to_string()))
    }
}
