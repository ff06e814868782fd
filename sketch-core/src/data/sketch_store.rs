use tracing::{debug, warn};

use crate::domain::error::StoreError;
use crate::domain::sketch::Sketch;

/// Name of the durable slot holding the serialized gallery.
pub const STORAGE_KEY: &str = "sketchGallery_posts";

/// Durable copy of the whole sketch collection.
pub trait SketchStore {
    /// Missing or unreadable data loads as an empty gallery.
    fn load(&self) -> Vec<Sketch>;

    /// Replaces the stored collection in one write.
    fn save(&mut self, sketches: &[Sketch]) -> Result<(), StoreError>;
}

impl<S: SketchStore + ?Sized> SketchStore for Box<S> {
    fn load(&self) -> Vec<Sketch> {
        (**self).load()
    }

    fn save(&mut self, sketches: &[Sketch]) -> Result<(), StoreError> {
        (**self).save(sketches)
    }
}

pub(crate) fn decode_sketches(raw: &str, slot: &str) -> Vec<Sketch> {
    match serde_json::from_str::<Vec<Sketch>>(raw) {
        Ok(sketches) => {
            debug!(slot, count = sketches.len(), "sketches decoded");
            sketches
        }
        Err(e) => {
            warn!(slot, error = %e, "stored sketches unreadable, starting empty");
            Vec::new()
        }
    }
}

pub(crate) fn encode_sketches(
    sketches: &[Sketch],
    quota: Option<usize>,
) -> Result<String, StoreError> {
    let json = serde_json::to_string(sketches)?;
    match quota {
        Some(quota) if json.len() > quota => Err(StoreError::QuotaExceeded {
            needed: json.len(),
            quota,
        }),
        _ => Ok(json),
    }
}

/// Keeps the serialized gallery in memory; useful for tests and throwaway
/// sessions.
#[derive(Debug, Clone, Default)]
pub struct MemorySketchStore {
    slot: Option<String>,
    quota: Option<usize>,
}

impl MemorySketchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            slot: None,
            quota: Some(quota),
        }
    }

    /// Starts from an already serialized slot, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Some(raw.into()),
            quota: None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }
}

impl SketchStore for MemorySketchStore {
    fn load(&self) -> Vec<Sketch> {
        self.slot
            .as_deref()
            .map(|raw| decode_sketches(raw, STORAGE_KEY))
            .unwrap_or_default()
    }

    fn save(&mut self, sketches: &[Sketch]) -> Result<(), StoreError> {
        let json = encode_sketches(sketches, self.quota)?;
        self.slot = Some(json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_loads_nothing() {
        assert!(MemorySketchStore::new().load().is_empty());
    }

    #[test]
    fn corrupt_slot_loads_nothing() {
        assert!(MemorySketchStore::with_raw("{not json").load().is_empty());
        assert!(MemorySketchStore::with_raw("{\"id\": 1}").load().is_empty());
    }

    #[test]
    fn quota_rejects_large_payloads_and_keeps_previous_slot() {
        let mut store = MemorySketchStore::with_quota(2);
        store.save(&[]).unwrap();
        assert_eq!(store.raw(), Some("[]"));

        store.set_quota(Some(1));
        let err = store.save(&[]).unwrap_err();
        assert!(matches!(
            err,
            StoreError::QuotaExceeded {
                needed: 2,
                quota: 1
            }
        ));
        assert_eq!(store.raw(), Some("[]"));
    }
}
