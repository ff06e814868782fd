use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::data::sketch_store::{SketchStore, decode_sketches, encode_sketches};
use crate::domain::error::StoreError;
use crate::domain::sketch::Sketch;

/// Gallery kept in a single JSON file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct FileSketchStore {
    path: PathBuf,
    quota: Option<usize>,
}

impl FileSketchStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota: None,
        }
    }

    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl SketchStore for FileSketchStore {
    fn load(&self) -> Vec<Sketch> {
        let slot = self.path.display().to_string();
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode_sketches(&raw, &slot),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no gallery file yet");
                Vec::new()
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "gallery file unreadable, starting empty"
                );
                Vec::new()
            }
        }
    }

    fn save(&mut self, sketches: &[Sketch]) -> Result<(), StoreError> {
        let json = encode_sketches(sketches, self.quota)?;
        let dir = self.parent_dir();
        fs::create_dir_all(dir)?;

        // Write next to the target so the rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        info!(
            path = %self.path.display(),
            count = sketches.len(),
            bytes = json.len(),
            "gallery saved"
        );
        Ok(())
    }
}
