//! Load-once dataset cache, owned by the caller.
//!
//! The cached dataset is reloaded when the source file's modification time
//! changes, or after an explicit [`DatasetCache::invalidate`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use crate::dataset::Dataset;
use crate::error::LoadError;
use crate::sales_csv::load_sales_csv;

struct Loaded {
    modified: Option<SystemTime>,
    dataset: Arc<Dataset>,
}

/// Cache for one sales-log file
pub struct DatasetCache {
    path: PathBuf,
    state: Mutex<Option<Loaded>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached dataset, loading or reloading the file as needed.
    pub fn get(&self) -> Result<Arc<Dataset>, LoadError> {
        let modified = modified_time(&self.path)?;
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(loaded) = state.as_ref() {
            if loaded.modified == modified {
                tracing::debug!(path = %self.path.display(), "dataset cache hit");
                return Ok(Arc::clone(&loaded.dataset));
            }
            tracing::info!(path = %self.path.display(), "source changed, reloading dataset");
        }

        let dataset = Arc::new(load_sales_csv(&self.path)?);
        *state = Some(Loaded {
            modified,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// Drop the cached dataset; the next `get` reloads from disk.
    pub fn invalidate(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

// Platforms without mtime support yield None, which only reloads on invalidate.
fn modified_time(path: &Path) -> Result<Option<SystemTime>, LoadError> {
    let meta = fs::metadata(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(meta.modified().ok())
}
