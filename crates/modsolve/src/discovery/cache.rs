use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::error::{ResolverError, Result};
use crate::package::Origin;

type Slot = Arc<Mutex<Option<Arc<Vec<PathBuf>>>>>;

/// Extracted nested archives, keyed by the origin that contains them.
///
/// Extraction runs at most once per origin even when several tasks ask
/// concurrently; later callers wait for the first one and share its result.
/// Extracted files live in a temporary directory removed with the cache.
#[derive(Debug)]
pub struct ExtractionCache {
    root: TempDir,
    slots: Mutex<HashMap<Origin, Slot>>,
    extractions: AtomicUsize,
}

impl ExtractionCache {
    pub fn new() -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix("modsolve-nested-")
            .tempdir()
            .map_err(|e| ResolverError::io(std::env::temp_dir(), e))?;

        Ok(Self {
            root,
            slots: Mutex::new(HashMap::new()),
            extractions: AtomicUsize::new(0),
        })
    }

    /// Directory holding the extracted archives
    pub fn dir(&self) -> &Path {
        self.root.path()
    }

    /// Return the archives extracted for `origin`, running `extract` if this
    /// is the first request for it.
    ///
    /// A failed extraction is not cached; the next caller retries.
    pub fn get_or_extract<F>(&self, origin: &Origin, extract: F) -> Result<Arc<Vec<PathBuf>>>
    where
        F: FnOnce(&Path) -> Result<Vec<PathBuf>>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(origin.clone()).or_default().clone()
        };

        let mut guard = slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(paths) = guard.as_ref() {
            log::debug!("Reusing {} nested archive(s) of {}", paths.len(), origin);
            return Ok(paths.clone());
        }

        log::debug!("Extracting nested archives of {}", origin);
        let paths = Arc::new(extract(self.dir())?);
        self.extractions.fetch_add(1, Ordering::SeqCst);
        *guard = Some(paths.clone());

        Ok(paths)
    }

    /// Previously extracted archives, if any
    pub fn get(&self, origin: &Origin) -> Option<Arc<Vec<PathBuf>>> {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.get(origin)?.clone()
        };
        let guard = slot.lock().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    /// Number of extractions actually performed
    pub fn extraction_count(&self) -> usize {
        self.extractions.load(Ordering::SeqCst)
    }
}
