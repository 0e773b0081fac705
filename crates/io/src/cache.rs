//! Process-lifetime cache for the parsed legacy export.
//!
//! The export is static for the life of the process, so it is parsed once
//! and held in a single mutable slot. Only the loader writes the slot, and
//! reloading identical data is harmless, so no further coordination is
//! needed beyond the mutex.

use std::sync::{Arc, Mutex, PoisonError};

use oxetech_recon::error::ReconError;
use oxetech_recon::model::ClassRecord;

use crate::legacy::LoadReport;

/// One parsed load of the legacy export.
#[derive(Debug)]
pub struct CachedLegacy {
    pub records: Vec<ClassRecord>,
    pub report: LoadReport,
}

/// Single-slot cache with explicit invalidation.
pub struct LegacyCache {
    slot: Mutex<Option<Arc<CachedLegacy>>>,
}

impl LegacyCache {
    pub const fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }

    /// Return the cached load, running `load` only if the slot is empty.
    pub fn get_or_load<F>(&self, load: F) -> Result<Arc<CachedLegacy>, ReconError>
    where
        F: FnOnce() -> Result<(Vec<ClassRecord>, LoadReport), ReconError>,
    {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = slot.as_ref() {
            return Ok(Arc::clone(cached));
        }
        let (records, report) = load()?;
        let cached = Arc::new(CachedLegacy { records, report });
        *slot = Some(Arc::clone(&cached));
        Ok(cached)
    }

    /// Clear the slot; the next `get_or_load` reparses the source.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    pub fn is_populated(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Default for LegacyCache {
    fn default() -> Self {
        Self::new()
    }
}
