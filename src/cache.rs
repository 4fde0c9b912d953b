//! Process-lifetime workspace cache.
//!
//! Re-walking the export on every resolution is correct but wasteful — the
//! tree only changes when the export on disk is replaced, which for a static
//! export means "at deploy time". This cache holds one immutable
//! [`Workspace`] snapshot behind an `Arc` for the life of the process.
//!
//! # Design
//!
//! The cache is an explicit object owned by the caller, with the build
//! function injected per call — not a module-level global. Hosts that need
//! live reload call [`WorkspaceCache::invalidate`]; everyone else just lets
//! it ride until process restart.
//!
//! Concurrent callers may race to populate an empty slot. That is fine:
//! every build from the same on-disk state produces an equivalent tree, so
//! the last writer is harmless and readers holding the loser's `Arc` still
//! see a complete, consistent snapshot. No locking is held during the build
//! itself.

use std::sync::{Arc, RwLock};

use crate::scan::ScanError;
use crate::types::Workspace;

/// Cache slot for one workspace snapshot.
#[derive(Debug, Default)]
pub struct WorkspaceCache {
    slot: RwLock<Option<Arc<Workspace>>>,
}

impl WorkspaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot, or build one with `build` and cache it.
    ///
    /// A failed build caches nothing, so the next call retries.
    pub fn get_or_build<F>(&self, build: F) -> Result<Arc<Workspace>, ScanError>
    where
        F: FnOnce() -> Result<Workspace, ScanError>,
    {
        if let Some(cached) = self.get() {
            return Ok(cached);
        }
        let built = Arc::new(build()?);
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        // A racing builder may have landed first; either snapshot is valid.
        *slot = Some(Arc::clone(&built));
        Ok(built)
    }

    /// Current snapshot without building.
    pub fn get(&self) -> Option<Arc<Workspace>> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Drop the snapshot so the next access rebuilds.
    pub fn invalidate(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}
