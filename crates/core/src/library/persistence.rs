//! Persistence gate: loads the catalog at startup and flushes it when dirty.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::{debug, error, info};

use super::{BackupStore, Catalog, CatalogData, FlushError, LoadError};
use crate::metrics::{FLUSH_DURATION, LIBRARY_FLUSHES};

/// Process health as seen by persistence: healthy iff the last flush succeeded.
#[derive(Debug)]
pub struct HealthState {
    healthy: AtomicBool,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            healthy: AtomicBool::new(true),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// `"healthy"` or `"unhealthy"`.
    pub fn as_str(&self) -> &'static str {
        if self.is_healthy() {
            "healthy"
        } else {
            "unhealthy"
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes the catalog to a [`BackupStore`].
pub struct Persistence {
    store: Arc<dyn BackupStore>,
    health: Arc<HealthState>,
    /// Held from snapshot to `mark_clean` so an older snapshot can never
    /// land on disk after a newer one. Catalog readers and writers never
    /// take it.
    flush_lock: Mutex<()>,
}

impl Persistence {
    pub fn new(store: Arc<dyn BackupStore>, health: Arc<HealthState>) -> Self {
        Self {
            store,
            health,
            flush_lock: Mutex::new(()),
        }
    }

    pub fn health(&self) -> &Arc<HealthState> {
        &self.health
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Load the catalog from the durable artifact.
    ///
    /// A missing artifact yields an empty catalog. An artifact that exists
    /// but cannot be read or parsed is an error: starting empty would
    /// silently discard the user's metadata on the next flush.
    pub fn load(&self) -> Result<Catalog, LoadError> {
        let location = self.store.location();
        info!("Loading catalog from {}", location);

        let bytes = match self.store.read() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!("No catalog backup at {}, starting empty", location);
                return Ok(Catalog::new());
            }
            Err(source) => return Err(LoadError::Read { location, source }),
        };

        let data: CatalogData = serde_json::from_slice(&bytes)
            .map_err(|source| LoadError::Corrupt { location, source })?;

        info!("Catalog load complete: {} entries", data.entries.len());
        Ok(Catalog::from_data(data))
    }

    /// Write the current catalog state, unconditionally.
    ///
    /// The snapshot is taken under the catalog lock; serialization and I/O
    /// happen without it. On failure the dirty flag is left set and health
    /// flips to unhealthy; the next scheduled tick retries.
    pub fn flush(&self, catalog: &Catalog) -> Result<(), FlushError> {
        let _guard = self.flush_lock.lock().unwrap_or_else(|e| e.into_inner());
        let start = Instant::now();
        let result = self.write_snapshot(catalog);
        FLUSH_DURATION.observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(()) => {
                self.health.set_healthy(true);
                LIBRARY_FLUSHES.with_label_values(&["success"]).inc();
            }
            Err(e) => {
                error!("Catalog backup failed: {}", e);
                self.health.set_healthy(false);
                LIBRARY_FLUSHES.with_label_values(&["failure"]).inc();
            }
        }
        result
    }

    /// Flush only if there are unsaved writes. Returns whether a write happened.
    ///
    /// A flush already in progress may clear the flag first; the check is
    /// advisory and a redundant write is harmless.
    pub fn flush_if_dirty(&self, catalog: &Catalog) -> Result<bool, FlushError> {
        if !catalog.is_dirty() {
            debug!("Catalog clean, skipping backup");
            LIBRARY_FLUSHES.with_label_values(&["skipped"]).inc();
            return Ok(false);
        }
        self.flush(catalog).map(|()| true)
    }

    fn write_snapshot(&self, catalog: &Catalog) -> Result<(), FlushError> {
        let snapshot = catalog.snapshot();
        let bytes = serde_json::to_vec_pretty(&snapshot.data)?;

        self.store
            .write(&bytes)
            .map_err(|source| FlushError::Write {
                location: self.store.location(),
                source,
            })?;

        if !catalog.mark_clean(snapshot.revision) {
            debug!("Catalog changed during backup, staying dirty");
        }
        info!(
            "Catalog backup complete: {} entries to {}",
            snapshot.data.entries.len(),
            self.store.location()
        );
        Ok(())
    }
}
