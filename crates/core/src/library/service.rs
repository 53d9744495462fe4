//! Startup sequencing and runtime access to the library.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::{reconcile, Catalog, MediaScanner, Persistence, ReconcileReport, StartupError};

/// The loaded, reconciled library and the collaborators that maintain it.
#[derive(Clone)]
pub struct LibraryService {
    catalog: Arc<Catalog>,
    scanner: Arc<dyn MediaScanner>,
    persistence: Arc<Persistence>,
}

impl LibraryService {
    /// Run the startup sequence: load, reconcile, then an initial backup.
    ///
    /// Load and scan failures are fatal. A failed initial backup is not:
    /// it is logged, health flips, and the catalog stays dirty for the
    /// first scheduled tick.
    pub fn open(
        persistence: Arc<Persistence>,
        scanner: Arc<dyn MediaScanner>,
    ) -> Result<Self, StartupError> {
        let catalog = Arc::new(persistence.load()?);

        reconcile(&catalog, scanner.as_ref())?;

        if let Err(e) = persistence.flush(&catalog) {
            warn!("Initial catalog backup failed: {}", e);
        }

        info!("Library ready with {} entries", catalog.len());
        Ok(Self {
            catalog,
            scanner,
            persistence,
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn persistence(&self) -> &Arc<Persistence> {
        &self.persistence
    }

    pub fn scanner(&self) -> &Arc<dyn MediaScanner> {
        &self.scanner
    }

    /// Re-run discovery at runtime. Scan failures are logged and produce an
    /// empty report rather than an error.
    pub fn rescan(&self) -> ReconcileReport {
        match reconcile(&self.catalog, self.scanner.as_ref()) {
            Ok(report) => report,
            Err(e) => {
                error!("Rescan failed: {}", e);
                ReconcileReport::default()
            }
        }
    }
}
