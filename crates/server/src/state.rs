use std::path::Path;
use std::sync::Arc;

use tagr_core::{Catalog, Config, HealthState, LibraryService};

/// Shared application state
pub struct AppState {
    config: Config,
    library: LibraryService,
}

impl AppState {
    pub fn new(config: Config, library: LibraryService) -> Self {
        Self { config, library }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn library(&self) -> &LibraryService {
        &self.library
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.library.catalog()
    }

    pub fn health(&self) -> &Arc<HealthState> {
        self.library.persistence().health()
    }

    /// The media directory as resolved at startup.
    pub fn video_dir(&self) -> &Path {
        self.library.scanner().directory()
    }
}
