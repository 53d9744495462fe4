pub mod config;
pub mod library;
pub mod metrics;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LibraryConfig,
    ServerConfig,
};
pub use library::{
    reconcile, BackupScheduler, BackupStore, Catalog, CatalogData, CatalogSnapshot, Entry,
    FileBackupStore, FlushError, FsScanner, HealthState, LibraryError, LibraryService, LoadError,
    MediaScanner, Persistence, ReconcileReport, ScanError, StartupError,
};
