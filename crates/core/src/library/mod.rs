//! Media library: the catalog of tagged video files and its upkeep.
//!
//! - [`Catalog`]: in-memory entries, guarded by one lock together with the dirty flag
//! - [`FsScanner`] / [`reconcile`]: add-only discovery from the media directory
//! - [`Persistence`]: load at startup, flush-if-dirty to a [`BackupStore`]
//! - [`BackupScheduler`]: the periodic flush job
//! - [`LibraryService`]: strict startup sequencing (load, reconcile, initial flush)

mod catalog;
mod persistence;
mod reconcile;
mod scanner;
mod scheduler;
mod service;
mod store;
mod types;

pub use catalog::Catalog;
pub use persistence::{HealthState, Persistence};
pub use reconcile::reconcile;
pub use scanner::{FsScanner, MediaScanner};
pub use scheduler::BackupScheduler;
pub use service::LibraryService;
pub use store::{BackupStore, FileBackupStore};
pub use types::*;
