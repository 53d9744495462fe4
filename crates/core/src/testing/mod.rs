//! Testing utilities and in-memory implementations of the library's
//! collaborator traits.
//!
//! # Example
//!
//! ```rust,ignore
//! use tagr_core::testing::{MemoryBackupStore, StaticScanner};
//!
//! let store = Arc::new(MemoryBackupStore::new());
//! let scanner = Arc::new(StaticScanner::new(["a.mp4", "b.mp4"]));
//!
//! // Simulate a full disk on the next flush
//! store.set_fail_writes(true);
//! ```

mod mock_scanner;
mod mock_store;

pub use mock_scanner::StaticScanner;
pub use mock_store::MemoryBackupStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::library::Entry;

    /// A fully populated entry.
    pub fn tagged_entry(filename: &str, title: &str, tags: &[&str]) -> Entry {
        Entry {
            filename: filename.to_string(),
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            date: Utc.with_ymd_and_hms(2021, 6, 15, 18, 0, 0).single(),
            description: format!("{} ({})", title, filename),
        }
    }
}
