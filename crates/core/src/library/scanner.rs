//! Filesystem discovery of media files.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::ScanError;

/// Lists candidate media files in a fixed directory.
pub trait MediaScanner: Send + Sync {
    /// The directory being scanned.
    fn directory(&self) -> &Path;

    /// Basenames of the directory's direct children.
    fn list_media_files(&self) -> Result<Vec<String>, ScanError>;
}

/// Scanner over a real directory.
///
/// The path is made absolute once, at construction; later working
/// directory changes do not affect it. Every direct child counts as a
/// candidate, with no filtering by extension or type.
#[derive(Debug, Clone)]
pub struct FsScanner {
    directory: PathBuf,
}

impl FsScanner {
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, ScanError> {
        let requested = directory.as_ref();
        let directory = std::path::absolute(requested).map_err(|source| ScanError::Resolve {
            path: requested.to_path_buf(),
            source,
        })?;
        info!("Loading videos from {}", directory.display());
        Ok(Self { directory })
    }
}

impl MediaScanner for FsScanner {
    fn directory(&self) -> &Path {
        &self.directory
    }

    fn list_media_files(&self) -> Result<Vec<String>, ScanError> {
        let list_err = |source: std::io::Error| ScanError::List {
            path: self.directory.clone(),
            source,
        };

        let mut names = Vec::new();
        for dir_entry in std::fs::read_dir(&self.directory).map_err(list_err)? {
            let dir_entry = dir_entry.map_err(list_err)?;
            match dir_entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!("Skipping non UTF-8 file name: {:?}", raw),
            }
        }
        names.sort();
        Ok(names)
    }
}
