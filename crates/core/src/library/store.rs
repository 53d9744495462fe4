//! Byte-oriented durable storage for the serialized catalog.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// A single named artifact holding the entire serialized catalog.
pub trait BackupStore: Send + Sync {
    /// Read the whole artifact. `Ok(None)` means it does not exist yet.
    fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replace the whole artifact.
    fn write(&self, bytes: &[u8]) -> io::Result<()>;

    /// Human-readable location, for logs and errors.
    fn location(&self) -> String;
}

/// File-backed store using write-to-temp-then-rename.
///
/// A crash mid-write leaves either the previous artifact or the new one in
/// place, never a truncated file.
#[derive(Debug, Clone)]
pub struct FileBackupStore {
    path: PathBuf,
}

impl FileBackupStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl BackupStore for FileBackupStore {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        // The temp file must live on the same filesystem for the rename to be atomic.
        let mut temp = NamedTempFile::new_in(self.parent_dir())?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
