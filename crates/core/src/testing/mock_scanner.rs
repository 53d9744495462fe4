//! Scanner with a settable listing.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::library::{MediaScanner, ScanError};

/// Returns whatever file list it was last given.
#[derive(Debug)]
pub struct StaticScanner {
    directory: PathBuf,
    files: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl StaticScanner {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            directory: PathBuf::from("/media/static"),
            files: Mutex::new(files.into_iter().map(Into::into).collect()),
            fail: AtomicBool::new(false),
        }
    }

    /// Replace the listing returned by subsequent scans.
    pub fn set_files<I, S>(&self, files: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.files.lock().unwrap() = files.into_iter().map(Into::into).collect();
    }

    /// Make subsequent scans fail as if the directory vanished.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl MediaScanner for StaticScanner {
    fn directory(&self) -> &Path {
        &self.directory
    }

    fn list_media_files(&self) -> Result<Vec<String>, ScanError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ScanError::List {
                path: self.directory.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "simulated scan failure"),
            });
        }
        Ok(self.files.lock().unwrap().clone())
    }
}
