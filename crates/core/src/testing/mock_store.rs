//! In-memory backup store.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::library::BackupStore;

/// Keeps the artifact in memory and counts successful writes.
#[derive(Debug, Default)]
pub struct MemoryBackupStore {
    contents: Mutex<Option<Vec<u8>>>,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryBackupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the artifact, as if left by a previous run.
    pub fn set_contents(&self, bytes: Vec<u8>) {
        *self.contents.lock().unwrap() = Some(bytes);
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.contents.lock().unwrap().clone()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl BackupStore for MemoryBackupStore {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "simulated read failure",
            ));
        }
        Ok(self.contents())
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::other("simulated write failure"));
        }
        *self.contents.lock().unwrap() = Some(bytes.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
