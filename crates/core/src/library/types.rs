//! Types for the media library catalog.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata record for a single media file.
///
/// Every field defaults when absent from JSON input: replacements are
/// accepted as supplied, and completeness is the caller's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// File basename within the media directory.
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub title: String,
    /// Ordered, not deduplicated.
    #[serde(default)]
    pub tags: Vec<String>,
    /// User-defined content date (not an audit field).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: String,
}

impl Entry {
    /// Zero-metadata entry for a newly discovered file.
    pub fn placeholder(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }
}

/// The serialized catalog: everything that survives a restart.
///
/// Strict on input: a document without `entries`, or with fields this
/// type does not know, is not a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogData {
    pub entries: BTreeMap<String, Entry>,
    /// Known tag vocabulary, tracked apart from per-entry tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_vocabulary: Option<Vec<String>>,
}

/// Point-in-time copy of the catalog handed to the persistence gate.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub data: CatalogData,
    /// Write counter at the moment the copy was taken.
    pub revision: u64,
}

/// Outcome of a reconciliation pass, kept for logging and API replies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub added: Vec<String>,
    pub known: Vec<String>,
}

impl ReconcileReport {
    pub fn total(&self) -> usize {
        self.added.len() + self.known.len()
    }
}

/// Errors for catalog operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LibraryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid key: filename cannot be empty")]
    InvalidKey,
}

/// The media directory could not be resolved or listed.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to resolve media directory {path:?}: {source}")]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to list media directory {path:?}: {source}")]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The durable artifact exists but cannot be used.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read catalog backup {location}: {source}")]
    Read {
        location: String,
        source: std::io::Error,
    },

    #[error("Could not unpack catalog backup {location}: {source}")]
    Corrupt {
        location: String,
        source: serde_json::Error,
    },
}

/// A flush attempt failed; the dirty flag is left set.
#[derive(Debug, Error)]
pub enum FlushError {
    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write catalog backup {location}: {source}")]
    Write {
        location: String,
        source: std::io::Error,
    },

    #[error("Flush task failed: {0}")]
    Task(String),
}

/// Fatal errors during the startup sequence.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Scan(#[from] ScanError),
}
