//! In-memory catalog of media entries.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::{CatalogData, CatalogSnapshot, Entry, LibraryError};

/// State guarded by a single lock so that a mutation and its dirty mark
/// are always observed together.
#[derive(Debug, Default)]
struct CatalogState {
    data: CatalogData,
    dirty: bool,
    /// Bumped by every accepted write.
    revision: u64,
}

/// The shared, process-wide catalog.
///
/// Each operation holds the lock only for its own in-memory work; nothing
/// here touches disk.
#[derive(Debug, Default)]
pub struct Catalog {
    state: RwLock<CatalogState>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from previously persisted data. The result is clean.
    pub fn from_data(data: CatalogData) -> Self {
        Self {
            state: RwLock::new(CatalogState {
                data,
                dirty: false,
                revision: 0,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Look up a single entry.
    pub fn get(&self, filename: &str) -> Result<Entry, LibraryError> {
        self.read()
            .data
            .entries
            .get(filename)
            .cloned()
            .ok_or_else(|| LibraryError::NotFound(filename.to_string()))
    }

    /// Whether a filename is already known.
    pub fn contains(&self, filename: &str) -> bool {
        self.read().data.entries.contains_key(filename)
    }

    /// All entries. Callers that need a particular order must sort.
    pub fn list_all(&self) -> Vec<(String, Entry)> {
        self.read()
            .data
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Insert or wholesale-replace the entry at `filename`.
    ///
    /// The entry is stored exactly as given; no fields of a previous entry
    /// survive the replacement.
    pub fn put(&self, filename: &str, entry: Entry) -> Result<(), LibraryError> {
        if filename.is_empty() {
            return Err(LibraryError::InvalidKey);
        }

        let mut state = self.write();
        state.data.entries.insert(filename.to_string(), entry);
        state.dirty = true;
        state.revision += 1;
        debug!("Replaced entry for {}", filename);
        Ok(())
    }

    /// Insert a placeholder entry iff `filename` is absent.
    ///
    /// Returns `true` when an entry was added. Existing entries are never
    /// touched.
    pub fn ensure_placeholder(&self, filename: &str) -> Result<bool, LibraryError> {
        if filename.is_empty() {
            return Err(LibraryError::InvalidKey);
        }

        let mut state = self.write();
        if state.data.entries.contains_key(filename) {
            return Ok(false);
        }
        state
            .data
            .entries
            .insert(filename.to_string(), Entry::placeholder(filename));
        state.dirty = true;
        state.revision += 1;
        Ok(true)
    }

    /// Current tag vocabulary, if one has been recorded.
    pub fn tag_vocabulary(&self) -> Option<Vec<String>> {
        self.read().data.tag_vocabulary.clone()
    }

    /// Replace the tag vocabulary. Counts as a write.
    pub fn set_tag_vocabulary(&self, vocabulary: Option<Vec<String>>) {
        let mut state = self.write();
        state.data.tag_vocabulary = vocabulary;
        state.dirty = true;
        state.revision += 1;
    }

    /// Immutable copy of the current state, tagged with the write revision.
    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.read();
        CatalogSnapshot {
            data: state.data.clone(),
            revision: state.revision,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.read().dirty
    }

    /// Clear the dirty flag after a successful flush of `revision`.
    ///
    /// If a write landed after that snapshot was taken the flag stays set,
    /// and `false` is returned.
    pub fn mark_clean(&self, revision: u64) -> bool {
        let mut state = self.write();
        if state.revision != revision {
            return false;
        }
        state.dirty = false;
        true
    }

    pub fn len(&self) -> usize {
        self.read().data.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(filename: &str, title: &str, tags: &[&str]) -> Entry {
        Entry {
            filename: filename.to_string(),
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            date: None,
            description: format!("about {}", title),
        }
    }

    #[test]
    fn test_new_catalog_is_empty_and_clean() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert!(!catalog.is_dirty());
        assert!(catalog.tag_vocabulary().is_none());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let catalog = Catalog::new();
        assert_eq!(
            catalog.get("nope.mp4"),
            Err(LibraryError::NotFound("nope.mp4".to_string()))
        );
    }

    #[test]
    fn test_put_then_get_returns_exact_entry() {
        let catalog = Catalog::new();
        let v = entry("a.mp4", "First", &["x", "y"]);
        catalog.put("a.mp4", v.clone()).unwrap();
        assert_eq!(catalog.get("a.mp4").unwrap(), v);
        assert!(catalog.is_dirty());
    }

    #[test]
    fn test_put_replaces_wholesale() {
        let catalog = Catalog::new();
        catalog
            .put("a.mp4", entry("a.mp4", "Old", &["keep?"]))
            .unwrap();

        // The replacement lacks tags and description: they must not survive.
        let replacement = Entry {
            filename: "a.mp4".to_string(),
            title: "New".to_string(),
            ..Default::default()
        };
        catalog.put("a.mp4", replacement.clone()).unwrap();

        let stored = catalog.get("a.mp4").unwrap();
        assert_eq!(stored, replacement);
        assert!(stored.tags.is_empty());
        assert!(stored.description.is_empty());
    }

    #[test]
    fn test_last_put_wins() {
        let catalog = Catalog::new();
        for i in 0..10 {
            catalog
                .put("a.mp4", entry("a.mp4", &format!("v{}", i), &[]))
                .unwrap();
        }
        assert_eq!(catalog.get("a.mp4").unwrap().title, "v9");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_put_empty_key_rejected() {
        let catalog = Catalog::new();
        catalog.put("a.mp4", entry("a.mp4", "A", &[])).unwrap();
        let before = catalog.snapshot();

        let result = catalog.put("", entry("", "Nope", &[]));
        assert_eq!(result, Err(LibraryError::InvalidKey));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.snapshot().revision, before.revision);
    }

    #[test]
    fn test_put_stores_entry_as_given() {
        let catalog = Catalog::new();
        let mismatched = entry("other.mp4", "Mismatch", &[]);
        catalog.put("a.mp4", mismatched.clone()).unwrap();
        assert_eq!(catalog.get("a.mp4").unwrap(), mismatched);
        assert!(!catalog.contains("other.mp4"));
    }

    #[test]
    fn test_ensure_placeholder_inserts_when_absent() {
        let catalog = Catalog::new();
        assert!(catalog.ensure_placeholder("a.mp4").unwrap());
        assert_eq!(catalog.get("a.mp4").unwrap(), Entry::placeholder("a.mp4"));
        assert!(catalog.is_dirty());
    }

    #[test]
    fn test_ensure_placeholder_never_overwrites() {
        let catalog = Catalog::new();
        let custom = entry("a.mp4", "X", &["tagged"]);
        catalog.put("a.mp4", custom.clone()).unwrap();

        assert!(!catalog.ensure_placeholder("a.mp4").unwrap());
        assert!(!catalog.ensure_placeholder("a.mp4").unwrap());
        assert_eq!(catalog.get("a.mp4").unwrap(), custom);
    }

    #[test]
    fn test_ensure_placeholder_existing_does_not_dirty() {
        let catalog = Catalog::from_data(CatalogData {
            entries: [("a.mp4".to_string(), Entry::placeholder("a.mp4"))]
                .into_iter()
                .collect(),
            tag_vocabulary: None,
        });
        assert!(!catalog.ensure_placeholder("a.mp4").unwrap());
        assert!(!catalog.is_dirty());
    }

    #[test]
    fn test_ensure_placeholder_empty_key_rejected() {
        let catalog = Catalog::new();
        assert_eq!(
            catalog.ensure_placeholder(""),
            Err(LibraryError::InvalidKey)
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_from_data_is_clean() {
        let mut data = CatalogData::default();
        data.entries
            .insert("a.mp4".to_string(), entry("a.mp4", "A", &[]));
        let catalog = Catalog::from_data(data);
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.is_dirty());
    }

    #[test]
    fn test_list_all_contains_every_entry() {
        let catalog = Catalog::new();
        catalog.put("b.mp4", entry("b.mp4", "B", &[])).unwrap();
        catalog.put("a.mp4", entry("a.mp4", "A", &[])).unwrap();

        let mut listed = catalog.list_all();
        listed.sort_by(|a, b| a.0.cmp(&b.0));
        let names: Vec<&str> = listed.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["a.mp4", "b.mp4"]);
        assert_eq!(listed[0].1.title, "A");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let catalog = Catalog::new();
        catalog.put("a.mp4", entry("a.mp4", "A", &[])).unwrap();
        let snapshot = catalog.snapshot();

        catalog.put("a.mp4", entry("a.mp4", "Changed", &[])).unwrap();
        assert_eq!(snapshot.data.entries["a.mp4"].title, "A");
    }

    #[test]
    fn test_mark_clean_matching_revision() {
        let catalog = Catalog::new();
        catalog.put("a.mp4", entry("a.mp4", "A", &[])).unwrap();
        let snapshot = catalog.snapshot();
        assert!(catalog.mark_clean(snapshot.revision));
        assert!(!catalog.is_dirty());
    }

    #[test]
    fn test_mark_clean_stale_revision_keeps_dirty() {
        let catalog = Catalog::new();
        catalog.put("a.mp4", entry("a.mp4", "A", &[])).unwrap();
        let snapshot = catalog.snapshot();

        // A write lands while the snapshot is being written out.
        catalog.put("b.mp4", entry("b.mp4", "B", &[])).unwrap();

        assert!(!catalog.mark_clean(snapshot.revision));
        assert!(catalog.is_dirty());
    }

    #[test]
    fn test_set_tag_vocabulary_marks_dirty() {
        let catalog = Catalog::new();
        catalog.set_tag_vocabulary(Some(vec!["family".to_string(), "travel".to_string()]));
        assert!(catalog.is_dirty());
        assert_eq!(
            catalog.tag_vocabulary(),
            Some(vec!["family".to_string(), "travel".to_string()])
        );
    }

    #[test]
    fn test_concurrent_puts_to_distinct_keys() {
        let catalog = Arc::new(Catalog::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let name = format!("t{}-{}.mp4", t, i);
                        catalog.put(&name, entry(&name, "T", &["x"])).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(catalog.len(), 400);
        assert_eq!(catalog.snapshot().revision, 400);
    }
}
