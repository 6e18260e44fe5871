use super::item::HistoryItem;
use crate::error::{HistoryError, HistoryResult};
use crate::utils::file::write_atomic;
use chrono::NaiveDateTime;
use std::fs;
use std::io;
use std::iter::Enumerate;
use std::path::{Path, PathBuf};
use std::slice;
use tracing::{debug, info, warn};

/// Bounded, newest-first clipboard history backed by a JSON file.
///
/// Every mutation rewrites the whole file before returning. A failed write
/// leaves the in-memory sequence mutated and valid; the error is returned so
/// the caller can report it.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    items: Vec<HistoryItem>,
    capacity: usize,
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: PathBuf, capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
            path,
        }
    }

    /// Load history from `path`. A missing, unreadable or corrupt file yields an
    /// empty store.
    pub fn load(path: PathBuf, capacity: usize) -> Self {
        let mut store = Self::new(path, capacity);

        match read_items(&store.path) {
            Ok(Some(items)) => {
                store.items = items;
                if store.trim() {
                    debug!(capacity, "Loaded history exceeded capacity, trimmed");
                }
                info!(count = store.items.len(), path = %store.path.display(), "Loaded history");
            }
            Ok(None) => {
                debug!(path = %store.path.display(), "No history file, starting empty");
            }
            Err(e) => {
                warn!(error = %e, code = e.code(), "Could not load history, starting empty");
            }
        }

        store
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&HistoryItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Remember the item at `index` so it can be found again after inserts
    /// have shifted it.
    pub fn pin(&self, index: usize) -> Option<ItemRef> {
        self.items.get(index).map(|item| ItemRef {
            index,
            content: item.content.clone(),
            timestamp: item.timestamp,
        })
    }

    /// Current index of a pinned item, or `None` once it has been evicted,
    /// cleared or changed. Identical twins resolve to the one nearest the
    /// pinned position.
    pub fn resolve(&self, pinned: &ItemRef) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.timestamp == pinned.timestamp && item.content == pinned.content)
            .map(|(i, _)| i)
            .min_by_key(|i| i.abs_diff(pinned.index))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn insert(&mut self, content: String) -> HistoryResult<()> {
        self.items.insert(0, HistoryItem::new(content));
        self.trim();
        self.save()
    }

    pub fn edit(&mut self, index: usize, content: String) -> HistoryResult<()> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(HistoryError::Index { index, len })?;
        item.set_content(content);
        self.trim();
        self.save()
    }

    pub fn clear(&mut self) -> HistoryResult<()> {
        self.items.clear();
        self.save()
    }

    /// Items whose content contains `filter`, ignoring case, in store order.
    /// The iterator is lazy and can be cloned to restart it.
    pub fn list(&self, filter: &str) -> Filtered<'_> {
        Filtered {
            items: self.items.iter().enumerate(),
            needle: filter.to_lowercase(),
        }
    }

    /// Replace the whole history with a JSON array of items. Stored categories
    /// are recomputed from content. Nothing changes when the data is malformed.
    pub fn import_json(&mut self, data: &str) -> HistoryResult<()> {
        self.items = serde_json::from_str(data)?;
        if self.trim() {
            debug!(capacity = self.capacity, "Imported history exceeded capacity, trimmed");
        }
        self.save()
    }

    pub fn export_json(&self) -> HistoryResult<String> {
        Ok(serde_json::to_string_pretty(&self.items)?)
    }

    pub fn set_capacity(&mut self, capacity: usize) -> HistoryResult<()> {
        self.capacity = capacity;
        if self.trim() {
            self.save()?;
        }
        Ok(())
    }

    /// Write the full sequence. A crash mid-write never leaves a partial
    /// history behind.
    pub fn save(&self) -> HistoryResult<()> {
        let content = serde_json::to_string_pretty(&self.items)?;
        write_atomic(&self.path, &content)?;

        debug!(count = self.items.len(), "History saved");
        Ok(())
    }

    /// Drop items from the tail until the length fits. Returns whether anything
    /// was evicted.
    fn trim(&mut self) -> bool {
        if self.items.len() > self.capacity {
            self.items.truncate(self.capacity);
            true
        } else {
            false
        }
    }
}

fn read_items(path: &Path) -> HistoryResult<Option<Vec<HistoryItem>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(HistoryError::StorageRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    Ok(Some(serde_json::from_str(&content)?))
}

/// A handle on one item, stable across inserts. See [`HistoryStore::pin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    index: usize,
    content: String,
    timestamp: NaiveDateTime,
}

impl ItemRef {
    /// Where the item was when it was pinned.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Lazy view over the items matching a substring, yielding store indices.
#[derive(Debug, Clone)]
pub struct Filtered<'a> {
    items: Enumerate<slice::Iter<'a, HistoryItem>>,
    needle: String,
}

impl<'a> Iterator for Filtered<'a> {
    type Item = (usize, &'a HistoryItem);

    fn next(&mut self) -> Option<Self::Item> {
        let needle = &self.needle;
        self.items.find(|(_, item)| item.matches(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Category;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn setup_store(capacity: usize) -> (TempDir, HistoryStore) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clipboard_history.json");
        (temp_dir, HistoryStore::new(path, capacity))
    }

    fn contents(store: &HistoryStore) -> Vec<&str> {
        store.items().iter().map(|i| i.content.as_str()).collect()
    }

    #[test]
    fn test_insert_is_newest_first() {
        let (_dir, mut store) = setup_store(10);
        store.insert("first".to_string()).unwrap();
        store.insert("second".to_string()).unwrap();

        assert_eq!(contents(&store), vec!["second", "first"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let (_dir, mut store) = setup_store(3);
        for value in ["a", "b", "c", "d"] {
            store.insert(value.to_string()).unwrap();
            assert!(store.len() <= 3);
            assert_eq!(store.items()[0].content, value);
        }

        assert_eq!(contents(&store), vec!["d", "c", "b"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let (_dir, mut store) = setup_store(10);
        store.insert("same".to_string()).unwrap();
        store.insert("same".to_string()).unwrap();

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_persists() {
        let (_dir, mut store) = setup_store(10);
        store.insert("report.pdf".to_string()).unwrap();
        store.insert("https://report.pdf".to_string()).unwrap();

        let reloaded = HistoryStore::load(store.path().to_path_buf(), 10);
        assert_eq!(reloaded.items(), store.items());
        assert_eq!(reloaded.items()[0].category, Category::Url);
        assert_eq!(reloaded.items()[1].category, Category::Document);
    }

    #[test]
    fn test_edit_in_place() {
        let (_dir, mut store) = setup_store(10);
        for value in ["x", "y", "z"] {
            store.insert(value.to_string()).unwrap();
        }
        let before = store.items().to_vec();

        store.edit(1, "q.mp3".to_string()).unwrap();

        let listed: Vec<_> = store.list("").map(|(_, i)| i.clone()).collect();
        assert_eq!(listed[0], before[0]);
        assert_eq!(listed[1].content, "q.mp3");
        assert_eq!(listed[1].category, Category::AudioFile);
        assert_eq!(listed[1].timestamp, before[1].timestamp);
        assert_eq!(listed[2], before[2]);
    }

    #[test]
    fn test_pin_follows_item_across_inserts() {
        let (_dir, mut store) = setup_store(3);
        store.insert("a".to_string()).unwrap();
        store.insert("b".to_string()).unwrap();
        let pinned = store.pin(1).unwrap();

        store.insert("c".to_string()).unwrap();
        assert_eq!(store.resolve(&pinned), Some(2));

        store.insert("d".to_string()).unwrap();
        assert_eq!(store.resolve(&pinned), None);
        assert_eq!(store.pin(3), None);
    }

    #[test]
    fn test_pin_prefers_nearest_twin() {
        let (_dir, mut store) = setup_store(10);
        let ts = HistoryItem::new(String::new()).timestamp;
        let data = serde_json::to_string(&vec![
            HistoryItem::at("same".to_string(), ts),
            HistoryItem::at("same".to_string(), ts),
        ])
        .unwrap();
        store.import_json(&data).unwrap();

        let pinned = store.pin(1).unwrap();
        assert_eq!(store.resolve(&pinned), Some(1));
    }

    #[test]
    fn test_edit_out_of_range() {
        let (_dir, mut store) = setup_store(10);
        store.insert("only".to_string()).unwrap();

        let err = store.edit(5, "nope".to_string()).unwrap_err();
        assert!(matches!(err, HistoryError::Index { index: 5, len: 1 }));
        assert_eq!(contents(&store), vec!["only"]);
    }

    #[test]
    fn test_clear_persists_empty_array() {
        let (_dir, mut store) = setup_store(10);
        store.insert("gone".to_string()).unwrap();
        store.clear().unwrap();

        assert!(store.is_empty());
        let on_disk = fs::read_to_string(store.path()).unwrap();
        assert_eq!(on_disk.trim(), "[]");
    }

    #[test]
    fn test_list_filters_case_insensitively() {
        let (_dir, mut store) = setup_store(10);
        for value in ["Alpha", "beta", "ALPHABET"] {
            store.insert(value.to_string()).unwrap();
        }

        let listed = store.list("alpha");
        let first_pass: Vec<_> = listed.clone().map(|(i, item)| (i, item.content.as_str())).collect();
        assert_eq!(first_pass, vec![(0, "ALPHABET"), (2, "Alpha")]);

        // Restarting from the clone sees the same sequence.
        assert_eq!(listed.count(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_import_replaces_and_recategorizes() {
        let (_dir, mut store) = setup_store(2);
        store.insert("old".to_string()).unwrap();

        let data = r#"[
            {"content": "clip.mov", "category": "Text", "timestamp": "2025-01-01 10:00:00"},
            {"content": "b", "category": "Text", "timestamp": "2025-01-01 09:00:00"},
            {"content": "c", "category": "Text", "timestamp": "2025-01-01 08:00:00"}
        ]"#;
        store.import_json(data).unwrap();

        assert_eq!(contents(&store), vec!["clip.mov", "b"]);
        assert_eq!(store.items()[0].category, Category::VideoFile);
    }

    #[test]
    fn test_import_accepts_unknown_category_labels() {
        let (_dir, mut store) = setup_store(10);
        let data = r#"[
            {"content": "x.png", "category": "Picture", "timestamp": "2025-01-01 10:00:00"},
            {"content": "y", "category": 7, "timestamp": "2025-01-01 09:00:00"}
        ]"#;
        store.import_json(data).unwrap();

        assert_eq!(contents(&store), vec!["x.png", "y"]);
        assert_eq!(store.items()[0].category, Category::ImageFile);
        assert_eq!(store.items()[1].category, Category::Text);
    }

    #[test]
    fn test_load_recomputes_stale_categories() {
        let (_dir, store) = setup_store(10);
        let data = r#"[{"content": "https://a.b", "category": "Bookmark", "timestamp": "2025-01-01 10:00:00"}]"#;
        fs::write(store.path(), data).unwrap();

        let reloaded = HistoryStore::load(store.path().to_path_buf(), 10);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.items()[0].category, Category::Url);
    }

    #[test]
    fn test_import_malformed_leaves_store_unchanged() {
        let (_dir, mut store) = setup_store(10);
        store.insert("keep".to_string()).unwrap();

        for bad in [r#"{"content": "x"}"#, r#"[{"content": 1}]"#, "not json"] {
            let err = store.import_json(bad).unwrap_err();
            assert!(matches!(err, HistoryError::Format(_)));
        }
        assert_eq!(contents(&store), vec!["keep"]);
    }

    #[test]
    fn test_export_roundtrip() {
        let (_dir, mut store) = setup_store(10);
        store.insert("one".to_string()).unwrap();
        store.insert("two.md".to_string()).unwrap();
        let exported = store.export_json().unwrap();

        let (_other_dir, mut other) = setup_store(10);
        other.import_json(&exported).unwrap();
        assert_eq!(other.items(), store.items());
    }

    #[test]
    fn test_set_capacity_trims() {
        let (_dir, mut store) = setup_store(5);
        for value in ["a", "b", "c", "d"] {
            store.insert(value.to_string()).unwrap();
        }
        store.set_capacity(2).unwrap();

        assert_eq!(contents(&store), vec!["d", "c"]);
        let reloaded = HistoryStore::load(store.path().to_path_buf(), 5);
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_load_missing_or_corrupt_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clipboard_history.json");
        assert!(HistoryStore::load(path.clone(), 10).is_empty());

        fs::write(&path, "{ not an array").unwrap();
        assert!(HistoryStore::load(path, 10).is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file, not a dir").unwrap();
        let mut store = HistoryStore::new(blocker.join("clipboard_history.json"), 10);

        let err = store.insert("still here".to_string()).unwrap_err();
        assert!(matches!(err, HistoryError::StorageWrite { .. }));
        assert_eq!(contents(&store), vec!["still here"]);
    }
}
