pub mod cursor;

pub use cursor::{AdvancePolicy, SelectionCursor};

use crate::clipboard::ClipboardBackend;
use crate::config::Config;
use crate::error::{HistoryError, HistoryResult};
use crate::history::{CategoryFilter, HistoryItem, HistoryStore, ItemRef};
use crate::utils::paths::{get_config_path, get_history_path};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

pub type SharedEngine = Arc<Mutex<ClipboardEngine>>;

/// Lock the shared engine, recovering the state if a previous holder panicked.
pub fn lock(engine: &SharedEngine) -> MutexGuard<'_, ClipboardEngine> {
    engine.lock().unwrap_or_else(|poisoned| {
        warn!("Engine mutex poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Settings, history, filter and selection in one place. Every mutation
/// persists before returning; callers share it behind one mutex.
#[derive(Debug)]
pub struct ClipboardEngine {
    config: Config,
    config_path: PathBuf,
    store: HistoryStore,
    cursor: SelectionCursor,
    filter: String,
    own_write: Option<String>,
}

impl ClipboardEngine {
    pub fn new(config: Config, config_path: PathBuf, store: HistoryStore) -> Self {
        let mut engine = Self {
            cursor: SelectionCursor::new(config.advance_policy),
            config,
            config_path,
            store,
            filter: String::new(),
            own_write: None,
        };
        engine.refresh();
        engine
    }

    /// Load `config.json` and `clipboard_history.json` from `data_dir`.
    pub fn open(data_dir: &Path) -> Self {
        let config_path = get_config_path(data_dir);
        let config = Config::load(&config_path);
        let store = HistoryStore::load(get_history_path(data_dir), config.history_size);
        Self::new(config, config_path, store)
    }

    pub fn shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn cursor(&self) -> &SelectionCursor {
        &self.cursor
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The list the user sees: substring filter, then category filter. Each
    /// entry carries its index in the store.
    pub fn displayed(&self) -> Vec<(usize, &HistoryItem)> {
        let category_filter = self.config.filter_type;
        self.store
            .list(&self.filter)
            .filter(|(_, item)| category_filter.allows(item.category))
            .collect()
    }

    pub fn selected_item(&self) -> Option<&HistoryItem> {
        let index = self.cursor.selected()?;
        self.displayed().get(index).map(|(_, item)| *item)
    }

    /// New clipboard content seen by the monitor. Returns `Ok(false)` when the
    /// value was our own paste and suppression is on.
    pub fn record(&mut self, content: String) -> HistoryResult<bool> {
        let own_write = self.own_write.take();
        if self.config.ignore_own_pastes && own_write.as_deref() == Some(content.as_str()) {
            debug!("Ignoring clipboard change caused by our own paste");
            return Ok(false);
        }

        let saved = self.store.insert(content);
        self.refresh();
        saved.map(|()| true)
    }

    /// Write the selected item to the clipboard and advance the selection.
    pub fn paste(&mut self, clipboard: &mut dyn ClipboardBackend) -> HistoryResult<String> {
        let (len, content) = {
            let displayed = self.displayed();
            let content = self
                .cursor
                .selected()
                .and_then(|i| displayed.get(i))
                .map(|(_, item)| item.content.clone());
            (displayed.len(), content)
        };
        let content = content.ok_or(HistoryError::NoSelection)?;

        clipboard.write_text(&content)?;

        if self.config.ignore_own_pastes {
            self.own_write = Some(content.clone());
        }
        self.cursor.advance(len);
        info!(
            chars = content.chars().count(),
            selected = ?self.cursor.selected(),
            "Pasted history item"
        );
        Ok(content)
    }

    /// Replace the content of a displayed row. The item keeps its position and
    /// timestamp; its category is recomputed.
    pub fn edit(&mut self, displayed_index: usize, content: String) -> HistoryResult<()> {
        let store_index = {
            let displayed = self.displayed();
            displayed
                .get(displayed_index)
                .map(|(i, _)| *i)
                .ok_or(HistoryError::Index {
                    index: displayed_index,
                    len: displayed.len(),
                })?
        };

        let saved = self.store.edit(store_index, content);
        self.refresh();
        saved
    }

    /// Pin the item shown at `displayed_index`, for edits that finish after
    /// the monitor may have inserted more clips.
    pub fn pin_displayed(&self, displayed_index: usize) -> Option<ItemRef> {
        let (store_index, _) = *self.displayed().get(displayed_index)?;
        self.store.pin(store_index)
    }

    /// The displayed row currently showing a pinned item.
    pub fn displayed_row(&self, pinned: &ItemRef) -> Option<usize> {
        let store_index = self.store.resolve(pinned)?;
        self.displayed().iter().position(|(i, _)| *i == store_index)
    }

    /// Replace the content of a pinned item wherever it has moved to. Fails
    /// with `Index` when the item is gone from the history.
    pub fn edit_pinned(&mut self, pinned: &ItemRef, content: String) -> HistoryResult<()> {
        let store_index = self.store.resolve(pinned).ok_or(HistoryError::Index {
            index: pinned.index(),
            len: self.store.len(),
        })?;

        let saved = self.store.edit(store_index, content);
        self.refresh();
        saved
    }

    pub fn clear(&mut self) -> HistoryResult<()> {
        let saved = self.store.clear();
        self.refresh();
        info!("History cleared");
        saved
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.refresh();
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) -> HistoryResult<()> {
        self.config.filter_type = filter;
        self.refresh();
        self.save_config()
    }

    pub fn set_advance_policy(&mut self, policy: AdvancePolicy) -> HistoryResult<()> {
        self.cursor.policy = policy;
        self.config.advance_policy = policy;
        self.save_config()
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.cursor.locked = locked;
    }

    pub fn set_show_timestamps(&mut self, show: bool) -> HistoryResult<()> {
        self.config.show_timestamps = show;
        self.save_config()
    }

    /// Change the capacity, evicting from the tail when it shrinks.
    pub fn set_history_size(&mut self, size: usize) -> HistoryResult<()> {
        if size == 0 {
            return Err(HistoryError::InvalidSetting(
                "historySize must be at least 1".to_string(),
            ));
        }

        self.config.history_size = size;
        let trimmed = self.store.set_capacity(size);
        self.refresh();
        let saved = self.save_config();
        info!(size, "History size updated");
        trimmed.and(saved)
    }

    pub fn import_history(&mut self, data: &str) -> HistoryResult<()> {
        let imported = self.store.import_json(data);
        if matches!(imported, Err(HistoryError::Format(_))) {
            return imported;
        }
        self.refresh();
        info!(count = self.store.len(), "History imported");
        imported
    }

    pub fn export_history(&self) -> HistoryResult<String> {
        self.store.export_json()
    }

    pub fn move_up(&mut self) {
        self.cursor.move_up();
    }

    pub fn move_down(&mut self) {
        let len = self.displayed().len();
        self.cursor.move_down(len);
    }

    fn refresh(&mut self) {
        let len = self.displayed().len();
        self.cursor.refresh(len);
    }

    fn save_config(&self) -> HistoryResult<()> {
        self.config.save(&self.config_path)
    }
}
