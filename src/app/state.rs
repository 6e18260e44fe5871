use super::mode::Mode;
use crate::clipboard::ClipboardBackend;
use crate::engine::{self, ClipboardEngine, SharedEngine};
use crate::error::HistoryResult;
use crate::history::ItemRef;
use crate::ui::theme::Theme;
use std::sync::MutexGuard;
use std::time::{Duration, Instant};
use tracing::warn;

const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

pub struct AppState {
    pub engine: SharedEngine,
    pub clipboard: Box<dyn ClipboardBackend>,
    pub mode: Mode,
    pub edit_buffer: String,
    pub edit_cursor_pos: usize,
    pub edit_target: Option<ItemRef>,
    pub should_quit: bool,
    pub show_help: bool,
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
}

impl AppState {
    pub fn new(engine: SharedEngine, clipboard: Box<dyn ClipboardBackend>, theme: Theme) -> Self {
        Self {
            engine,
            clipboard,
            mode: Mode::Navigate,
            edit_buffer: String::new(),
            edit_cursor_pos: 0,
            edit_target: None,
            should_quit: false,
            show_help: false,
            theme,
            status_message: None,
        }
    }

    pub fn engine(&self) -> MutexGuard<'_, ClipboardEngine> {
        engine::lock(&self.engine)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Show `ok` on success, the error otherwise.
    pub fn report<T>(&mut self, result: HistoryResult<T>, ok: impl Into<String>) {
        match result {
            Ok(_) => self.set_status(ok),
            Err(e) => {
                warn!(error = %e, code = e.code(), "Action failed");
                self.set_status(format!("Error: {e}"));
            }
        }
    }

    /// Drop the status message once it has been shown long enough. Returns
    /// whether one was dropped.
    pub fn clear_expired_status_message(&mut self) -> bool {
        if let Some((_, shown_at)) = &self.status_message
            && shown_at.elapsed() >= STATUS_MESSAGE_TTL
        {
            self.status_message = None;
            return true;
        }
        false
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status_message.as_ref().map(|(msg, _)| msg.as_str())
    }

    pub fn start_line_edit(&mut self, mode: Mode, initial: String) {
        self.edit_cursor_pos = initial.len();
        self.edit_buffer = initial;
        self.mode = mode;
    }

    pub fn finish_line_edit(&mut self) -> String {
        self.mode = Mode::Navigate;
        self.edit_cursor_pos = 0;
        self.edit_target = None;
        std::mem::take(&mut self.edit_buffer)
    }
}
