use crate::error::{HistoryError, HistoryResult};
use arboard::Clipboard;

/// Read/write access to a text clipboard.
pub trait ClipboardBackend {
    fn read_text(&mut self) -> HistoryResult<String>;
    fn write_text(&mut self, text: &str) -> HistoryResult<()>;
}

/// The OS clipboard through `arboard`.
///
/// The connection is opened on first use and dropped after a failure, so the
/// next call reconnects. An empty clipboard (or one holding non-text data)
/// reads as an empty string.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn connection(&mut self) -> HistoryResult<&mut Clipboard> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new()
                .map_err(|e| HistoryError::Clipboard(format!("failed to access system clipboard: {e}")))?,
        };
        Ok(self.inner.insert(clipboard))
    }
}

impl ClipboardBackend for SystemClipboard {
    fn read_text(&mut self) -> HistoryResult<String> {
        let result = self.connection()?.get_text();
        match result {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => {
                self.inner = None;
                Err(HistoryError::Clipboard(e.to_string()))
            }
        }
    }

    fn write_text(&mut self, text: &str) -> HistoryResult<()> {
        let result = self.connection()?.set_text(text);
        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                self.inner = None;
                Err(HistoryError::Clipboard(format!("failed to copy text to clipboard: {e}")))
            }
        }
    }
}
