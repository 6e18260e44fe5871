use crate::clipboard::ClipboardBackend;
use crate::engine::{self, SharedEngine};
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Polls a clipboard and records every value that differs from the last one
/// it saw. There is no debounce.
pub struct ClipboardMonitor<C> {
    clipboard: C,
    engine: SharedEngine,
    last_seen: String,
    consecutive_errors: u32,
    notify: Option<Sender<()>>,
}

impl<C: ClipboardBackend> ClipboardMonitor<C> {
    pub fn new(clipboard: C, engine: SharedEngine) -> Self {
        Self {
            clipboard,
            engine,
            last_seen: String::new(),
            consecutive_errors: 0,
            notify: None,
        }
    }

    /// Send `()` on `tx` whenever the history changes.
    pub fn with_notifier(mut self, tx: Sender<()>) -> Self {
        self.notify = Some(tx);
        self
    }

    /// One polling cycle. Returns whether the history changed.
    pub fn poll_once(&mut self) -> bool {
        let current = match self.clipboard.read_text() {
            Ok(text) => {
                if self.consecutive_errors > 0 {
                    info!(failures = self.consecutive_errors, "Clipboard readable again");
                    self.consecutive_errors = 0;
                }
                text
            }
            Err(e) => {
                self.consecutive_errors += 1;
                if self.consecutive_errors == 1 {
                    warn!(error = %e, "Clipboard read failed");
                } else {
                    debug!(error = %e, failures = self.consecutive_errors, "Clipboard read failed");
                }
                return false;
            }
        };

        if current == self.last_seen {
            return false;
        }
        self.last_seen = current.clone();
        debug!(chars = current.chars().count(), "Clipboard changed");

        let recorded = engine::lock(&self.engine).record(current);
        let changed = match recorded {
            Ok(changed) => changed,
            Err(e) => {
                warn!(error = %e, code = e.code(), "Recorded clipboard change but could not save history");
                true
            }
        };

        if changed && let Some(tx) = &self.notify {
            let _ = tx.send(());
        }
        changed
    }
}

/// Owns the monitor thread. Dropping the handle stops the thread and waits
/// for it to exit.
pub struct MonitorHandle {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("Clipboard monitor thread panicked");
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start polling on a background thread. The clipboard is created on that
/// thread, so backends need not be `Send`.
pub fn spawn_monitor<C, F>(
    engine: SharedEngine,
    make_clipboard: F,
    interval: Duration,
    notify: Option<Sender<()>>,
) -> io::Result<MonitorHandle>
where
    C: ClipboardBackend,
    F: FnOnce() -> C + Send + 'static,
{
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let thread = thread::Builder::new()
        .name("clipboard-monitor".to_string())
        .spawn(move || {
            let mut monitor = ClipboardMonitor::new(make_clipboard(), engine);
            if let Some(tx) = notify {
                monitor = monitor.with_notifier(tx);
            }

            info!(interval_ms = interval.as_millis() as u64, "Clipboard monitor started");
            loop {
                monitor.poll_once();
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            info!("Clipboard monitor stopped");
        })?;

    Ok(MonitorHandle {
        stop_tx: Some(stop_tx),
        thread: Some(thread),
    })
}
