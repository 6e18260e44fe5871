pub mod components;
pub mod theme;

use crate::app::{event::handle_key_event, AppState};
use anyhow::Result;
use crossterm::{
    event::{
        self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::sync::mpsc;
use std::time::Duration;
use tracing::debug;

struct TerminalGuard {
    keyboard_enhancement: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.keyboard_enhancement {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = stdout.flush();
    }
}

/// Run the interactive view until the user quits.
///
/// The screen is redrawn only after a key press, a resize, an expired status
/// message, or a message on `refresh_rx`. The monitor sends one there for
/// each clip it records.
pub fn run_tui(mut state: AppState, refresh_rx: mpsc::Receiver<()>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let supports_keyboard_enhancement = execute!(
        stdout,
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
    )
    .is_ok();

    let _guard = TerminalGuard {
        keyboard_enhancement: supports_keyboard_enhancement,
    };

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut state, refresh_rx);
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    refresh_rx: mpsc::Receiver<()>,
) -> Result<()> {
    let mut needs_draw = true;

    loop {
        if state.clear_expired_status_message() {
            needs_draw = true;
        }

        if needs_draw {
            terminal.draw(|f| {
                components::render(f, state);
            })?;
            needs_draw = false;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, state)?;
                    needs_draw = true;
                }
                Event::Resize(..) => needs_draw = true,
                _ => {}
            }
        }

        let captured = pending_refreshes(&refresh_rx);
        if captured > 0 {
            debug!(captured, "Redrawing after clipboard capture");
            needs_draw = true;
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

/// Drain the monitor's notifications, returning how many were queued.
fn pending_refreshes(refresh_rx: &mpsc::Receiver<()>) -> usize {
    refresh_rx.try_iter().count()
}
