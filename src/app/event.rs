use super::mode::Mode;
use super::state::AppState;
use crate::engine;
use crate::utils::unicode::{next_char_boundary, prev_char_boundary, truncate_chars};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Result<()> {
    match state.mode {
        Mode::Navigate => handle_navigate_mode(key, state),
        Mode::Edit => handle_edit_mode(key, state),
        Mode::Search => handle_search_mode(key, state),
        Mode::ConfirmClear => handle_confirm_clear(key, state),
    }
    Ok(())
}

fn handle_navigate_mode(key: KeyEvent, state: &mut AppState) {
    if state.show_help {
        // Any key closes the help overlay
        state.show_help = false;
        return;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
            state.engine().move_up();
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
            state.engine().move_down();
        }

        (KeyCode::Enter, _)
        | (KeyCode::Char('p'), KeyModifiers::NONE)
        | (KeyCode::Char('v'), KeyModifiers::CONTROL) => paste_selected(state),

        (KeyCode::Char('e'), KeyModifiers::NONE) | (KeyCode::Char('i'), KeyModifiers::NONE) => {
            enter_edit_mode(state);
        }
        (KeyCode::Char('/'), _) => {
            let filter = state.engine().filter().to_string();
            state.start_line_edit(Mode::Search, filter);
        }

        (KeyCode::Char('a'), KeyModifiers::NONE) => {
            let result = {
                let mut engine = state.engine();
                let policy = engine.cursor().policy.cycle();
                engine.set_advance_policy(policy).map(|()| policy)
            };
            let msg = match &result {
                Ok(policy) => format!("After paste: {policy}"),
                Err(_) => String::new(),
            };
            state.report(result, msg);
        }
        (KeyCode::Char('l'), KeyModifiers::NONE) => {
            let locked = {
                let mut engine = state.engine();
                let locked = !engine.cursor().locked;
                engine.set_locked(locked);
                locked
            };
            state.set_status(if locked { "Selection locked" } else { "Selection unlocked" });
        }
        (KeyCode::Char('t'), KeyModifiers::NONE) => {
            let result = {
                let mut engine = state.engine();
                let show = !engine.config().show_timestamps;
                engine.set_show_timestamps(show)
            };
            state.report(result, "Timestamp display toggled");
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) => {
            let (result, filter) = {
                let mut engine = state.engine();
                let filter = engine.config().filter_type.next();
                (engine.set_category_filter(filter), filter)
            };
            state.report(result, format!("Showing: {filter}"));
        }
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), KeyModifiers::NONE) => {
            resize_history(state, 1);
        }
        (KeyCode::Char('-'), KeyModifiers::NONE) => {
            resize_history(state, -1);
        }

        (KeyCode::Char('c'), KeyModifiers::NONE) => {
            state.mode = Mode::ConfirmClear;
        }
        (KeyCode::Char('?'), _) => {
            state.show_help = true;
        }
        (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => {
            state.should_quit = true;
        }

        _ => {}
    }
}

fn paste_selected(state: &mut AppState) {
    let result = engine::lock(&state.engine).paste(state.clipboard.as_mut());
    let msg = match &result {
        Ok(content) => format!("Copied: {}", truncate_chars(content, 40)),
        Err(_) => String::new(),
    };
    state.report(result, msg);
}

fn enter_edit_mode(state: &mut AppState) {
    let target = {
        let engine = state.engine();
        engine.cursor().selected().and_then(|row| {
            let pinned = engine.pin_displayed(row)?;
            let content = engine.selected_item()?.content.clone();
            Some((pinned, content))
        })
    };

    match target {
        Some((pinned, content)) => {
            state.edit_target = Some(pinned);
            state.start_line_edit(Mode::Edit, content);
        }
        None => state.set_status("Nothing to edit"),
    }
}

fn resize_history(state: &mut AppState, delta: isize) {
    let result = {
        let mut engine = state.engine();
        let size = engine.config().history_size.saturating_add_signed(delta);
        engine.set_history_size(size).map(|()| size)
    };
    let msg = match &result {
        Ok(size) => format!("History size: {size}"),
        Err(_) => String::new(),
    };
    state.report(result, msg);
}

fn handle_edit_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc => {
            state.finish_line_edit();
        }
        KeyCode::Enter => {
            let target = state.edit_target.take();
            let content = state.finish_line_edit();
            if let Some(pinned) = target {
                let result = state.engine().edit_pinned(&pinned, content);
                state.report(result, "Item updated");
            }
        }
        _ => {
            edit_line(key, state);
        }
    }
}

fn handle_search_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc => {
            state.finish_line_edit();
            state.engine().set_filter("");
        }
        KeyCode::Enter => {
            state.finish_line_edit();
        }
        _ => {
            if edit_line(key, state) {
                let filter = state.edit_buffer.clone();
                state.engine().set_filter(filter);
            }
        }
    }
}

fn handle_confirm_clear(key: KeyEvent, state: &mut AppState) {
    state.mode = Mode::Navigate;
    if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        let result = state.engine().clear();
        state.report(result, "History cleared");
    } else {
        state.set_status("Clear cancelled");
    }
}

/// Single-line editing on `edit_buffer`. Returns whether the text changed.
fn edit_line(key: KeyEvent, state: &mut AppState) -> bool {
    match key.code {
        KeyCode::Backspace => {
            if state.edit_cursor_pos > 0 {
                let start = prev_char_boundary(&state.edit_buffer, state.edit_cursor_pos);
                state.edit_buffer.replace_range(start..state.edit_cursor_pos, "");
                state.edit_cursor_pos = start;
                return true;
            }
        }
        KeyCode::Left => {
            state.edit_cursor_pos = prev_char_boundary(&state.edit_buffer, state.edit_cursor_pos);
        }
        KeyCode::Right => {
            state.edit_cursor_pos = next_char_boundary(&state.edit_buffer, state.edit_cursor_pos);
        }
        KeyCode::Home => {
            state.edit_cursor_pos = 0;
        }
        KeyCode::End => {
            state.edit_cursor_pos = state.edit_buffer.len();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.edit_buffer.insert(state.edit_cursor_pos, c);
            state.edit_cursor_pos += c.len_utf8();
            return true;
        }
        _ => {}
    }
    false
}
