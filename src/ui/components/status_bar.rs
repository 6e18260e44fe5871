use crate::app::{AppState, Mode};
use crate::engine::ClipboardEngine;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn render(f: &mut Frame, state: &AppState, engine: &ClipboardEngine, area: Rect) {
    let base_style = Style::default()
        .fg(state.theme.status_bar_fg)
        .bg(state.theme.status_bar_bg);

    let left_content = match state.mode {
        Mode::Search => format!(" SEARCH | /{}", state.edit_buffer),
        Mode::ConfirmClear => format!(
            " Clear all {} items? (y/n)",
            engine.store().len()
        ),
        _ => {
            let cursor = engine.cursor();
            let lock_indicator = if cursor.locked { " [locked]" } else { "" };
            format!(
                " {} | {}/{} items | {} | after paste: {}{}",
                state.mode,
                engine.store().len(),
                engine.config().history_size,
                engine.config().filter_type,
                cursor.policy,
                lock_indicator
            )
        }
    };

    let right_content = match state.status_text() {
        Some(msg) => msg.to_string(),
        None => format!("? help  q quit  v{VERSION}"),
    };

    let padding = (area.width as usize)
        .saturating_sub(left_content.chars().count() + right_content.chars().count() + 1);

    let style = if state.mode == Mode::ConfirmClear {
        base_style.add_modifier(Modifier::BOLD)
    } else {
        base_style
    };

    let status_line = format!("{}{:padding$} {}", left_content, "", right_content, padding = padding);
    let status = Paragraph::new(Line::from(vec![Span::styled(status_line, style)]));

    f.render_widget(status, area);
}
