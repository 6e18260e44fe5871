use crate::app::{AppState, Mode};
use crate::engine::ClipboardEngine;
use crate::utils::unicode::truncate_width;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, state: &AppState, engine: &ClipboardEngine, area: Rect) {
    let available_width = area.width.saturating_sub(2) as usize;
    let show_timestamps = engine.config().show_timestamps;
    let selected = engine.cursor().selected();
    let editing = match (&state.mode, &state.edit_target) {
        (Mode::Edit, Some(pinned)) => engine.displayed_row(pinned),
        _ => None,
    };

    let items: Vec<ListItem> = engine
        .displayed()
        .iter()
        .enumerate()
        .map(|(row, (_, item))| {
            if editing == Some(row) {
                return ListItem::new(edit_line(state, available_width));
            }

            let label = format!("{}: ", item.category);
            let summary = item.summary(false);
            let preview = summary.strip_prefix(&label).unwrap_or(&summary);

            let mut spans = vec![
                Span::styled(label.clone(), Style::default().fg(state.theme.category_color(item.category))),
                Span::styled(
                    truncate_width(preview, available_width.saturating_sub(label.width())).to_string(),
                    Style::default().fg(state.theme.foreground),
                ),
            ];
            if show_timestamps {
                spans.push(Span::styled(
                    format!(" {}", item.timestamp_str()),
                    Style::default().fg(state.theme.timestamp),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if engine.filter().is_empty() {
        " Clipboard History ".to_string()
    } else {
        format!(" Clipboard History (filter: {}) ", engine.filter())
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().bg(state.theme.background))
        .highlight_style(
            Style::default()
                .fg(state.theme.cursor)
                .add_modifier(Modifier::REVERSED),
        );

    let mut list_state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut list_state);
}

fn edit_line(state: &AppState, available_width: usize) -> Line<'static> {
    let (before, after) = state.edit_buffer.split_at(state.edit_cursor_pos);
    let before = before.to_string();
    let after = after.to_string();
    let budget = available_width.saturating_sub(1);
    let before = if before.width() > budget {
        before.chars().rev().take(budget).collect::<Vec<_>>().into_iter().rev().collect()
    } else {
        before
    };

    Line::from(vec![
        Span::styled(before, Style::default().fg(state.theme.foreground)),
        Span::styled("▏", Style::default().fg(state.theme.cursor)),
        Span::styled(after, Style::default().fg(state.theme.foreground)),
    ])
}
