pub mod history_list;
pub mod status_bar;

use crate::app::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // History list
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    // One lock per frame so the list and status bar agree
    let engine = state.engine();
    history_list::render(f, state, &engine, chunks[0]);
    status_bar::render(f, state, &engine, chunks[1]);
    drop(engine);

    if state.show_help {
        render_help_overlay(f, state);
    }
}

fn render_help_overlay(f: &mut Frame, state: &AppState) {
    let help_text = r#"
    Clipboard History Help

    Navigate Mode:
      ↑/↓ or j/k            Move selection
      Enter, p or Ctrl+V    Copy selected item to the clipboard
      e or i                Edit selected item
      /                     Filter by text (Esc clears)
      f                     Cycle category filter
      a                     Cycle after-paste move (stay/up/down)
      l                     Lock/unlock selection
      t                     Toggle timestamps
      + / -                 Grow/shrink history size
      c                     Clear history (asks first)
      ?                     Toggle help
      q or Esc              Quit

    Edit/Search Mode:
      Esc                   Cancel
      Enter                 Save
      ←/→  Home/End         Move cursor
      Backspace             Delete character
    "#;

    let area = centered_rect(60, 70, f.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(state.theme.background));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .style(Style::default().fg(state.theme.foreground))
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
