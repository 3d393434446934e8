pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ledger_view::ModalHost;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, FilterField, FocusTarget};
use components::hints::{self, KeyHint};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Min(0),    // Dashboard
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    screens::dashboard::render(frame, layout[1], state);
    render_bottom_bar(frame, layout[2], state, &theme);

    screens::expense_dialog::render(frame, area, state);
    screens::expense_dialog::render_delete_prompt(frame, area, state);
    components::toast::render(frame, area, state.toast.current());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(
            "Trackspend",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Source", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.source_label)),
        Span::styled("Currency", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}", state.currency)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = hints::hints_to_spans(context_hints(state), theme);
    if state.delete_prompt.is_none() && !state.modal.is_visible() {
        parts.push(hints::hint_separator(theme));
        parts.extend(hints::hints_to_spans(hints::GLOBAL, theme));
    }
    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Keyboard hints for whatever currently receives keys.
fn context_hints(state: &AppState) -> &'static [KeyHint] {
    if state.delete_prompt.is_some() {
        return hints::CONFIRM;
    }
    if state.modal.is_visible() {
        return hints::DIALOG;
    }
    match state.host.focused() {
        Some(FocusTarget::Filter(FilterField::StartDate | FilterField::EndDate)) => {
            hints::DATE_FILTER
        }
        Some(FocusTarget::Filter(_)) => hints::SELECT_FILTER,
        _ => hints::TABLE,
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to it.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    #[test]
    fn centered_rect_is_clipped() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(area, 80, 40), area);
    }

    #[test]
    fn renders_an_empty_dashboard() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        let state = AppState::new(today, "PHP".to_string(), "memory".to_string());
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, &state)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Total Income"));
        assert!(screen.contains("2025-03-01"));
        assert!(screen.contains("No records for this filter"));
    }
}
