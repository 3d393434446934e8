use ledger_view::Severity;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{app::Toast, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, toast: Option<&Toast>) {
    let Some(toast) = toast else {
        return;
    };
    let theme = Theme::default();
    let notification = &toast.notification;
    let text_width = notification.title.len().max(notification.message.len());
    let width = (text_width + 4).min(area.width as usize) as u16;
    let height = 4u16;
    let x = area.x + area.width.saturating_sub(width);
    let y = area
        .y
        .saturating_add(area.height.saturating_sub(height + 1));
    let rect = Rect {
        x,
        y,
        width,
        height,
    };

    let style = match notification.severity {
        Severity::Success => Style::default().fg(theme.positive),
        Severity::Error => Style::default().fg(theme.error),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style);
    let lines = vec![
        Line::from(Span::styled(
            notification.title.as_str(),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            notification.message.as_str(),
            Style::default().fg(theme.text),
        )),
    ];
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
