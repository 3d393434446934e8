use ledger_view::{ModalHost, ModalState};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, FocusTarget},
    ui::{centered_rect, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    if !state.modal.is_visible() {
        return;
    }
    let theme = Theme::default();
    let closing = state.modal.state() == ModalState::Closing;
    let rect = centered_rect(area, 56, 16);
    let form = &state.form;
    let focused = state.host.focused();

    let field = |target: FocusTarget, label: &'static str, value: String| -> Line<'static> {
        let active = focused == Some(target);
        let value_style = if active {
            Style::default().fg(theme.text).add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(theme.text)
        };
        Line::from(vec![
            Span::styled(format!("{label:<10}"), Style::default().fg(theme.dim)),
            Span::styled(value, value_style),
        ])
    };
    let choice = |value: &str| format!("◂ {value} ▸");
    let category = match form.category.id() {
        None => "None".to_string(),
        Some(id) => state
            .view
            .category_options()
            .label_of(&form.category)
            .unwrap_or(id)
            .to_string(),
    };

    let mut lines = vec![
        Line::from(""),
        field(FocusTarget::FormName, "Name", form.name.clone()),
        field(FocusTarget::FormDate, "Date", form.date.clone()),
        field(FocusTarget::FormAmount, "Amount", form.amount.clone()),
        field(
            FocusTarget::FormType,
            "Type",
            choice(form.transaction_type.label()),
        ),
        field(FocusTarget::FormCategory, "Category", choice(&category)),
        field(FocusTarget::FormBank, "Bank", form.bank.clone()),
        Line::from(""),
    ];

    lines.push(match &form.error {
        Some(error) => Line::from(Span::styled(error.clone(), Style::default().fg(theme.error))),
        None => Line::from(""),
    });
    lines.push(Line::from(""));

    let button = |target: FocusTarget, label: &str| {
        let style = if focused == Some(target) {
            Style::default()
                .fg(theme.background)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.accent)
        };
        Span::styled(format!("[ {label} ]"), style)
    };
    let save_label = if state.is_saving() { "Saving…" } else { "Save" };
    lines.push(
        Line::from(vec![
            button(FocusTarget::FormCancel, "Cancel"),
            Span::raw("   "),
            button(FocusTarget::FormSave, save_label),
        ])
        .alignment(Alignment::Right),
    );

    let border = if closing { theme.dim } else { theme.accent };
    let block = Block::default()
        .title(Span::styled(
            " New Expense ",
            Style::default().fg(border).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.panel));

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

/// The y/n prompt shown before a record is deleted.
pub fn render_delete_prompt(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let Some(prompt) = &state.delete_prompt else {
        return;
    };
    let theme = Theme::default();
    let rect = centered_rect(area, 50, 5);
    let block = Block::default()
        .title(" Delete Expense ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.error))
        .style(Style::default().bg(theme.panel));
    let lines = vec![
        Line::from(format!("Delete \"{}\"?", prompt.name)),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(" delete   "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" keep"),
        ]),
    ];
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        rect,
    );
}
