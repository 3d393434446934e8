use ledger_view::{ModalHost, OptionList, Selection, SortDirection, SortField};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{AppState, DATE_FORMAT, FilterField, FocusTarget},
    ui::{
        components::{
            card::{Card, SummaryCard},
            money::{styled_row_amount, styled_total},
        },
        theme::Theme,
    },
};

/// Table columns and the field each one sorts by; the number key selecting
/// a column is its position plus one.
const COLUMNS: [(&str, SortField); 7] = [
    ("Date", SortField::ExpenseDate),
    ("Expense Name", SortField::Name),
    ("Category", SortField::Category),
    ("Spending", SortField::Spending),
    ("Bank", SortField::Bank),
    ("Type", SortField::TransactionType),
    ("Amount", SortField::Amount),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_filters(frame, layout[0], state, &theme);
    render_summary(frame, layout[1], state, &theme);
    render_table(frame, layout[2], state, &theme);
    render_status(frame, layout[3], state, &theme);
}

fn render_filters(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    let filter = state.view.filter();
    let focused = state.host.focused_filter();

    let fields = [
        (
            FilterField::Spending,
            select_label(state.view.spending_options(), &filter.spending),
        ),
        (
            FilterField::Category,
            select_label(state.view.category_options(), &filter.category),
        ),
        (
            FilterField::StartDate,
            filter.start_date.format(DATE_FORMAT).to_string(),
        ),
        (
            FilterField::EndDate,
            filter.end_date.format(DATE_FORMAT).to_string(),
        ),
    ];

    for (area, (field, value)) in columns.iter().zip(fields) {
        let is_focused = focused == Some(field);
        let is_date = matches!(field, FilterField::StartDate | FilterField::EndDate);
        let text = match (&state.date_draft, is_focused && is_date) {
            (Some(draft), true) => format!("{draft}_"),
            _ if is_focused && !is_date => format!("◂ {value} ▸"),
            _ => value,
        };
        let style = if is_focused {
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        let block = Card::new(field.label(), theme).focused(is_focused).block();
        frame.render_widget(Paragraph::new(Span::styled(text, style)).block(block), *area);
    }
}

fn select_label(options: &OptionList, value: &Selection) -> String {
    options
        .label_of(value)
        .unwrap_or(value.as_str())
        .to_string()
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);
    let totals = state.view.aggregates();
    let currency = state.currency.as_str();

    SummaryCard::new(
        "Total Income",
        styled_total(totals.total_income, currency, theme),
        theme,
    )
    .render(frame, columns[0]);
    SummaryCard::new(
        "Total Expense",
        styled_total(totals.total_expense, currency, theme),
        theme,
    )
    .render(frame, columns[1]);
    SummaryCard::new("Net", styled_total(totals.net, currency, theme), theme)
        .render(frame, columns[2]);
}

fn render_table(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let view = &state.view;
    let sort = view.sort_spec();

    let header = Row::new(COLUMNS.iter().enumerate().map(|(i, (label, field))| {
        let marker = match sort {
            Some(spec) if spec.field == *field => match spec.direction {
                SortDirection::Asc => " ▲",
                SortDirection::Desc => " ▼",
            },
            _ => "",
        };
        Cell::from(format!("{}·{label}{marker}", i + 1))
    }))
    .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

    let dash = || "-".to_string();
    let rows = view.visible_rows().iter().map(|row| {
        Row::new(vec![
            Cell::from(row.expense_date.format(DATE_FORMAT).to_string()),
            Cell::from(row.name.clone()),
            Cell::from(row.category.clone().unwrap_or_else(dash)),
            Cell::from(row.spending.clone().unwrap_or_else(dash)),
            Cell::from(row.bank.clone().unwrap_or_else(dash)),
            Cell::from(row.transaction_type.label()),
            Cell::from(styled_row_amount(
                row.amount,
                row.transaction_type,
                &state.currency,
                theme,
            )),
        ])
    });

    let widths = [
        Constraint::Length(10),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(16),
    ];

    let mut title = format!(
        "Expenses {}/{}",
        view.visible_rows().len(),
        view.rows().len()
    );
    if view.is_fetching_records() {
        title.push_str(" · loading");
    }
    let focused = state.host.focused() == Some(FocusTarget::Table);
    let mut block = Card::new(&title, theme).focused(focused).block();
    if state.host.is_scroll_locked() {
        block = block.style(Style::default().bg(theme.background).fg(theme.dim));
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("» ");

    let mut table_state = TableState::default();
    if focused && !view.visible_rows().is_empty() {
        table_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn render_status(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let view = &state.view;
    let mut parts = Vec::new();
    if let Some(row) = state.selected_row() {
        parts.push(Span::styled("Record", Style::default().fg(theme.dim)));
        parts.push(Span::raw(format!(": {}   ", row.record_link)));
    }
    let remaining = view.rows().len() - view.visible_rows().len();
    if view.is_loading_more() {
        parts.push(Span::styled("Loading more…", Style::default().fg(theme.accent)));
    } else if view.has_more() {
        parts.push(Span::styled(
            format!("{remaining} more, press m or scroll down"),
            Style::default().fg(theme.dim),
        ));
    } else if !view.rows().is_empty() {
        parts.push(Span::styled("All records shown", Style::default().fg(theme.dim)));
    } else if !view.is_fetching_records() {
        parts.push(Span::styled(
            "No records for this filter",
            Style::default().fg(theme.dim),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
