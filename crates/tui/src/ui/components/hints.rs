use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub const TABLE: &[KeyHint] = &[
    KeyHint::new("↑↓", "select"),
    KeyHint::new("1-7", "sort"),
    KeyHint::new("m", "more"),
    KeyHint::new("n", "new"),
    KeyHint::new("d", "delete"),
    KeyHint::new("r", "refresh"),
];

pub const SELECT_FILTER: &[KeyHint] = &[KeyHint::new("←→", "change"), KeyHint::new("Esc", "table")];

pub const DATE_FILTER: &[KeyHint] = &[
    KeyHint::new("↑↓", "day"),
    KeyHint::new("0-9", "type"),
    KeyHint::new("Enter", "apply"),
    KeyHint::new("Esc", "discard"),
];

pub const DIALOG: &[KeyHint] = &[
    KeyHint::new("Tab", "next"),
    KeyHint::new("←→", "choose"),
    KeyHint::new("Enter", "press"),
    KeyHint::new("Esc", "close"),
];

pub const CONFIRM: &[KeyHint] = &[KeyHint::new("y", "delete"), KeyHint::new("n", "keep")];

pub const GLOBAL: &[KeyHint] = &[KeyHint::new("Tab", "focus"), KeyHint::new("q", "quit")];
