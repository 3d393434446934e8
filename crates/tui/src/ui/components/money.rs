use api_types::record::TransactionType;
use ledger_view::MoneyCents;
use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

pub fn format_amount(amount: MoneyCents, currency: &str) -> String {
    if amount.is_negative() {
        format!("-{currency} {}", amount.magnitude())
    } else {
        format!("{currency} {amount}")
    }
}

/// Row amount, colored by transaction type.
pub fn styled_row_amount(
    amount: MoneyCents,
    kind: TransactionType,
    currency: &str,
    theme: &Theme,
) -> Span<'static> {
    let color = match kind {
        TransactionType::Income => theme.positive,
        TransactionType::Expense => theme.negative,
    };
    Span::styled(format_amount(amount, currency), Style::default().fg(color))
}

/// Total with sign-based coloring; zero stays neutral.
pub fn styled_total(amount: MoneyCents, currency: &str, theme: &Theme) -> Span<'static> {
    let color = match amount.cents() {
        0 => theme.text,
        cents if cents > 0 => theme.positive,
        _ => theme.negative,
    };
    Span::styled(format_amount(amount, currency), Style::default().fg(color))
}
