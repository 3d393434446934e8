use api_types::record::TransactionType;

use crate::{DisplayRow, MoneyCents};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub total_income: MoneyCents,
    pub total_expense: MoneyCents,
    pub net: MoneyCents,
}

/// Totals over `rows`. Callers pass the whole filtered set, never the
/// visible slice.
pub fn aggregate(rows: &[DisplayRow]) -> Aggregates {
    let (total_income, total_expense) = rows.iter().fold(
        (MoneyCents::ZERO, MoneyCents::ZERO),
        |(income, expense), row| match row.transaction_type {
            TransactionType::Income => (income + row.amount, expense),
            TransactionType::Expense => (income, expense + row.amount),
        },
    );

    Aggregates {
        total_income,
        total_expense,
        net: total_income - total_expense,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn row(kind: TransactionType, cents: i64) -> DisplayRow {
        DisplayRow {
            id: format!("{kind:?}-{cents}"),
            expense_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            name: "row".to_string(),
            record_link: "/row".to_string(),
            category: None,
            spending: None,
            bank: None,
            transaction_type: kind,
            amount: MoneyCents::new(cents),
        }
    }

    #[test]
    fn empty_set_is_all_zero() {
        assert_eq!(aggregate(&[]), Aggregates::default());
    }

    #[test]
    fn net_is_income_minus_expense() {
        let rows = [
            row(TransactionType::Income, 50_000),
            row(TransactionType::Expense, 12_550),
            row(TransactionType::Income, 1_000),
            row(TransactionType::Expense, 99),
        ];
        let totals = aggregate(&rows);

        assert_eq!(totals.total_income, MoneyCents::new(51_000));
        assert_eq!(totals.total_expense, MoneyCents::new(12_649));
        assert_eq!(totals.net, totals.total_income - totals.total_expense);
        assert!(!totals.total_income.is_negative());
        assert!(!totals.total_expense.is_negative());
    }

    #[test]
    fn net_can_go_negative() {
        let totals = aggregate(&[row(TransactionType::Expense, 700)]);
        assert_eq!(totals.net, MoneyCents::new(-700));
    }
}
