use std::{cmp::Ordering, str::FromStr};

use crate::{DisplayRow, ViewError};

/// Sortable columns, named after the field they read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortField {
    ExpenseDate,
    Name,
    RecordLink,
    Category,
    Spending,
    Bank,
    TransactionType,
    Amount,
}

impl SortField {
    pub fn field_name(self) -> &'static str {
        match self {
            Self::ExpenseDate => "expenseDate",
            Self::Name => "name",
            Self::RecordLink => "recordLink",
            Self::Category => "category",
            Self::Spending => "spending",
            Self::Bank => "bank",
            Self::TransactionType => "transactionType",
            Self::Amount => "amount",
        }
    }
}

impl FromStr for SortField {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expenseDate" => Ok(Self::ExpenseDate),
            "name" => Ok(Self::Name),
            "recordLink" => Ok(Self::RecordLink),
            "category" => Ok(Self::Category),
            "spending" => Ok(Self::Spending),
            "bank" => Ok(Self::Bank),
            "transactionType" => Ok(Self::TransactionType),
            "amount" => Ok(Self::Amount),
            other => Err(ViewError::UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ViewError::UnknownSortDirection(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Sorts `rows` in place by one column.
///
/// Dates and amounts compare naturally, text lexicographically, and a missing
/// value sorts before any present one. Callers must not rely on the relative
/// order of rows with equal keys.
pub fn sort_rows(rows: &mut [DisplayRow], spec: SortSpec) {
    rows.sort_by(|a, b| {
        let ordering = compare_field(a, b, spec.field);
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_field(a: &DisplayRow, b: &DisplayRow, field: SortField) -> Ordering {
    match field {
        SortField::ExpenseDate => a.expense_date.cmp(&b.expense_date),
        SortField::Name => a.name.cmp(&b.name),
        SortField::RecordLink => a.record_link.cmp(&b.record_link),
        SortField::Category => a.category.cmp(&b.category),
        SortField::Spending => a.spending.cmp(&b.spending),
        SortField::Bank => a.bank.cmp(&b.bank),
        SortField::TransactionType => a.transaction_type.cmp(&b.transaction_type),
        SortField::Amount => a.amount.cmp(&b.amount),
    }
}

#[cfg(test)]
mod tests {
    use api_types::record::TransactionType;
    use chrono::NaiveDate;

    use super::*;
    use crate::MoneyCents;

    fn row(id: &str, day: u32, name: &str, bank: Option<&str>, cents: i64) -> DisplayRow {
        DisplayRow {
            id: id.to_string(),
            expense_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            name: name.to_string(),
            record_link: format!("/{id}"),
            category: None,
            spending: None,
            bank: bank.map(str::to_string),
            transaction_type: TransactionType::Expense,
            amount: MoneyCents::new(cents),
        }
    }

    fn rows() -> Vec<DisplayRow> {
        vec![
            row("r1", 12, "Rent", Some("BDO"), 1_500_000),
            row("r2", 3, "Coffee", None, 18_000),
            row("r3", 27, "Books", Some("BPI"), 95_000),
            row("r4", 8, "Taxi", Some("Amex"), 32_050),
        ]
    }

    fn ids(rows: &[DisplayRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn sorts_dates_and_amounts_naturally() {
        let mut by_date = rows();
        sort_rows(&mut by_date, SortSpec::new(SortField::ExpenseDate, SortDirection::Asc));
        assert_eq!(ids(&by_date), ["r2", "r4", "r1", "r3"]);

        let mut by_amount = rows();
        sort_rows(&mut by_amount, SortSpec::new(SortField::Amount, SortDirection::Desc));
        assert_eq!(ids(&by_amount), ["r1", "r3", "r4", "r2"]);
    }

    #[test]
    fn descending_reverses_ascending() {
        for field in [SortField::ExpenseDate, SortField::Name, SortField::Amount] {
            let mut asc = rows();
            sort_rows(&mut asc, SortSpec::new(field, SortDirection::Asc));
            let mut desc = rows();
            sort_rows(&mut desc, SortSpec::new(field, SortDirection::Desc));

            let mut reversed = ids(&asc);
            reversed.reverse();
            assert_eq!(ids(&desc), reversed, "field {}", field.field_name());
        }
    }

    #[test]
    fn missing_values_sort_first() {
        let mut by_bank = rows();
        sort_rows(&mut by_bank, SortSpec::new(SortField::Bank, SortDirection::Asc));
        assert_eq!(ids(&by_bank), ["r2", "r4", "r1", "r3"]);
    }

    #[test]
    fn parses_column_field_names() {
        assert_eq!("expenseDate".parse::<SortField>(), Ok(SortField::ExpenseDate));
        assert_eq!("recordLink".parse::<SortField>(), Ok(SortField::RecordLink));
        assert!("Amount__c".parse::<SortField>().is_err());
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!(SortDirection::Desc.toggled(), SortDirection::Asc);
    }
}
