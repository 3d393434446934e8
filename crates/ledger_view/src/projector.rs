use api_types::record::{TransactionRecord, TransactionType};
use chrono::NaiveDate;

use crate::MoneyCents;

/// Flat, denormalized row as shown in the ledger table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: String,
    pub expense_date: NaiveDate,
    pub name: String,
    pub record_link: String,
    pub category: Option<String>,
    pub spending: Option<String>,
    pub bank: Option<String>,
    pub transaction_type: TransactionType,
    pub amount: MoneyCents,
}

/// Path of the record page for `id`.
pub fn record_link(id: &str) -> String {
    format!("/{id}")
}

/// Maps fetched records to display rows, keeping the server order.
pub fn project(records: &[TransactionRecord]) -> Vec<DisplayRow> {
    records.iter().map(project_one).collect()
}

fn project_one(record: &TransactionRecord) -> DisplayRow {
    let category = record.category.as_ref();
    DisplayRow {
        id: record.id.clone(),
        expense_date: record.expense_date,
        name: record.name.clone(),
        record_link: record_link(&record.id),
        category: category.map(|c| c.name.clone()),
        spending: category
            .and_then(|c| c.spending.as_ref())
            .map(|s| s.name.clone()),
        bank: record.bank.clone(),
        transaction_type: record.transaction_type,
        amount: MoneyCents::new(record.amount_minor.unwrap_or_default()).magnitude(),
    }
}
