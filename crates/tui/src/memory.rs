//! In-process ledger used when no service is configured.
//!
//! The data set is seeded from a JSON file and lives for the duration of the
//! process. Filtering follows the service: the spending group of a record is
//! the one of its category, the date range is inclusive and records come back
//! newest first.
use std::path::Path;

use api_types::{
    Selection,
    record::{
        CategoryRef, NewRecord, RecordQuery, SpendingRef, TransactionRecord, TransactionType,
    },
    spending::NamedRef,
};
use chrono::NaiveDate;
use ledger_view::{
    SourceError,
    sources::{CategorySource, RecordMutator, RecordSource, SpendingGroupSource},
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub spendings: Vec<NamedRef>,
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub records: Vec<SeedRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub spending_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedRecord {
    pub id: String,
    pub expense_date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub bank: Option<String>,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub amount_minor: Option<i64>,
}

#[derive(Debug, Default)]
pub struct MemoryLedger {
    data: RwLock<SeedData>,
}

impl MemoryLedger {
    pub fn new(data: SeedData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Reads the seed file. A missing file starts an empty ledger.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("{} not found, starting with an empty ledger", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let ledger = Self::from_json(&json)?;
        tracing::info!("seeded memory ledger from {}", path.display());
        Ok(ledger)
    }
}

impl SeedData {
    fn category(&self, id: &str) -> Option<&SeedCategory> {
        self.categories.iter().find(|category| category.id == id)
    }

    fn category_ref(&self, id: &str) -> Option<CategoryRef> {
        let category = self.category(id)?;
        let spending = category.spending_id.as_deref().and_then(|spending_id| {
            self.spendings
                .iter()
                .find(|spending| spending.id == spending_id)
                .map(|spending| SpendingRef {
                    id: spending.id.clone(),
                    name: spending.name.clone(),
                })
        });
        Some(CategoryRef {
            id: category.id.clone(),
            name: category.name.clone(),
            spending,
        })
    }

    fn matches(&self, record: &SeedRecord, query: &RecordQuery) -> bool {
        if record.expense_date < query.start_date || record.expense_date > query.end_date {
            return false;
        }
        if let Some(category_id) = query.category_id.id() {
            if record.category_id.as_deref() != Some(category_id) {
                return false;
            }
        }
        if let Some(spending_id) = query.spending_id.id() {
            let spending = record
                .category_id
                .as_deref()
                .and_then(|id| self.category(id))
                .and_then(|category| category.spending_id.as_deref());
            if spending != Some(spending_id) {
                return false;
            }
        }
        true
    }

    fn to_record(&self, record: &SeedRecord) -> TransactionRecord {
        TransactionRecord {
            id: record.id.clone(),
            expense_date: record.expense_date,
            name: record.name.clone(),
            category: record
                .category_id
                .as_deref()
                .and_then(|id| self.category_ref(id)),
            bank: record.bank.clone(),
            transaction_type: record.transaction_type,
            amount_minor: record.amount_minor,
        }
    }
}

impl SpendingGroupSource for MemoryLedger {
    async fn list_spending_groups(&self) -> std::result::Result<Vec<NamedRef>, SourceError> {
        Ok(self.data.read().await.spendings.clone())
    }
}

impl CategorySource for MemoryLedger {
    async fn list_categories(
        &self,
        spending: &Selection,
    ) -> std::result::Result<Vec<NamedRef>, SourceError> {
        let data = self.data.read().await;
        let categories = data
            .categories
            .iter()
            .filter(|category| match spending.id() {
                None => true,
                Some(id) => category.spending_id.as_deref() == Some(id),
            })
            .map(|category| NamedRef {
                id: category.id.clone(),
                name: category.name.clone(),
            })
            .collect();
        Ok(categories)
    }
}

impl RecordSource for MemoryLedger {
    async fn list_records(
        &self,
        query: &RecordQuery,
    ) -> std::result::Result<Vec<TransactionRecord>, SourceError> {
        let data = self.data.read().await;
        let mut records: Vec<TransactionRecord> = data
            .records
            .iter()
            .filter(|record| data.matches(record, query))
            .map(|record| data.to_record(record))
            .collect();
        records.sort_by(|a, b| b.expense_date.cmp(&a.expense_date));
        Ok(records)
    }
}

impl RecordMutator for MemoryLedger {
    async fn delete_record(&self, id: &str) -> std::result::Result<(), SourceError> {
        let mut data = self.data.write().await;
        let before = data.records.len();
        data.records.retain(|record| record.id != id);
        if data.records.len() == before {
            return Err(SourceError::NotFound(id.to_string()));
        }
        tracing::info!("deleted record {id}");
        Ok(())
    }

    async fn create_record(&self, record: NewRecord) -> std::result::Result<String, SourceError> {
        if record.name.trim().is_empty() {
            return Err(SourceError::Validation("Name is required.".to_string()));
        }
        if record.amount_minor <= 0 {
            return Err(SourceError::Validation(
                "Amount must be greater than zero.".to_string(),
            ));
        }

        let mut data = self.data.write().await;
        if let Some(category_id) = record.category_id.as_deref() {
            if data.category(category_id).is_none() {
                return Err(SourceError::Validation(format!(
                    "Unknown category {category_id}."
                )));
            }
        }

        let id = Uuid::new_v4().to_string();
        data.records.push(SeedRecord {
            id: id.clone(),
            expense_date: record.expense_date,
            name: record.name.trim().to_string(),
            category_id: record.category_id,
            bank: record.bank,
            transaction_type: record.transaction_type,
            amount_minor: Some(record.amount_minor),
        });
        tracing::info!("created record {id}");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"{
        "spendings": [
            { "id": "s-home", "name": "Household" },
            { "id": "s-fun", "name": "Leisure" }
        ],
        "categories": [
            { "id": "c-food", "name": "Groceries", "spending_id": "s-home" },
            { "id": "c-rent", "name": "Rent", "spending_id": "s-home" },
            { "id": "c-film", "name": "Cinema", "spending_id": "s-fun" },
            { "id": "c-misc", "name": "Misc" }
        ],
        "records": [
            { "id": "r1", "expense_date": "2025-03-02", "name": "Market", "category_id": "c-food",
              "bank": "BPI", "transaction_type": "Expense", "amount_minor": 125050 },
            { "id": "r2", "expense_date": "2025-03-01", "name": "March rent", "category_id": "c-rent",
              "transaction_type": "Expense", "amount_minor": 1500000 },
            { "id": "r3", "expense_date": "2025-03-09", "name": "Movie night", "category_id": "c-film",
              "transaction_type": "Expense", "amount_minor": 45000 },
            { "id": "r4", "expense_date": "2025-03-15", "name": "Salary",
              "transaction_type": "Income", "amount_minor": 5000000 },
            { "id": "r5", "expense_date": "2025-04-01", "name": "April rent", "category_id": "c-rent",
              "transaction_type": "Expense", "amount_minor": 1500000 }
        ]
    }"#;

    fn ledger() -> MemoryLedger {
        MemoryLedger::from_json(SEED).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march(spending: &str, category: &str) -> RecordQuery {
        RecordQuery {
            spending_id: Selection::from(spending),
            category_id: Selection::from(category),
            start_date: date(2025, 3, 1),
            end_date: date(2025, 3, 31),
        }
    }

    fn ids(records: &[TransactionRecord]) -> Vec<&str> {
        records.iter().map(|record| record.id.as_str()).collect()
    }

    #[tokio::test]
    async fn lists_newest_first_within_an_inclusive_range() {
        let records = ledger().list_records(&march("All", "All")).await.unwrap();
        assert_eq!(ids(&records), ["r4", "r3", "r1", "r2"]);
    }

    #[tokio::test]
    async fn spending_filter_goes_through_the_category() {
        let ledger = ledger();
        let records = ledger.list_records(&march("s-home", "All")).await.unwrap();
        assert_eq!(ids(&records), ["r1", "r2"]);

        let records = ledger.list_records(&march("s-home", "c-rent")).await.unwrap();
        assert_eq!(ids(&records), ["r2"]);
        let spending = records[0]
            .category
            .as_ref()
            .and_then(|category| category.spending.as_ref())
            .map(|spending| spending.name.as_str());
        assert_eq!(spending, Some("Household"));
    }

    #[tokio::test]
    async fn reversed_range_yields_nothing() {
        let mut query = march("All", "All");
        std::mem::swap(&mut query.start_date, &mut query.end_date);
        assert!(ledger().list_records(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn categories_are_scoped_to_the_spending_group() {
        let ledger = ledger();
        let all = ledger.list_categories(&Selection::All).await.unwrap();
        assert_eq!(all.len(), 4);

        let fun = ledger
            .list_categories(&Selection::from("s-fun"))
            .await
            .unwrap();
        assert_eq!(fun, vec![NamedRef {
            id: "c-film".to_string(),
            name: "Cinema".to_string(),
        }]);
    }

    #[tokio::test]
    async fn create_then_delete() {
        let ledger = ledger();
        let id = ledger
            .create_record(NewRecord {
                name: " Coffee ".to_string(),
                expense_date: date(2025, 3, 20),
                category_id: Some("c-food".to_string()),
                bank: None,
                transaction_type: TransactionType::Expense,
                amount_minor: 15000,
            })
            .await
            .unwrap();

        let records = ledger.list_records(&march("All", "c-food")).await.unwrap();
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].name, "Coffee");

        ledger.delete_record(&id).await.unwrap();
        assert_eq!(
            ledger.delete_record(&id).await,
            Err(SourceError::NotFound(id.clone()))
        );
    }

    #[tokio::test]
    async fn create_rejects_unknown_category_and_zero_amount() {
        let ledger = ledger();
        let mut record = NewRecord {
            name: "Gift".to_string(),
            expense_date: date(2025, 3, 20),
            category_id: Some("c-nope".to_string()),
            bank: None,
            transaction_type: TransactionType::Expense,
            amount_minor: 100,
        };
        assert!(matches!(
            ledger.create_record(record.clone()).await,
            Err(SourceError::Validation(_))
        ));

        record.category_id = None;
        record.amount_minor = 0;
        assert!(matches!(
            ledger.create_record(record).await,
            Err(SourceError::Validation(_))
        ));
    }

    #[test]
    fn missing_seed_file_starts_empty() {
        let ledger = MemoryLedger::load("does/not/exist.json").unwrap();
        assert!(ledger.data.try_read().unwrap().records.is_empty());
    }
}
