use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Error body returned by the ledger service on non-2xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A filter value: either the synthetic "All" entry or a concrete id.
///
/// On the wire this is a plain string, `"All"` or the id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Id(String),
}

impl Selection {
    pub const ALL_LABEL: &'static str = "All";

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Id(id) => Some(id.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Id(id) => id.as_str(),
        }
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value == Self::ALL_LABEL {
            Self::All
        } else {
            Self::Id(value)
        }
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Selection> for String {
    fn from(value: Selection) -> Self {
        match value {
            Selection::All => Selection::ALL_LABEL.to_string(),
            Selection::Id(id) => id,
        }
    }
}

pub mod spending {
    use super::*;

    /// Id/name pair used for spending groups and categories alike.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NamedRef {
        pub id: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingGroupsResponse {
        pub spendings: Vec<NamedRef>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<NamedRef>,
    }
}

pub mod record {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub enum TransactionType {
        Income,
        Expense,
    }

    impl TransactionType {
        pub fn label(self) -> &'static str {
            match self {
                Self::Income => "Income",
                Self::Expense => "Expense",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SpendingRef {
        pub id: String,
        pub name: String,
    }

    /// Category reference as nested in a record. The spending group is
    /// resolved through the category and may be missing.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryRef {
        pub id: String,
        pub name: String,
        #[serde(default)]
        pub spending: Option<SpendingRef>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionRecord {
        pub id: String,
        pub expense_date: NaiveDate,
        pub name: String,
        #[serde(default)]
        pub category: Option<CategoryRef>,
        #[serde(default)]
        pub bank: Option<String>,
        pub transaction_type: TransactionType,
        /// Magnitude in minor units; the sign comes from `transaction_type`.
        #[serde(default)]
        pub amount_minor: Option<i64>,
    }

    /// Request body for listing the records matching a filter selection.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RecordQuery {
        pub spending_id: Selection,
        pub category_id: Selection,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordListResponse {
        pub records: Vec<TransactionRecord>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NewRecord {
        pub name: String,
        pub expense_date: NaiveDate,
        pub category_id: Option<String>,
        pub bank: Option<String>,
        pub transaction_type: TransactionType,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordCreated {
        pub id: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_round_trips_as_plain_string() {
        let all = serde_json::to_string(&Selection::All).unwrap();
        assert_eq!(all, "\"All\"");

        let id: Selection = serde_json::from_str("\"a0B5\"").unwrap();
        assert_eq!(id, Selection::Id("a0B5".to_string()));
    }

    #[test]
    fn record_tolerates_missing_references() {
        let json = r#"{
            "id": "r1",
            "expense_date": "2025-03-04",
            "name": "Coffee",
            "transaction_type": "Expense"
        }"#;
        let record: record::TransactionRecord = serde_json::from_str(json).unwrap();
        assert!(record.category.is_none());
        assert!(record.bank.is_none());
        assert!(record.amount_minor.is_none());
    }
}
