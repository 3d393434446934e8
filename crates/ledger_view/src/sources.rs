//! Contracts of the data collaborators the dashboard reads from and writes to.
//!
//! The view core never calls these itself; the host runs them for the
//! [`FetchRequest`](crate::FetchRequest)s the coordinator issues. Futures are
//! `Send` so hosts can spawn them on a multi-threaded runtime.
use std::future::Future;

use api_types::{
    Selection,
    record::{NewRecord, RecordQuery, TransactionRecord},
    spending::NamedRef,
};

use crate::SourceError;

pub trait SpendingGroupSource {
    fn list_spending_groups(
        &self,
    ) -> impl Future<Output = Result<Vec<NamedRef>, SourceError>> + Send;
}

pub trait CategorySource {
    /// Categories of `spending`, or every category for "All".
    fn list_categories(
        &self,
        spending: &Selection,
    ) -> impl Future<Output = Result<Vec<NamedRef>, SourceError>> + Send;
}

pub trait RecordSource {
    fn list_records(
        &self,
        query: &RecordQuery,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, SourceError>> + Send;
}

pub trait RecordMutator {
    fn delete_record(&self, id: &str) -> impl Future<Output = Result<(), SourceError>> + Send;

    /// Returns the id of the created record.
    fn create_record(
        &self,
        record: NewRecord,
    ) -> impl Future<Output = Result<String, SourceError>> + Send;
}

/// Everything a dashboard host needs from its data service.
pub trait Ledger: SpendingGroupSource + CategorySource + RecordSource + RecordMutator {}

impl<T> Ledger for T where T: SpendingGroupSource + CategorySource + RecordSource + RecordMutator {}
