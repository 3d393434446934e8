//! View-side core of the spending dashboard.
//!
//! The crate turns a filter selection into the rows, totals and visible slice
//! shown by a dashboard, and drives the modal used to create new expenses.
//! It never performs I/O: fetches are described as [`FetchRequest`]s that the
//! host runs against the collaborators in [`sources`], then feeds back with
//! the token they were issued with.

pub use aggregate::{Aggregates, aggregate};
pub use api_types::Selection;
pub use coordinator::{FetchRequest, GenerationToken, ViewCoordinator};
pub use error::{SourceError, ViewError};
pub use filter::{FilterOption, FilterSelection, FilterState, OptionList};
pub use modal::{
    ElementKind, FormFields, Focusable, KeyOutcome, ListenerHandle, ModalController, ModalEvent,
    ModalHost, ModalKey, ModalState, save_failed_notification, saved_notification,
};
pub use money::MoneyCents;
pub use notify::{Notification, NotificationSink, Severity};
pub use paginate::{BASELINE_VISIBLE, LOAD_MORE_STEP, LoadTicket, Paginator};
pub use projector::{DisplayRow, project, record_link};
pub use sort::{SortDirection, SortField, SortSpec, sort_rows};

pub mod aggregate;
pub mod coordinator;
pub mod filter;
pub mod modal;
pub mod notify;
pub mod paginate;
pub mod projector;
pub mod sort;
pub mod sources;

mod error;
mod money;
