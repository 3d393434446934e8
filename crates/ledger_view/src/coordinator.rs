//! Wires the filter, the fetched records and the derived view together.
//!
//! The coordinator is a plain state machine: setters return the
//! [`FetchRequest`]s to run and the host reports each result back with the
//! token it was issued under. A result whose token is no longer the latest
//! one for its kind is dropped, so out-of-order responses cannot overwrite a
//! newer view.
use api_types::{
    Selection,
    record::{RecordQuery, TransactionRecord},
    spending::NamedRef,
};
use chrono::NaiveDate;

use crate::{
    Aggregates, DisplayRow, FilterSelection, FilterState, LoadTicket, Notification,
    NotificationSink, OptionList, Paginator, SortSpec, SourceError, ViewError, aggregate, project,
    sort_rows,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationToken(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchRequest {
    SpendingGroups {
        token: GenerationToken,
    },
    Categories {
        token: GenerationToken,
        spending: Selection,
    },
    Records {
        token: GenerationToken,
        query: RecordQuery,
    },
}

impl FetchRequest {
    pub fn token(&self) -> GenerationToken {
        match self {
            Self::SpendingGroups { token }
            | Self::Categories { token, .. }
            | Self::Records { token, .. } => *token,
        }
    }
}

#[derive(Debug, Default)]
struct Generations {
    issued: u64,
    spending_groups: Option<GenerationToken>,
    categories: Option<GenerationToken>,
    records: Option<GenerationToken>,
}

impl Generations {
    fn next(&mut self) -> GenerationToken {
        self.issued += 1;
        GenerationToken(self.issued)
    }
}

#[derive(Debug)]
pub struct ViewCoordinator {
    filter: FilterState,
    rows: Vec<DisplayRow>,
    aggregates: Aggregates,
    sort: Option<SortSpec>,
    paginator: Paginator,
    generations: Generations,
    records_pending: bool,
}

impl ViewCoordinator {
    pub fn new(selection: FilterSelection) -> Self {
        Self {
            filter: FilterState::new(selection),
            rows: Vec::new(),
            aggregates: Aggregates::default(),
            sort: None,
            paginator: Paginator::new(),
            generations: Generations::default(),
            records_pending: false,
        }
    }

    /// Initial load: option lists and the first record set.
    pub fn start(&mut self) -> Vec<FetchRequest> {
        vec![
            self.spending_groups_request(),
            self.categories_request(),
            self.records_request(),
        ]
    }

    pub fn set_spending(&mut self, spending: Selection) -> Vec<FetchRequest> {
        if !self.filter.set_spending(spending) {
            return Vec::new();
        }
        self.sort = None;
        vec![self.categories_request(), self.records_request()]
    }

    pub fn set_category(&mut self, category: Selection) -> Result<Vec<FetchRequest>, ViewError> {
        if let Selection::Id(id) = &category {
            if !self.filter.category_options().contains(&category) {
                return Err(ViewError::UnknownCategory(id.clone()));
            }
        }
        if !self.filter.set_category(category) {
            return Ok(Vec::new());
        }
        self.sort = None;
        Ok(vec![self.records_request()])
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Vec<FetchRequest> {
        if !self.filter.set_date_range(start, end) {
            return Vec::new();
        }
        self.sort = None;
        vec![self.records_request()]
    }

    /// Re-fetches the records for the current filter. Earlier record
    /// requests still in flight become stale.
    pub fn refresh(&mut self) -> FetchRequest {
        self.records_request()
    }

    pub fn apply_spending_groups<S: NotificationSink>(
        &mut self,
        token: GenerationToken,
        result: Result<Vec<NamedRef>, SourceError>,
        sink: &mut S,
    ) {
        if self.generations.spending_groups != Some(token) {
            tracing::debug!("dropping stale spending groups response {token:?}");
            return;
        }
        match result {
            Ok(groups) => self
                .filter
                .replace_spending_options(OptionList::from_named(&groups)),
            Err(err) => report_fetch_failure(sink, "spending groups", &err),
        }
    }

    /// Installs a new category list. If the selected category is not part of
    /// it the category falls back to "All" and the records are re-fetched.
    pub fn apply_categories<S: NotificationSink>(
        &mut self,
        token: GenerationToken,
        result: Result<Vec<NamedRef>, SourceError>,
        sink: &mut S,
    ) -> Option<FetchRequest> {
        if self.generations.categories != Some(token) {
            tracing::debug!("dropping stale categories response {token:?}");
            return None;
        }
        match result {
            Ok(categories) => {
                let reset = self
                    .filter
                    .replace_category_options(OptionList::from_named(&categories));
                reset.then(|| self.records_request())
            }
            Err(err) => {
                report_fetch_failure(sink, "categories", &err);
                None
            }
        }
    }

    /// Replaces the filtered set: project, total the full set, sort, then
    /// reset the visible slice. Returns whether the result was applied.
    pub fn apply_records<S: NotificationSink>(
        &mut self,
        token: GenerationToken,
        result: Result<Vec<TransactionRecord>, SourceError>,
        sink: &mut S,
    ) -> bool {
        if self.generations.records != Some(token) {
            tracing::debug!("dropping stale records response {token:?}");
            return false;
        }
        self.records_pending = false;
        match result {
            Ok(records) => {
                let mut rows = project(&records);
                self.aggregates = aggregate(&rows);
                if let Some(spec) = self.sort {
                    sort_rows(&mut rows, spec);
                }
                self.rows = rows;
                self.paginator.reset();
                tracing::debug!("loaded {} records", self.rows.len());
                true
            }
            Err(err) => {
                report_fetch_failure(sink, "expenses", &err);
                false
            }
        }
    }

    /// Sorts the whole filtered set; the visible count is kept, so the
    /// slice shows the first rows of the new order.
    pub fn sort_by(&mut self, spec: SortSpec) {
        sort_rows(&mut self.rows, spec);
        self.sort = Some(spec);
    }

    pub fn begin_load_more(&mut self) -> Option<LoadTicket> {
        self.paginator.begin_load_more(self.rows.len())
    }

    pub fn finish_load_more(&mut self, ticket: LoadTicket) -> bool {
        self.paginator.finish_load_more(ticket)
    }

    /// A record was created through the form: re-fetch so the totals come
    /// from the service, not from a local guess.
    pub fn record_created(&mut self) -> FetchRequest {
        self.refresh()
    }

    pub fn record_deleted<S: NotificationSink>(
        &mut self,
        result: Result<(), SourceError>,
        sink: &mut S,
    ) -> Option<FetchRequest> {
        match result {
            Ok(()) => {
                sink.notify(Notification::success(
                    "Deleted",
                    "Expense deleted successfully!",
                ));
                Some(self.refresh())
            }
            Err(err) => {
                tracing::error!("failed to delete expense: {err}");
                sink.notify(Notification::error(
                    "Error",
                    err.message_or("Failed to delete expense."),
                ));
                None
            }
        }
    }

    pub fn filter(&self) -> &FilterSelection {
        self.filter.selection()
    }

    pub fn spending_options(&self) -> &OptionList {
        self.filter.spending_options()
    }

    pub fn category_options(&self) -> &OptionList {
        self.filter.category_options()
    }

    /// The whole filtered set, in display order.
    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn visible_rows(&self) -> &[DisplayRow] {
        self.paginator.slice(&self.rows)
    }

    pub fn aggregates(&self) -> Aggregates {
        self.aggregates
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn has_more(&self) -> bool {
        self.paginator.has_more(self.rows.len())
    }

    pub fn is_loading_more(&self) -> bool {
        self.paginator.is_busy()
    }

    pub fn is_fetching_records(&self) -> bool {
        self.records_pending
    }

    fn spending_groups_request(&mut self) -> FetchRequest {
        let token = self.generations.next();
        self.generations.spending_groups = Some(token);
        FetchRequest::SpendingGroups { token }
    }

    fn categories_request(&mut self) -> FetchRequest {
        let token = self.generations.next();
        self.generations.categories = Some(token);
        FetchRequest::Categories {
            token,
            spending: self.filter.selection().spending.clone(),
        }
    }

    fn records_request(&mut self) -> FetchRequest {
        let token = self.generations.next();
        self.generations.records = Some(token);
        self.records_pending = true;
        FetchRequest::Records {
            token,
            query: self.filter.record_query(),
        }
    }
}

fn report_fetch_failure<S: NotificationSink>(sink: &mut S, what: &str, err: &SourceError) {
    tracing::error!("failed to load {what}: {err}");
    let fallback = format!("Failed to load {what}.");
    sink.notify(Notification::error("Error", err.message_or(&fallback)));
}
