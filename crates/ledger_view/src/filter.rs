//! Filter inputs and the option lists they depend on.
use api_types::{Selection, record::RecordQuery, spending::NamedRef};
use chrono::{Datelike, NaiveDate};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterOption {
    pub label: String,
    pub value: Selection,
}

impl FilterOption {
    fn all() -> Self {
        Self {
            label: Selection::ALL_LABEL.to_string(),
            value: Selection::All,
        }
    }
}

/// Options for a select input. The first entry is always the synthetic
/// "All" option; the rest keep the order the server returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionList(Vec<FilterOption>);

impl Default for OptionList {
    fn default() -> Self {
        Self(vec![FilterOption::all()])
    }
}

impl OptionList {
    pub fn from_named(items: &[NamedRef]) -> Self {
        let mut options = Vec::with_capacity(items.len() + 1);
        options.push(FilterOption::all());
        options.extend(items.iter().map(|item| FilterOption {
            label: item.name.clone(),
            value: Selection::Id(item.id.clone()),
        }));
        Self(options)
    }

    pub fn options(&self) -> &[FilterOption] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &Selection) -> bool {
        self.position(value).is_some()
    }

    pub fn position(&self, value: &Selection) -> Option<usize> {
        self.0.iter().position(|option| &option.value == value)
    }

    pub fn label_of(&self, value: &Selection) -> Option<&str> {
        self.0
            .iter()
            .find(|option| &option.value == value)
            .map(|option| option.label.as_str())
    }

    /// Option after `value`, wrapping around. Unknown values map to "All".
    pub fn cycle(&self, value: &Selection, backwards: bool) -> Selection {
        let Some(current) = self.position(value) else {
            return Selection::All;
        };
        let len = self.0.len();
        let next = if backwards {
            (current + len - 1) % len
        } else {
            (current + 1) % len
        };
        self.0[next].value.clone()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSelection {
    pub spending: Selection,
    pub category: Selection,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl FilterSelection {
    /// Everything from the first day of `today`'s month up to `today`.
    pub fn current_month(today: NaiveDate) -> Self {
        let start_date = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
        Self {
            spending: Selection::All,
            category: Selection::All,
            start_date,
            end_date: today,
        }
    }

    pub fn record_query(&self) -> RecordQuery {
        RecordQuery {
            spending_id: self.spending.clone(),
            category_id: self.category.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// The four filter inputs plus the spending/category option lists.
///
/// Setters return `true` when the selection actually changed, which is the
/// signal for the caller to re-fetch.
#[derive(Debug)]
pub struct FilterState {
    selection: FilterSelection,
    spending_options: OptionList,
    category_options: OptionList,
}

impl FilterState {
    pub fn new(selection: FilterSelection) -> Self {
        Self {
            selection,
            spending_options: OptionList::default(),
            category_options: OptionList::default(),
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn spending_options(&self) -> &OptionList {
        &self.spending_options
    }

    pub fn category_options(&self) -> &OptionList {
        &self.category_options
    }

    /// Changing the spending group always resets the category to "All".
    pub fn set_spending(&mut self, spending: Selection) -> bool {
        if self.selection.spending == spending {
            return false;
        }
        self.selection.spending = spending;
        self.selection.category = Selection::All;
        true
    }

    pub fn set_category(&mut self, category: Selection) -> bool {
        if self.selection.category == category {
            return false;
        }
        self.selection.category = category;
        true
    }

    /// Both bounds are taken as given. An inverted range is not rejected:
    /// the query simply matches nothing.
    pub fn set_date_range(&mut self, start_date: NaiveDate, end_date: NaiveDate) -> bool {
        if self.selection.start_date == start_date && self.selection.end_date == end_date {
            return false;
        }
        if start_date > end_date {
            tracing::warn!("date range starts after it ends: {start_date} > {end_date}");
        }
        self.selection.start_date = start_date;
        self.selection.end_date = end_date;
        true
    }

    pub fn replace_spending_options(&mut self, options: OptionList) {
        self.spending_options = options;
    }

    /// Installs a fresh category list. Returns `true` when the selected
    /// category is not part of it and had to fall back to "All".
    pub fn replace_category_options(&mut self, options: OptionList) -> bool {
        self.category_options = options;
        if self.category_options.contains(&self.selection.category) {
            return false;
        }
        self.selection.category = Selection::All;
        true
    }

    pub fn record_query(&self) -> RecordQuery {
        self.selection.record_query()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn named(id: &str, name: &str) -> NamedRef {
        NamedRef {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn state() -> FilterState {
        FilterState::new(FilterSelection::current_month(date(2025, 3, 17)))
    }

    #[test]
    fn current_month_starts_on_the_first() {
        let selection = FilterSelection::current_month(date(2025, 3, 17));
        assert_eq!(selection.start_date, date(2025, 3, 1));
        assert_eq!(selection.end_date, date(2025, 3, 17));
        assert!(selection.spending.is_all());
        assert!(selection.category.is_all());
    }

    #[test]
    fn option_list_is_prefixed_with_all() {
        let list = OptionList::from_named(&[named("s2", "Needs"), named("s1", "Wants")]);
        let labels: Vec<_> = list.options().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["All", "Needs", "Wants"]);
        assert_eq!(list.options()[0].value, Selection::All);
        assert_eq!(list.label_of(&Selection::from("s1")), Some("Wants"));
    }

    #[test]
    fn cycle_wraps_in_both_directions() {
        let list = OptionList::from_named(&[named("a", "A"), named("b", "B")]);
        assert_eq!(list.cycle(&Selection::All, false), Selection::from("a"));
        assert_eq!(list.cycle(&Selection::from("b"), false), Selection::All);
        assert_eq!(list.cycle(&Selection::All, true), Selection::from("b"));
        assert_eq!(list.cycle(&Selection::from("zzz"), false), Selection::All);
    }

    #[test]
    fn spending_change_resets_category() {
        let mut filter = state();
        assert!(filter.set_category(Selection::from("c1")));
        assert!(filter.set_spending(Selection::from("s1")));
        assert_eq!(filter.selection().category, Selection::All);
    }

    #[test]
    fn other_changes_keep_category() {
        let mut filter = state();
        filter.set_category(Selection::from("c1"));
        assert!(filter.set_date_range(date(2025, 1, 1), date(2025, 2, 1)));
        assert_eq!(filter.selection().category, Selection::from("c1"));
    }

    #[test]
    fn repeated_values_do_not_report_a_change() {
        let mut filter = state();
        assert!(!filter.set_spending(Selection::All));
        assert!(!filter.set_category(Selection::All));
        assert!(!filter.set_date_range(date(2025, 3, 1), date(2025, 3, 17)));
    }

    #[test]
    fn inverted_range_is_accepted() {
        let mut filter = state();
        assert!(filter.set_date_range(date(2025, 3, 20), date(2025, 3, 1)));
        let query = filter.record_query();
        assert!(query.start_date > query.end_date);
    }

    #[test]
    fn category_falls_back_when_missing_from_new_options() {
        let mut filter = state();
        filter.set_category(Selection::from("gone"));
        let reset = filter.replace_category_options(OptionList::from_named(&[named("c1", "Food")]));
        assert!(reset);
        assert_eq!(filter.selection().category, Selection::All);

        filter.set_category(Selection::from("c1"));
        let reset = filter.replace_category_options(OptionList::from_named(&[named("c1", "Food")]));
        assert!(!reset);
    }
}
