use std::time::{Duration, Instant};

use chrono::NaiveDate;
use ledger_view::{
    DisplayRow, FilterSelection, ListenerHandle, ModalController, ModalHost, Notification,
    NotificationSink, SortDirection, SortField, SortSpec, ViewCoordinator,
};

use crate::app::form::ExpenseForm;

const TOAST_TTL: Duration = Duration::from_secs(4);

/// Everything that can hold keyboard focus, on the dashboard and in the
/// new-expense dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    Filter(FilterField),
    Table,
    FormHeading,
    FormName,
    FormDate,
    FormAmount,
    FormType,
    FormCategory,
    FormBank,
    FormCancel,
    FormSave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Spending,
    Category,
    StartDate,
    EndDate,
}

impl FilterField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Spending => "Spending",
            Self::Category => "Category",
            Self::StartDate => "From",
            Self::EndDate => "To",
        }
    }
}

/// Dashboard focus order for Tab / Shift+Tab.
const DASHBOARD_ORDER: [FocusTarget; 5] = [
    FocusTarget::Filter(FilterField::Spending),
    FocusTarget::Filter(FilterField::Category),
    FocusTarget::Filter(FilterField::StartDate),
    FocusTarget::Filter(FilterField::EndDate),
    FocusTarget::Table,
];

/// Terminal-side implementation of the process-wide state the dialog
/// borrows: the dashboard stops scrolling, focus moves into the dialog and
/// key events are routed to it while a listener is installed.
#[derive(Debug)]
pub struct UiHost {
    focused: Option<FocusTarget>,
    scroll_locked: bool,
    listener: Option<ListenerHandle>,
    next_listener: u64,
}

impl Default for UiHost {
    fn default() -> Self {
        Self {
            focused: Some(FocusTarget::Table),
            scroll_locked: false,
            listener: None,
            next_listener: 0,
        }
    }
}

impl UiHost {
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Keys go to the dialog while its listener is installed.
    pub fn routes_keys_to_modal(&self) -> bool {
        self.listener.is_some()
    }

    pub fn focus_next_pane(&mut self, backwards: bool) {
        let current = self
            .focused
            .and_then(|target| DASHBOARD_ORDER.iter().position(|t| *t == target))
            .unwrap_or(DASHBOARD_ORDER.len() - 1);
        let len = DASHBOARD_ORDER.len();
        let next = if backwards {
            (current + len - 1) % len
        } else {
            (current + 1) % len
        };
        self.focused = Some(DASHBOARD_ORDER[next]);
    }

    pub fn focused_filter(&self) -> Option<FilterField> {
        match self.focused {
            Some(FocusTarget::Filter(field)) => Some(field),
            _ => None,
        }
    }
}

impl ModalHost for UiHost {
    type Target = FocusTarget;

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn focused(&self) -> Option<FocusTarget> {
        self.focused
    }

    fn focus(&mut self, target: FocusTarget) {
        self.focused = Some(target);
    }

    fn install_key_listener(&mut self) -> ListenerHandle {
        self.next_listener += 1;
        let handle = ListenerHandle(self.next_listener);
        self.listener = Some(handle);
        handle
    }

    fn remove_key_listener(&mut self, handle: ListenerHandle) {
        if self.listener == Some(handle) {
            self.listener = None;
        } else {
            tracing::debug!("listener {handle:?} was not installed");
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// Shows the latest notification for a few seconds.
#[derive(Debug, Default)]
pub struct ToastState {
    current: Option<Toast>,
}

impl ToastState {
    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn expire(&mut self, now: Instant) {
        if self
            .current
            .as_ref()
            .is_some_and(|toast| now.duration_since(toast.shown_at) >= TOAST_TTL)
        {
            self.current = None;
        }
    }
}

impl NotificationSink for ToastState {
    fn notify(&mut self, notification: Notification) {
        tracing::info!("{}: {}", notification.title, notification.message);
        self.current = Some(Toast {
            notification,
            shown_at: Instant::now(),
        });
    }
}

/// Record waiting for a y/n answer before it is deleted.
#[derive(Debug, Clone)]
pub struct DeletePrompt {
    pub id: String,
    pub name: String,
}

#[derive(Debug)]
pub struct AppState {
    pub view: ViewCoordinator,
    pub modal: ModalController<FocusTarget>,
    pub host: UiHost,
    pub form: ExpenseForm,
    pub toast: ToastState,
    pub delete_prompt: Option<DeletePrompt>,
    /// Pending text of the date filter being edited.
    pub date_draft: Option<String>,
    pub selected: usize,
    pub currency: String,
    pub source_label: String,
    /// Bumped every time the dialog opens.
    pub dialog_session: u64,
    /// Dialog session whose save is still in flight.
    pub pending_save: Option<u64>,
}

impl AppState {
    pub fn new(today: NaiveDate, currency: String, source_label: String) -> Self {
        Self {
            view: ViewCoordinator::new(FilterSelection::current_month(today)),
            modal: ModalController::new(),
            host: UiHost::default(),
            form: ExpenseForm::new(today),
            toast: ToastState::default(),
            delete_prompt: None,
            date_draft: None,
            selected: 0,
            currency,
            source_label,
            dialog_session: 0,
            pending_save: None,
        }
    }

    /// The dialog on screen is waiting for its own save to finish.
    pub fn is_saving(&self) -> bool {
        self.pending_save == Some(self.dialog_session)
    }

    pub fn selected_row(&self) -> Option<&DisplayRow> {
        self.view.visible_rows().get(self.selected)
    }

    pub fn select_next(&mut self) {
        let len = self.view.visible_rows().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keeps the selection inside the visible slice after it changed.
    pub fn clamp_selection(&mut self) {
        let len = self.view.visible_rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn at_last_visible_row(&self) -> bool {
        self.selected + 1 >= self.view.visible_rows().len()
    }

    /// Header sort: the active column flips direction, any other column
    /// starts ascending.
    pub fn sort_column(&mut self, field: SortField) {
        let direction = match self.view.sort_spec() {
            Some(spec) if spec.field == field => spec.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.view.sort_by(SortSpec::new(field, direction));
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pane_focus_cycles_through_filters_and_table() {
        let mut host = UiHost::default();
        host.focus_next_pane(false);
        assert_eq!(host.focused_filter(), Some(FilterField::Spending));
        host.focus_next_pane(true);
        assert_eq!(host.focused(), Some(FocusTarget::Table));
        host.focus_next_pane(true);
        assert_eq!(host.focused_filter(), Some(FilterField::EndDate));
    }

    #[test]
    fn listener_removal_only_matches_the_installed_handle() {
        let mut host = UiHost::default();
        let handle = host.install_key_listener();
        host.remove_key_listener(ListenerHandle(handle.0 + 1));
        assert!(host.routes_keys_to_modal());
        host.remove_key_listener(handle);
        assert!(!host.routes_keys_to_modal());
    }

    #[test]
    fn toast_expires() {
        let mut toast = ToastState::default();
        toast.notify(Notification::success("Deleted", "Expense deleted successfully!"));
        let shown_at = toast.current().map(|t| t.shown_at).unwrap();
        toast.expire(shown_at + Duration::from_secs(1));
        assert!(toast.current().is_some());
        toast.expire(shown_at + TOAST_TTL);
        assert!(toast.current().is_none());
    }
}
