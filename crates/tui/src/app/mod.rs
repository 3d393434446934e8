pub mod form;
pub mod state;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use api_types::{record::TransactionRecord, spending::NamedRef};
use chrono::{Days, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ledger_view::{
    FetchRequest, FormFields, GenerationToken, KeyOutcome, LoadTicket, ModalHost, ModalKey,
    ModalState, Notification, NotificationSink, SortField, SourceError, save_failed_notification,
    saved_notification, sources::Ledger,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use form::DATE_FORMAT;
pub use state::{AppState, DeletePrompt, FilterField, FocusTarget, Toast};

/// Results of background work, posted back to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    SpendingGroups {
        token: GenerationToken,
        result: std::result::Result<Vec<NamedRef>, SourceError>,
    },
    Categories {
        token: GenerationToken,
        result: std::result::Result<Vec<NamedRef>, SourceError>,
    },
    Records {
        token: GenerationToken,
        result: std::result::Result<Vec<TransactionRecord>, SourceError>,
    },
    LoadMoreReady(LoadTicket),
    ModalAnimationDone,
    /// Outcome of the save started from dialog `session`.
    RecordCreated {
        session: u64,
        result: std::result::Result<String, SourceError>,
    },
    RecordDeleted(std::result::Result<(), SourceError>),
    RefreshDue,
}

pub struct App<L> {
    config: AppConfig,
    ledger: Arc<L>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    pub state: AppState,
    should_quit: bool,
}

impl<L> App<L>
where
    L: Ledger + Send + Sync + 'static,
{
    pub fn new(config: AppConfig, ledger: L, source_label: String) -> Result<Self> {
        let today = config.today()?;
        let state = AppState::new(today, config.currency.clone(), source_label);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            ledger: Arc::new(ledger),
            events_tx,
            events_rx,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let requests = self.state.view.start();
        self.dispatch_all(requests);

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        if self.state.modal.abort(&mut self.state.host).is_some() {
            tracing::debug!("released expense dialog on shutdown");
        }
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(50);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;
            self.after_draw();

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }

            while let Ok(event) = self.events_rx.try_recv() {
                self.apply_event(event);
            }
            self.state.toast.expire(Instant::now());
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// The dialog's first frame is on screen: move focus into it.
    fn after_draw(&mut self) {
        if self.state.modal.state() != ModalState::Opening {
            return;
        }
        let elements = self.state.form.elements(self.state.is_saving());
        if let Err(err) = self.state.modal.rendered(&mut self.state.host, &elements) {
            tracing::debug!("{err}");
        }
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        let state = &mut self.state;
        match event {
            AppEvent::SpendingGroups { token, result } => {
                state
                    .view
                    .apply_spending_groups(token, result, &mut state.toast);
            }
            AppEvent::Categories { token, result } => {
                if let Some(request) = state.view.apply_categories(token, result, &mut state.toast)
                {
                    self.dispatch(request);
                }
            }
            AppEvent::Records { token, result } => {
                if state.view.apply_records(token, result, &mut state.toast) {
                    state.clamp_selection();
                }
            }
            AppEvent::LoadMoreReady(ticket) => {
                if !state.view.finish_load_more(ticket) {
                    tracing::debug!("ignoring stale load-more {ticket:?}");
                }
            }
            AppEvent::ModalAnimationDone => {
                if state.modal.animation_finished(&mut state.host).is_some() {
                    tracing::debug!("expense dialog closed");
                }
            }
            AppEvent::RecordCreated { session, result } => self.record_created(session, result),
            AppEvent::RecordDeleted(result) => {
                if let Some(request) = state.view.record_deleted(result, &mut state.toast) {
                    self.dispatch(request);
                }
            }
            AppEvent::RefreshDue => {
                let request = state.view.record_created();
                self.dispatch(request);
            }
        }
    }

    /// A save finished. Only the dialog that submitted it is cleared, closed
    /// or shown the error; a later dialog just gets the toast.
    fn record_created(
        &mut self,
        session: u64,
        result: std::result::Result<String, SourceError>,
    ) {
        if self.state.pending_save == Some(session) {
            self.state.pending_save = None;
        }
        let same_dialog = session == self.state.dialog_session && self.state.modal.is_visible();
        match result {
            Ok(id) => {
                tracing::info!("expense {id} saved");
                if same_dialog {
                    let before = self.state.modal.state();
                    self.state
                        .modal
                        .submit_succeeded(&mut self.state.form, &mut self.state.toast);
                    self.schedule_close(before);
                } else {
                    tracing::debug!("dialog {session} is gone, only reporting the save");
                    self.state.toast.notify(saved_notification());
                }
                self.schedule(self.config.refresh_delay(), AppEvent::RefreshDue);
            }
            Err(err) => {
                tracing::error!("failed to create expense: {err}");
                if same_dialog {
                    self.state.modal.submit_failed(
                        &mut self.state.form,
                        err.detail(),
                        &mut self.state.toast,
                    );
                } else {
                    self.state
                        .toast
                        .notify(save_failed_notification(err.detail()));
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.state.delete_prompt.is_some() {
            self.handle_delete_prompt(key);
        } else if self.state.host.routes_keys_to_modal() {
            self.handle_modal_key(key);
        } else {
            self.handle_dashboard_key(key);
        }
    }

    fn handle_delete_prompt(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(prompt) = self.state.delete_prompt.take() {
                    self.delete_record(prompt.id);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state.delete_prompt = None;
            }
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let modal_key = match key.code {
            KeyCode::Esc => ModalKey::Escape,
            KeyCode::Tab => ModalKey::Tab,
            KeyCode::BackTab => ModalKey::BackTab,
            _ => ModalKey::Other,
        };
        let before = self.state.modal.state();
        let elements = self.state.form.elements(self.state.is_saving());
        let outcome = self
            .state
            .modal
            .handle_key(&mut self.state.host, modal_key, &elements);
        self.schedule_close(before);
        if outcome == KeyOutcome::Handled || self.state.modal.state() != ModalState::Open {
            return;
        }

        let Some(focused) = self.state.host.focused() else {
            return;
        };
        let form = &mut self.state.form;
        match key.code {
            KeyCode::Enter => match focused {
                FocusTarget::FormSave => self.submit_form(),
                FocusTarget::FormCancel => self.close_modal(),
                FocusTarget::FormType => form.toggle_type(),
                _ => {
                    self.state
                        .modal
                        .handle_key(&mut self.state.host, ModalKey::Tab, &elements);
                }
            },
            KeyCode::Left | KeyCode::Right => match focused {
                FocusTarget::FormType => form.toggle_type(),
                FocusTarget::FormCategory => {
                    let backwards = key.code == KeyCode::Left;
                    form.cycle_category(self.state.view.category_options(), backwards);
                }
                _ => {}
            },
            KeyCode::Backspace => {
                if let Some(field) = form.text_field_mut(focused) {
                    field.pop();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(field) = form.text_field_mut(focused) {
                    field.push(ch);
                } else if ch == ' ' && focused == FocusTarget::FormType {
                    form.toggle_type();
                }
            }
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        let filter = self.state.host.focused_filter();
        let action = map_key(key);
        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::NextField | AppAction::PrevField => {
                self.state.date_draft = None;
                self.state
                    .host
                    .focus_next_pane(action == AppAction::PrevField);
            }
            AppAction::Cancel => {
                if self.state.date_draft.take().is_none() {
                    self.state.host.focus(FocusTarget::Table);
                }
            }
            AppAction::Submit => {
                if let Some(field) = filter {
                    self.commit_date_draft(field);
                }
            }
            AppAction::Left | AppAction::Right => {
                if let Some(field) = filter {
                    self.cycle_filter(field, action == AppAction::Left);
                }
            }
            AppAction::Up | AppAction::Down => {
                let down = action == AppAction::Down;
                match filter {
                    Some(field @ (FilterField::StartDate | FilterField::EndDate)) => {
                        self.shift_date(field, down);
                    }
                    Some(_) => {}
                    None => self.move_selection(down),
                }
            }
            AppAction::Backspace => {
                if let Some(field @ (FilterField::StartDate | FilterField::EndDate)) = filter {
                    let draft = self.date_draft_mut(field);
                    draft.pop();
                }
            }
            AppAction::Input(ch) => match filter {
                Some(field @ (FilterField::StartDate | FilterField::EndDate))
                    if ch.is_ascii_digit() || ch == '-' =>
                {
                    self.date_draft_mut(field).push(ch);
                }
                _ => self.handle_command(ch),
            },
            AppAction::None => {}
        }
    }

    fn handle_command(&mut self, ch: char) {
        match ch {
            'n' => self.open_modal(),
            'd' => {
                self.state.delete_prompt = self.state.selected_row().map(|row| DeletePrompt {
                    id: row.id.clone(),
                    name: row.name.clone(),
                });
            }
            'r' => {
                let request = self.state.view.refresh();
                self.dispatch(request);
            }
            'm' => self.load_more(),
            'j' => self.move_selection(true),
            'k' => self.move_selection(false),
            '1'..='7' => {
                if let Some(field) = column_sort_field(ch) {
                    self.state.sort_column(field);
                }
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, down: bool) {
        if self.state.host.is_scroll_locked() {
            return;
        }
        if !down {
            self.state.select_prev();
            return;
        }
        if self.state.at_last_visible_row() {
            self.load_more();
        }
        self.state.select_next();
    }

    fn load_more(&mut self) {
        if let Some(ticket) = self.state.view.begin_load_more() {
            self.schedule(
                self.config.load_more_delay(),
                AppEvent::LoadMoreReady(ticket),
            );
        }
    }

    fn cycle_filter(&mut self, field: FilterField, backwards: bool) {
        let view = &mut self.state.view;
        let requests = match field {
            FilterField::Spending => {
                let next = view
                    .spending_options()
                    .cycle(&view.filter().spending, backwards);
                view.set_spending(next)
            }
            FilterField::Category => {
                let next = view
                    .category_options()
                    .cycle(&view.filter().category, backwards);
                match view.set_category(next) {
                    Ok(requests) => requests,
                    Err(err) => {
                        tracing::debug!("{err}");
                        Vec::new()
                    }
                }
            }
            FilterField::StartDate | FilterField::EndDate => return,
        };
        self.state.selected = 0;
        self.dispatch_all(requests);
    }

    fn current_date(&self, field: FilterField) -> NaiveDate {
        let filter = self.state.view.filter();
        match field {
            FilterField::StartDate => filter.start_date,
            _ => filter.end_date,
        }
    }

    fn date_draft_mut(&mut self, field: FilterField) -> &mut String {
        let current = self.current_date(field);
        self.state
            .date_draft
            .get_or_insert_with(|| current.format(DATE_FORMAT).to_string())
    }

    fn shift_date(&mut self, field: FilterField, forward: bool) {
        self.state.date_draft = None;
        let current = self.current_date(field);
        let shifted = if forward {
            current.checked_add_days(Days::new(1))
        } else {
            current.checked_sub_days(Days::new(1))
        };
        if let Some(date) = shifted {
            self.set_date(field, date);
        }
    }

    fn commit_date_draft(&mut self, field: FilterField) {
        let Some(draft) = self.state.date_draft.take() else {
            return;
        };
        match NaiveDate::parse_from_str(draft.trim(), DATE_FORMAT) {
            Ok(date) => self.set_date(field, date),
            Err(_) => self.state.toast.notify(Notification::error(
                "Error",
                format!("\"{draft}\" is not a YYYY-MM-DD date."),
            )),
        }
    }

    fn set_date(&mut self, field: FilterField, date: NaiveDate) {
        let filter = self.state.view.filter();
        let (start, end) = match field {
            FilterField::StartDate => (date, filter.end_date),
            _ => (filter.start_date, date),
        };
        let requests = self.state.view.set_date_range(start, end);
        self.state.selected = 0;
        self.dispatch_all(requests);
    }

    fn open_modal(&mut self) {
        match self.state.modal.open(&mut self.state.host) {
            Ok(()) => {
                self.state.dialog_session += 1;
                self.state.form.error = None;
            }
            Err(err) => tracing::debug!("{err}"),
        }
    }

    fn close_modal(&mut self) {
        let before = self.state.modal.state();
        if let Err(err) = self.state.modal.close() {
            tracing::debug!("{err}");
        }
        self.schedule_close(before);
    }

    /// Starts the exit animation timer when the dialog just entered
    /// `Closing`.
    fn schedule_close(&self, before: ModalState) {
        if before != ModalState::Closing && self.state.modal.state() == ModalState::Closing {
            self.schedule(self.config.close_animation(), AppEvent::ModalAnimationDone);
        }
    }

    fn submit_form(&mut self) {
        if self.state.is_saving() {
            return;
        }
        let record = match self.state.form.validate() {
            Ok(record) => record,
            Err(message) => {
                self.state.form.show_error(message);
                return;
            }
        };
        self.state.form.error = None;
        let session = self.state.dialog_session;
        self.state.pending_save = Some(session);

        let ledger = Arc::clone(&self.ledger);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = ledger.create_record(record).await;
            post(&tx, AppEvent::RecordCreated { session, result });
        });
    }

    fn delete_record(&self, id: String) {
        let ledger = Arc::clone(&self.ledger);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = ledger.delete_record(&id).await;
            post(&tx, AppEvent::RecordDeleted(result));
        });
    }

    fn dispatch_all(&self, requests: Vec<FetchRequest>) {
        for request in requests {
            self.dispatch(request);
        }
    }

    /// Runs a fetch on the runtime and posts the result back with its token.
    fn dispatch(&self, request: FetchRequest) {
        tracing::debug!("fetching {request:?}");
        let ledger = Arc::clone(&self.ledger);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match request {
                FetchRequest::SpendingGroups { token } => AppEvent::SpendingGroups {
                    token,
                    result: ledger.list_spending_groups().await,
                },
                FetchRequest::Categories { token, spending } => AppEvent::Categories {
                    token,
                    result: ledger.list_categories(&spending).await,
                },
                FetchRequest::Records { token, query } => AppEvent::Records {
                    token,
                    result: ledger.list_records(&query).await,
                },
            };
            post(&tx, event);
        });
    }

    fn schedule(&self, delay: Duration, event: AppEvent) {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            post(&tx, event);
        });
    }
}

fn post(tx: &UnboundedSender<AppEvent>, event: AppEvent) {
    if tx.send(event).is_err() {
        tracing::debug!("event loop is gone, dropping event");
    }
}

/// Table column behind each number key, left to right.
fn column_sort_field(key: char) -> Option<SortField> {
    match key {
        '1' => Some(SortField::ExpenseDate),
        '2' => Some(SortField::Name),
        '3' => Some(SortField::Category),
        '4' => Some(SortField::Spending),
        '5' => Some(SortField::Bank),
        '6' => Some(SortField::TransactionType),
        '7' => Some(SortField::Amount),
        _ => None,
    }
}
