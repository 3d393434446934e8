//! State machine of the "new expense" dialog.
//!
//! ```text
//! Closed --open--> Opening --rendered--> Open --close/Escape--> Closing
//!    ^                                                             |
//!    +-------------------- animation_finished ---------------------+
//! ```
//!
//! Opening the dialog takes a [`ModalSession`] from the host: background
//! scroll is locked, the focused element is remembered and a keyboard
//! listener is installed. The session is handed back on every path that
//! reaches `Closed`, either when the exit animation finishes or through
//! [`ModalController::abort`].
use std::fmt;

pub use focus::{ElementKind, Focusable};

use crate::{Notification, NotificationSink, ViewError};

mod focus;

const SAVED_TITLE: &str = "Success";
const SAVED_MESSAGE: &str = "Expense saved successfully!";
const FAILED_TITLE: &str = "Error";
const FAILED_MESSAGE: &str = "Failed to create expense.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// Process-wide UI state the dialog borrows while it is visible.
pub trait ModalHost {
    type Target: Clone + PartialEq + fmt::Debug;

    fn set_scroll_locked(&mut self, locked: bool);
    fn focused(&self) -> Option<Self::Target>;
    fn focus(&mut self, target: Self::Target);
    fn install_key_listener(&mut self) -> ListenerHandle;
    fn remove_key_listener(&mut self, handle: ListenerHandle);
}

/// The form rendered inside the dialog.
pub trait FormFields {
    fn clear(&mut self);
    /// Shows `message` without touching the field values.
    fn show_error(&mut self, message: String);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ModalState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalKey {
    Escape,
    Tab,
    BackTab,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalEvent {
    Closed,
}

#[derive(Debug)]
struct ModalSession<T> {
    previous_focus: Option<T>,
    listener: ListenerHandle,
}

impl<T: Clone + PartialEq + fmt::Debug> ModalSession<T> {
    fn acquire<H: ModalHost<Target = T>>(host: &mut H) -> Self {
        host.set_scroll_locked(true);
        let previous_focus = host.focused();
        let listener = host.install_key_listener();
        Self {
            previous_focus,
            listener,
        }
    }

    fn release<H: ModalHost<Target = T>>(self, host: &mut H) {
        host.remove_key_listener(self.listener);
        host.set_scroll_locked(false);
        if let Some(target) = self.previous_focus {
            host.focus(target);
        }
    }
}

#[derive(Debug)]
pub struct ModalController<T> {
    state: ModalState,
    session: Option<ModalSession<T>>,
}

impl<T> Default for ModalController<T> {
    fn default() -> Self {
        Self {
            state: ModalState::Closed,
            session: None,
        }
    }
}

impl<T: Clone + PartialEq + fmt::Debug> ModalController<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn open<H: ModalHost<Target = T>>(&mut self, host: &mut H) -> Result<(), ViewError> {
        self.expect(ModalState::Closed, "open")?;
        self.session = Some(ModalSession::acquire(host));
        self.state = ModalState::Opening;
        tracing::debug!("modal opening");
        Ok(())
    }

    /// The dialog has been drawn: focus its first focusable element.
    pub fn rendered<H: ModalHost<Target = T>>(
        &mut self,
        host: &mut H,
        elements: &[Focusable<T>],
    ) -> Result<(), ViewError> {
        self.expect(ModalState::Opening, "finish opening")?;
        if let Some(first) = focus::first_focusable(elements) {
            host.focus(first.clone());
        }
        self.state = ModalState::Open;
        Ok(())
    }

    /// Keyboard handling while open: Escape closes, Tab and Shift+Tab cycle
    /// focus inside the dialog.
    pub fn handle_key<H: ModalHost<Target = T>>(
        &mut self,
        host: &mut H,
        key: ModalKey,
        elements: &[Focusable<T>],
    ) -> KeyOutcome {
        if self.state != ModalState::Open {
            return KeyOutcome::Ignored;
        }
        match key {
            ModalKey::Escape => {
                self.state = ModalState::Closing;
                KeyOutcome::Handled
            }
            ModalKey::Tab | ModalKey::BackTab => {
                let current = host.focused();
                let backwards = key == ModalKey::BackTab;
                if let Some(next) = focus::cycle_focus(elements, current.as_ref(), backwards) {
                    host.focus(next.clone());
                }
                KeyOutcome::Handled
            }
            ModalKey::Other => KeyOutcome::Ignored,
        }
    }

    /// Starts the exit animation.
    pub fn close(&mut self) -> Result<(), ViewError> {
        self.expect(ModalState::Open, "close")?;
        self.state = ModalState::Closing;
        tracing::debug!("modal closing");
        Ok(())
    }

    /// The exit animation is over. Yields [`ModalEvent::Closed`] once per
    /// lifecycle; later calls return `None`.
    pub fn animation_finished<H: ModalHost<Target = T>>(
        &mut self,
        host: &mut H,
    ) -> Option<ModalEvent> {
        if self.state != ModalState::Closing {
            return None;
        }
        self.teardown(host);
        Some(ModalEvent::Closed)
    }

    /// Record saved: clear the form, report it and close the dialog. A dialog
    /// still waiting for its first frame closes too.
    pub fn submit_succeeded<F, S>(&mut self, form: &mut F, sink: &mut S)
    where
        F: FormFields,
        S: NotificationSink,
    {
        form.clear();
        sink.notify(saved_notification());
        match self.state {
            ModalState::Opening | ModalState::Open => {
                self.state = ModalState::Closing;
                tracing::debug!("modal closing after save");
            }
            state => tracing::debug!("save finished while modal was {state:?}"),
        }
    }

    /// Record rejected: stay open and show `detail` (or a generic message).
    pub fn submit_failed<F, S>(&mut self, form: &mut F, detail: Option<&str>, sink: &mut S)
    where
        F: FormFields,
        S: NotificationSink,
    {
        let notification = save_failed_notification(detail);
        form.show_error(notification.message.clone());
        sink.notify(notification);
    }

    /// Releases everything the dialog holds, whatever state it is in.
    pub fn abort<H: ModalHost<Target = T>>(&mut self, host: &mut H) -> Option<ModalEvent> {
        if self.state == ModalState::Closed {
            return None;
        }
        self.teardown(host);
        Some(ModalEvent::Closed)
    }

    fn teardown<H: ModalHost<Target = T>>(&mut self, host: &mut H) {
        if let Some(session) = self.session.take() {
            session.release(host);
        }
        self.state = ModalState::Closed;
        tracing::debug!("modal closed");
    }

    fn expect(&self, state: ModalState, action: &'static str) -> Result<(), ViewError> {
        if self.state == state {
            Ok(())
        } else {
            Err(ViewError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }
}

/// Reported when an expense has been saved.
pub fn saved_notification() -> Notification {
    Notification::success(SAVED_TITLE, SAVED_MESSAGE)
}

/// Reported when saving failed; blank details fall back to a generic message.
pub fn save_failed_notification(detail: Option<&str>) -> Notification {
    let message = detail
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or(FAILED_MESSAGE);
    Notification::error(FAILED_TITLE, message)
}
