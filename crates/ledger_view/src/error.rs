//! Errors surfaced by the view core.
//!
//! - [`SourceError`] is what a collaborator returns when a list or mutation
//!   call fails. The coordinator turns it into a notification and keeps the
//!   last good state.
//! - [`ViewError`] reports caller misuse, such as an invalid modal transition.
use thiserror::Error;

use crate::modal::ModalState;

/// Failure reported by a data collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

impl SourceError {
    /// Message provided by the collaborator, if it sent one worth showing.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Validation(message) | Self::Server(message) => Some(message.as_str()),
            Self::NotFound(_) | Self::Unauthorized | Self::Transport(_) => None,
        }
    }

    /// Collaborator message, or `fallback` when there is none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// View core custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Cannot {action} the modal while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: ModalState,
    },
    #[error("\"{0}\" is not a category of the selected spending group")]
    UnknownCategory(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),
    #[error("Unknown sort direction: {0}")]
    UnknownSortDirection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_falls_back_when_collaborator_sent_nothing() {
        let err = SourceError::Transport("connection refused".to_string());
        assert_eq!(
            err.message_or("Failed to delete expense."),
            "Failed to delete expense."
        );

        let err = SourceError::Validation("Amount is required".to_string());
        assert_eq!(err.message_or("Failed to create expense."), "Amount is required");

        let err = SourceError::Server("  ".to_string());
        assert_eq!(err.message_or("fallback"), "fallback");
    }
}
