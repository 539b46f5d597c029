//! Filing domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors that can occur in the filing domain
#[derive(Debug, Error)]
pub enum FilingError {
    #[error("Return not found: {0}")]
    ReturnNotFound(String),

    #[error("Invalid status transition from {from} during {action}")]
    InvalidStatusTransition { from: String, action: String },

    #[error("Return already finalized as {0}")]
    AlreadyFinalized(String),

    #[error("Return not yet submitted")]
    NotSubmitted,

    #[error("Conflicting update: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not permitted: {0}")]
    NotPermitted(String),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl FilingError {
    pub fn validation(message: impl Into<String>) -> Self {
        FilingError::Validation(message.into())
    }

    pub fn not_permitted(message: impl Into<String>) -> Self {
        FilingError::NotPermitted(message.into())
    }

    pub fn transition(from: impl Into<String>, action: impl Into<String>) -> Self {
        FilingError::InvalidStatusTransition {
            from: from.into(),
            action: action.into(),
        }
    }

    /// True for errors raised by an illegal lifecycle transition
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            FilingError::InvalidStatusTransition { .. }
                | FilingError::AlreadyFinalized(_)
                | FilingError::NotSubmitted
                | FilingError::Conflict(_)
        )
    }
}

impl From<PortError> for FilingError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { id, .. } => FilingError::ReturnNotFound(id),
            PortError::Conflict { message } => FilingError::Conflict(message),
            PortError::Validation { message, .. } => FilingError::Validation(message),
            PortError::Unauthorized { message } => FilingError::NotPermitted(message),
            other => FilingError::Storage(other.to_string()),
        }
    }
}
