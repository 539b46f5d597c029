//! Info request domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the info request domain
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Info request not found: {0}")]
    RequestNotFound(String),

    #[error("Cannot reply to a closed thread (status {0})")]
    ThreadClosed(String),

    #[error("Invalid status transition from {from} during {action}")]
    InvalidStatusTransition { from: String, action: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not permitted: {0}")]
    NotPermitted(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl RequestError {
    pub fn validation(message: impl Into<String>) -> Self {
        RequestError::Validation(message.into())
    }

    pub fn not_permitted(message: impl Into<String>) -> Self {
        RequestError::NotPermitted(message.into())
    }

    pub fn transition(from: impl Into<String>, action: impl Into<String>) -> Self {
        RequestError::InvalidStatusTransition {
            from: from.into(),
            action: action.into(),
        }
    }

    /// True for errors raised by an illegal thread transition
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            RequestError::ThreadClosed(_) | RequestError::InvalidStatusTransition { .. }
        )
    }
}

impl From<PortError> for RequestError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { id, .. } => RequestError::RequestNotFound(id),
            PortError::Conflict { message } => RequestError::ThreadClosed(message),
            PortError::Validation { message, .. } => RequestError::Validation(message),
            PortError::Unauthorized { message } => RequestError::NotPermitted(message),
            other => RequestError::Storage(other.to_string()),
        }
    }
}
