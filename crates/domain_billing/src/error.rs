//! Billing domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    #[error("Bill already {0}")]
    AlreadySettled(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not permitted: {0}")]
    NotPermitted(String),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }

    pub fn not_permitted(message: impl Into<String>) -> Self {
        BillingError::NotPermitted(message.into())
    }

    /// True for errors raised by an illegal bill transition
    pub fn is_state_error(&self) -> bool {
        matches!(self, BillingError::AlreadySettled(_))
    }
}

impl From<PortError> for BillingError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { id, .. } => BillingError::BillNotFound(id),
            PortError::Conflict { message } => BillingError::AlreadySettled(message),
            PortError::Validation { message, .. } => BillingError::Validation(message),
            PortError::Unauthorized { message } => BillingError::NotPermitted(message),
            other => BillingError::Storage(other.to_string()),
        }
    }
}
