//! Review domain errors

use thiserror::Error;

use core_kernel::PortError;
use domain_filing::TaxReturn;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Return not found: {0}")]
    ReturnNotFound(String),

    /// The return is not in the decision queue: either the firm has not
    /// forwarded it or the officer has already ruled.
    #[error("Return is not eligible for a decision: employee status {employee_status}, fbr status {fbr_status}")]
    NotEligible {
        employee_status: String,
        fbr_status: String,
    },

    #[error("Return is already finalized: {0}")]
    AlreadyFinalized(String),

    #[error("Not permitted: {0}")]
    NotPermitted(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ReviewError {
    pub fn not_permitted(message: impl Into<String>) -> Self {
        Self::NotPermitted(message.into())
    }

    pub fn not_eligible(tax_return: &TaxReturn) -> Self {
        Self::NotEligible {
            employee_status: tax_return.employee_status.to_string(),
            fbr_status: tax_return
                .fbr_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "none".to_string()),
        }
    }

    /// True when the error reflects an invalid state rather than bad input
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::NotEligible { .. } | Self::AlreadyFinalized(_)
        )
    }
}

impl From<PortError> for ReviewError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                Self::ReturnNotFound(format!("{entity_type} {id}"))
            }
            PortError::Conflict { message } => Self::AlreadyFinalized(message),
            other => Self::Storage(other.to_string()),
        }
    }
}
