//! Notification domain errors

use thiserror::Error;

use core_kernel::PortError;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Not permitted: {0}")]
    NotPermitted(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl NotifyError {
    pub fn not_permitted(message: impl Into<String>) -> Self {
        Self::NotPermitted(message.into())
    }
}

impl From<PortError> for NotifyError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                Self::NotificationNotFound(format!("{entity_type} {id}"))
            }
            other => Self::Storage(other.to_string()),
        }
    }
}
