//! Storage error types

use thiserror::Error;

use core_kernel::PortError;
use domain_billing::BillingError;
use domain_filing::FilingError;
use domain_requests::RequestError;

/// Errors raised inside the storage adapters before they cross a port
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Stored row could not be decoded into its aggregate
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Pool exhaustion
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl StoreError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        StoreError::NotFound(format!("{entity} with id '{id}' not found"))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    Some("23505") => StoreError::DuplicateEntry(db_err.message().to_string()),
                    _ => StoreError::QueryFailed(db_err.message().to_string()),
                }
            }
            other => StoreError::QueryFailed(other.to_string()),
        }
    }
}

/// Maps a filing aggregate error raised inside an adapter onto the port:
/// input problems become validation, illegal transitions become conflicts.
pub(crate) fn filing_err(err: FilingError) -> PortError {
    match err {
        FilingError::Validation(message) => PortError::validation(message),
        FilingError::Money(err) => PortError::validation(err.to_string()),
        other => PortError::conflict(other.to_string()),
    }
}

pub(crate) fn request_err(err: RequestError) -> PortError {
    match err {
        RequestError::Validation(message) => PortError::validation(message),
        other => PortError::conflict(other.to_string()),
    }
}

pub(crate) fn billing_err(err: BillingError) -> PortError {
    match err {
        BillingError::Validation(message) => PortError::validation(message),
        BillingError::Money(err) => PortError::validation(err.to_string()),
        other => PortError::conflict(other.to_string()),
    }
}

impl From<StoreError> for PortError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(message) => PortError::NotFound {
                entity_type: "row".to_string(),
                id: message,
            },
            StoreError::DuplicateEntry(message) => PortError::conflict(message),
            StoreError::ConnectionFailed(message) | StoreError::QueryFailed(message) => {
                PortError::connection(message)
            }
            StoreError::CorruptRow(message) => PortError::internal(message),
            StoreError::PoolExhausted => {
                PortError::connection("connection pool exhausted".to_string())
            }
        }
    }
}
