//! PostgreSQL adapters
//!
//! One repository per aggregate. Rows keep the scalar columns the list
//! queries filter on; nested collections (income lines, documents,
//! thread messages, bill items) live in JSONB columns and round-trip
//! through the aggregate's serde representation.
//!
//! Queries use the runtime API rather than the compile-time macros so
//! the workspace builds without a live database.

mod pool;
mod returns;
mod requests;
mod bills;
mod notifications;

pub use pool::{create_pool, DatabaseConfig, DatabasePool};
pub use returns::PgReturnStore;
pub use requests::PgRequestStore;
pub use bills::PgBillStore;
pub use notifications::PgNotificationStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Decodes a TEXT column back into a serde snake_case enum
pub(crate) fn enum_from_text<T: DeserializeOwned>(raw: &str) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|err| StoreError::CorruptRow(format!("bad enum value '{raw}': {err}")))
}

/// Encodes a serde snake_case enum for a TEXT column
pub(crate) fn enum_to_text<T: Serialize>(value: &T) -> Result<String, StoreError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Ok(s),
        Ok(other) => Err(StoreError::CorruptRow(format!(
            "enum did not serialize to a string: {other}"
        ))),
        Err(err) => Err(StoreError::CorruptRow(err.to_string())),
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value).map_err(|err| StoreError::CorruptRow(err.to_string()))
}

pub(crate) fn from_json<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|err| StoreError::CorruptRow(err.to_string()))
}
