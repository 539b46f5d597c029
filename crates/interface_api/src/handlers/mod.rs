//! Request handlers

pub mod bills;
pub mod health;
pub mod notify;
pub mod requests;
pub mod returns;
pub mod review;

use std::str::FromStr;

use crate::error::ApiError;

/// Parses a path or query identifier, accepting both the prefixed display
/// form (e.g. `TRN-<uuid>`) and a bare UUID
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid {what} id: {raw}")))
}
