//! Authentication and authorization

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::{Actor, Role, UserId};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Portal role: "client", "employee", or "fbr"
    pub role: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid claims: {0}")]
    InvalidClaims(String),
}

impl Claims {
    /// Converts the token claims into the caller identity the core
    /// operations take
    pub fn actor(&self) -> Result<Actor, AuthError> {
        let user_id: UserId = self
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidClaims(format!("bad subject: {}", self.sub)))?;
        let role: Role = self
            .role
            .parse()
            .map_err(|_| AuthError::InvalidClaims(format!("bad role: {}", self.role)))?;
        Ok(Actor::new(user_id, self.name.clone(), role))
    }
}

/// Creates a new JWT token for a portal user
pub fn create_token(
    user_id: UserId,
    name: &str,
    role: Role,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: user_id.to_string(),
        name: name.to_string(),
        role: role.as_str().to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        if e.to_string().contains("ExpiredSignature") {
            AuthError::TokenExpired
        } else {
            AuthError::InvalidToken
        }
    })?;

    Ok(token_data.claims)
}
