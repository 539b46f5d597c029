//! Request middleware: bearer auth and audit logging.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

use core_kernel::Actor;

use crate::AppState;

/// Validates the bearer token and places the resulting [`Actor`] into
/// request extensions for the handlers. Requests without a valid token
/// never reach a handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = match bearer_token(&request) {
        Some(token) => token,
        None => {
            warn!("Missing or invalid Authorization header");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let claims = match crate::auth::validate_token(token, &state.config.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Token validation failed: {:?}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    match claims.actor() {
        Ok(actor) => {
            request.extensions_mut().insert(actor);
            Ok(next.run(request).await)
        }
        Err(e) => {
            warn!("Token claims rejected: {:?}", e);
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Logs every request with the acting user and role for the audit trail.
pub async fn audit_middleware(
    State(_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let (user, role) = request
        .extensions()
        .get::<Actor>()
        .map(|a| (a.user_id.to_string(), a.role.to_string()))
        .unwrap_or_else(|| ("anonymous".to_string(), "none".to_string()));

    let start = Instant::now();
    let response = next.run(request).await;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        user = %user,
        role = %role,
        status = %status.as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "API request"
    );

    response
}
