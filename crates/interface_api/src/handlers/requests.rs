//! Info request handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use core_kernel::{Actor, ClientId, RequestId, ReturnId};
use domain_requests::NewRequest;

use crate::dto::requests::*;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::AppState;

/// Opens a clarification thread against a return
pub async fn open_request(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<OpenRequestRequest>,
) -> Result<(StatusCode, Json<RequestResponse>), ApiError> {
    request.validate()?;
    let new_request = NewRequest {
        return_id: parse_id::<ReturnId>(&request.return_id, "return")?,
        client_id: parse_id::<ClientId>(&request.client_id, "client")?,
        client_name: request.client_name,
        subject: request.subject,
        message: request.message,
    };
    let opened = state
        .services
        .requests
        .open_request(&actor, new_request)
        .await?;
    Ok((StatusCode::CREATED, Json(opened.into())))
}

/// Lists threads visible to the caller
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<RequestResponse>>, ApiError> {
    let return_id = query
        .return_id
        .as_deref()
        .map(|raw| parse_id::<ReturnId>(raw, "return"))
        .transpose()?;
    let requests = state
        .services
        .requests
        .list_requests(&actor, return_id)
        .await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// Gets one thread
pub async fn get_request(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<RequestResponse>, ApiError> {
    let id: RequestId = parse_id(&id, "request")?;
    let request = state.services.requests.get_request(&actor, id).await?;
    Ok(Json(request.into()))
}

/// Appends a reply to a thread
pub async fn reply(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<RequestResponse>, ApiError> {
    request.validate()?;
    let id: RequestId = parse_id(&id, "request")?;
    let updated = state
        .services
        .requests
        .reply(&actor, id, request.body, request.attachments)
        .await?;
    Ok(Json(updated.into()))
}

/// Resolves a thread
pub async fn resolve(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<RequestResponse>, ApiError> {
    let id: RequestId = parse_id(&id, "request")?;
    let resolved = state.services.requests.resolve(&actor, id).await?;
    Ok(Json(resolved.into()))
}

/// Archives a resolved thread
pub async fn close(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<RequestResponse>, ApiError> {
    let id: RequestId = parse_id(&id, "request")?;
    let closed = state.services.requests.close(&actor, id).await?;
    Ok(Json(closed.into()))
}
