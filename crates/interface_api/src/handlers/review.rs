//! FBR review handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use core_kernel::{Actor, ReturnId};

use crate::dto::returns::ReturnResponse;
use crate::dto::review::*;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::AppState;

/// Lists the decision queue
pub async fn queue(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ReturnResponse>>, ApiError> {
    let returns = state.services.review.queue(&actor).await?;
    Ok(Json(returns.into_iter().map(Into::into).collect()))
}

/// Assembles the review context for one return
pub async fn review_context(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ReviewContextResponse>, ApiError> {
    let id: ReturnId = parse_id(&id, "return")?;
    let context = state.services.review.review_context(&actor, id).await?;
    Ok(Json(context.into()))
}

/// Marks a queued return as under review
pub async fn take_up(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let id: ReturnId = parse_id(&id, "return")?;
    let tax_return = state.services.review.take_up(&actor, id).await?;
    Ok(Json(tax_return.into()))
}

/// Applies the officer's terminal ruling
pub async fn decide(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let id: ReturnId = parse_id(&id, "return")?;
    let (tax_return, decision) = state
        .services
        .review
        .decide(&actor, id, request.ruling, request.notes)
        .await?;
    Ok(Json(DecisionResponse::from_outcome(
        decision,
        tax_return.fbr_status,
    )))
}
