//! Notification feed handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use core_kernel::{Actor, NotificationId};

use crate::dto::notify::*;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::AppState;

/// Lists the caller's feed, newest first
pub async fn list_feed(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let feed = state
        .services
        .notify
        .list_feed(&actor, query.unread_only)
        .await?;
    Ok(Json(feed.into_iter().map(Into::into).collect()))
}

/// Count of unread entries in the caller's feed
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let unread = state.services.notify.unread_count(&actor).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// Marks one of the caller's entries read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let id: NotificationId = parse_id(&id, "notification")?;
    let notification = state.services.notify.mark_read(&actor, id).await?;
    Ok(Json(notification.into()))
}
