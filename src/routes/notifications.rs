//! Notification route handlers

use crate::auth::Claims;
use crate::error::ApiResult;
use crate::models::SuccessResponse;
use crate::notifications::{MarkedRead, NotificationFeed};
use crate::state::SharedState;
use axum::{extract::State, Extension, Json};
use tracing::debug;

/// The caller's notifications with the unread count
pub async fn list_notifications(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<SuccessResponse<NotificationFeed>>> {
    let feed = NotificationFeed::new(state.notifications.list_for_user(claims.sub).await?);

    debug!(
        "User {} has {} notifications ({} unread)",
        claims.sub,
        feed.notifications.len(),
        feed.unread_count
    );

    Ok(Json(SuccessResponse::with_data(
        "Notifications fetched successfully.",
        feed,
    )))
}

/// Mark all of the caller's notifications as read
pub async fn mark_all_read(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<SuccessResponse<MarkedRead>>> {
    let updated = state.notifications.mark_all_read(claims.sub).await?;

    Ok(Json(SuccessResponse::with_data(
        "Notifications marked as read.",
        MarkedRead { updated },
    )))
}
