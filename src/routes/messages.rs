//! Message route handlers

use crate::auth::Claims;
use crate::conversations::Message;
use crate::error::ApiResult;
use crate::models::{SendMessageRequest, SuccessResponse};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

/// Messages between the caller and one partner, oldest first
pub async fn get_thread(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(partner_id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse<Vec<Message>>>> {
    let messages = state.messages.thread(claims.sub, partner_id).await?;

    Ok(Json(SuccessResponse::with_data(
        "Messages fetched successfully.",
        messages,
    )))
}

/// Send a message; the receiver gets a notification
pub async fn send_message(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<Message>>)> {
    let message = payload.into_new_message(claims.sub)?;
    let sent = state
        .messages
        .send(claims.sub, claims.email.as_deref(), &message)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data("Message sent successfully.", sent)),
    ))
}
