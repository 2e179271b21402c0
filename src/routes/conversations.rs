//! Conversation route handlers

use crate::auth::Claims;
use crate::conversations::{unique_partners, PartnerProfile};
use crate::error::ApiResult;
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{extract::State, Extension, Json};
use tracing::debug;

/// People the caller has exchanged messages with, most recent first
pub async fn list_conversations(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<SuccessResponse<Vec<PartnerProfile>>>> {
    let messages = state.messages.messages_for_user(claims.sub).await?;
    let partners = unique_partners(&messages, claims.sub);

    debug!(
        "User {} has {} conversation partners across {} messages",
        claims.sub,
        partners.len(),
        messages.len()
    );

    Ok(Json(SuccessResponse::with_data(
        "Conversations fetched successfully.",
        partners,
    )))
}
