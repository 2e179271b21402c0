//! Admin route handlers

use crate::auth::{require_admin, Claims};
use crate::db::PlatformStats;
use crate::error::ApiResult;
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{extract::State, Extension, Json};

/// Platform-wide totals
pub async fn platform_stats(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<SuccessResponse<PlatformStats>>> {
    require_admin(&claims, &state.admin_user_ids)?;

    let stats = state.platform.stats().await?;

    Ok(Json(SuccessResponse::with_data(
        "Platform stats fetched successfully.",
        stats,
    )))
}
