//! Earning route handlers

use crate::analytics::Earning;
use crate::auth::Claims;
use crate::error::ApiResult;
use crate::models::{CreateEarningRequest, SuccessResponse, UpdateEarningStatusRequest};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{debug, info};
use uuid::Uuid;

/// List the caller's earnings
pub async fn list_earnings(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<SuccessResponse<Vec<Earning>>>> {
    let earnings = state.earnings.list_for_user(claims.sub).await?;

    debug!("Listed {} earnings for user {}", earnings.len(), claims.sub);

    Ok(Json(SuccessResponse::with_data(
        "Earnings fetched successfully.",
        earnings,
    )))
}

/// Record a new earning
pub async fn create_earning(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateEarningRequest>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<Earning>>)> {
    let new_earning = payload.into_new_earning()?;
    let earning = state.earnings.create(claims.sub, &new_earning).await?;

    info!("Earning {} recorded for user {}", earning.id, claims.sub);

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data("Earning recorded successfully.", earning)),
    ))
}

/// Change an earning's status
pub async fn update_earning_status(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEarningStatusRequest>,
) -> ApiResult<Json<SuccessResponse<Earning>>> {
    let status = payload.checked_status()?;
    let earning = state
        .earnings
        .update_status(claims.sub, id, status, payload.payment_date)
        .await?;

    info!("Earning {} marked {}", id, status);

    Ok(Json(SuccessResponse::with_data(
        "Earning status updated successfully.",
        earning,
    )))
}
