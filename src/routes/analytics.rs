//! Analytics route handlers

use crate::analytics::{DashboardReport, MonthKey};
use crate::auth::Claims;
use crate::error::{validation_error, ApiResult};
use crate::models::{ComputeReportRequest, DashboardQuery, SuccessResponse};
use crate::state::SharedState;
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use tracing::{debug, info};
use validator::Validate;

/// Build a report from records supplied in the request body
pub async fn compute_report(
    State(state): State<SharedState>,
    Json(payload): Json<ComputeReportRequest>,
) -> ApiResult<Json<SuccessResponse<DashboardReport>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    debug!(
        "Computing report for {} proposals and {} earnings",
        payload.proposals.len(),
        payload.earnings.len()
    );

    let report = state
        .report_cache
        .get_or_build(&payload.proposals, &payload.earnings, MonthKey::of(&Utc::now()))
        .await;
    let report = if payload.omit_empty {
        report.without_empty_statuses()
    } else {
        report
    };

    Ok(Json(SuccessResponse::with_data(
        "Analytics computed successfully.",
        report,
    )))
}

/// Build the dashboard report from the caller's stored records
pub async fn dashboard(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<DashboardQuery>,
) -> ApiResult<Json<SuccessResponse<DashboardReport>>> {
    let user_id = claims.sub;

    let (proposals, earnings) = tokio::try_join!(
        state.proposals.list_for_user(user_id, None),
        state.earnings.list_for_user(user_id),
    )?;

    let report = state
        .report_cache
        .get_or_build(&proposals, &earnings, MonthKey::of(&Utc::now()))
        .await;
    let report = if params.omit_empty {
        report.without_empty_statuses()
    } else {
        report
    };

    info!(
        "Dashboard built for user {} ({} proposals, {} earnings)",
        user_id,
        proposals.len(),
        earnings.len()
    );

    Ok(Json(SuccessResponse::with_data(
        "Analytics fetched successfully.",
        report,
    )))
}
