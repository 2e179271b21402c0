//! Proposal route handlers

use crate::analytics::Proposal;
use crate::auth::Claims;
use crate::error::{validation_error, ApiResult, AppError};
use crate::generator::GeneratedProposal;
use crate::models::{
    GenerateProposalRequest, ProposalListQuery, SuccessResponse, UpdateProposalRequest,
};
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// List the caller's proposals, optionally filtered by status
pub async fn list_proposals(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ProposalListQuery>,
) -> ApiResult<Json<SuccessResponse<Vec<Proposal>>>> {
    let status = params.status_filter()?;
    let proposals = state.proposals.list_for_user(claims.sub, status).await?;

    debug!("Listed {} proposals for user {}", proposals.len(), claims.sub);

    Ok(Json(SuccessResponse::with_data(
        "Proposals fetched successfully.",
        proposals,
    )))
}

/// Update a proposal's status and values
pub async fn update_proposal(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProposalRequest>,
) -> ApiResult<Json<SuccessResponse<Proposal>>> {
    let update = payload.into_update()?;
    let proposal = state.proposals.update(claims.sub, id, &update).await?;

    info!("Proposal {} updated (status: {})", id, proposal.status);

    Ok(Json(SuccessResponse::with_data(
        "Proposal updated successfully.",
        proposal,
    )))
}

/// Generate a proposal draft from a project description
pub async fn generate_proposal(
    State(state): State<SharedState>,
    Json(payload): Json<GenerateProposalRequest>,
) -> ApiResult<Json<SuccessResponse<GeneratedProposal>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let generator = state.generator.as_ref().ok_or_else(|| {
        AppError::Unavailable("Proposal generator is not configured".to_string())
    })?;

    let proposal = generator.generate(payload.user_prompt.trim()).await?;

    Ok(Json(SuccessResponse::with_data(
        "Proposal generated successfully.",
        proposal,
    )))
}
