//! Axum route handlers for the Interviews API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::OwnerId;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::interviews::manager::{get_owned_interview, list_interviews, save_interview};
use crate::interviews::models::{InterviewFeedback, InterviewRecord, InterviewRequest};
use crate::interviews::scoring::{get_feedback, submit_feedback};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    /// One answer per question, in question order.
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InterviewListResponse {
    pub interviews: Vec<InterviewRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Validates the job parameters, generates questions and creates the interview.
pub async fn handle_create_interview(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    AppJson(request): AppJson<InterviewRequest>,
) -> Result<(StatusCode, Json<InterviewRecord>), AppError> {
    let record = save_interview(state.store.as_ref(), &state.llm, request, None, &owner_id).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<InterviewListResponse>, AppError> {
    let interviews = list_interviews(state.store.as_ref(), &owner_id).await?;
    Ok(Json(InterviewListResponse { interviews }))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(id): Path<String>,
) -> Result<Json<InterviewRecord>, AppError> {
    let record = get_owned_interview(state.store.as_ref(), &id, &owner_id).await?;
    Ok(Json(record))
}

/// PUT /api/v1/interviews/:id
///
/// Regenerates questions for new job parameters. Identity and creation time are kept.
pub async fn handle_update_interview(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(id): Path<String>,
    AppJson(request): AppJson<InterviewRequest>,
) -> Result<Json<InterviewRecord>, AppError> {
    let existing = get_owned_interview(state.store.as_ref(), &id, &owner_id).await?;
    let record = save_interview(
        state.store.as_ref(),
        &state.llm,
        request,
        Some(&existing),
        &owner_id,
    )
    .await?;
    Ok(Json(record))
}

/// POST /api/v1/interviews/:id/feedback
///
/// Scores the submitted answers against the stored reference answers.
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(id): Path<String>,
    AppJson(request): AppJson<FeedbackRequest>,
) -> Result<Json<InterviewFeedback>, AppError> {
    let interview = get_owned_interview(state.store.as_ref(), &id, &owner_id).await?;
    let feedback = submit_feedback(
        state.store.as_ref(),
        &state.llm,
        &interview,
        &owner_id,
        &request.answers,
    )
    .await?;
    Ok(Json(feedback))
}

/// GET /api/v1/interviews/:id/feedback
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(id): Path<String>,
) -> Result<Json<InterviewFeedback>, AppError> {
    let interview = get_owned_interview(state.store.as_ref(), &id, &owner_id).await?;
    let feedback = get_feedback(state.store.as_ref(), &interview.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No feedback for interview {id} yet")))?;
    Ok(Json(feedback))
}
