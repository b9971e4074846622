use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::progress::calculator::StandardSummary;
use crate::progress::service::{self, normalize_email, ProgressOverview};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LearnerQuery {
    pub email: String,
}

#[derive(Deserialize)]
pub struct EnrollRequest {
    pub email: String,
    pub standard_code: String,
}

#[derive(Deserialize)]
pub struct ToggleModuleRequest {
    pub email: String,
    pub standard_code: String,
    pub module_id: String,
}

/// GET /api/v1/progress
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Query(params): Query<LearnerQuery>,
) -> Result<Json<ProgressOverview>, AppError> {
    let email = normalize_email(&params.email)?;
    let view = service::overview(state.learners.as_ref(), state.catalog.as_ref(), &email).await?;
    Ok(Json(view))
}

/// POST /api/v1/progress/enrollments
pub async fn handle_enroll(
    State(state): State<AppState>,
    Json(req): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<StandardSummary>), AppError> {
    let email = normalize_email(&req.email)?;
    let summary = service::enroll(
        state.learners.as_ref(),
        state.catalog.as_ref(),
        &email,
        req.standard_code.trim(),
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// POST /api/v1/progress/toggle
pub async fn handle_toggle_module(
    State(state): State<AppState>,
    Json(req): Json<ToggleModuleRequest>,
) -> Result<Json<StandardSummary>, AppError> {
    let email = normalize_email(&req.email)?;
    let summary = service::toggle_module(
        state.learners.as_ref(),
        state.catalog.as_ref(),
        &email,
        req.standard_code.trim(),
        req.module_id.trim(),
        Utc::now(),
    )
    .await?;
    Ok(Json(summary))
}

/// DELETE /api/v1/progress
///
/// Logout: learner state is session-scoped and dropped here.
pub async fn handle_clear_progress(
    State(state): State<AppState>,
    Query(params): Query<LearnerQuery>,
) -> Result<StatusCode, AppError> {
    let email = normalize_email(&params.email)?;
    state.learners.clear(&email).await?;
    info!("Cleared learner state for {email}");
    Ok(StatusCode::NO_CONTENT)
}
