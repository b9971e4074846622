use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::matching::compatibility::{job_compatibility, rank_by_compatibility, Ranked};
use crate::models::catalog::JobOpening;
use crate::progress::handlers::LearnerQuery;
use crate::progress::service::{load_state, normalize_email};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub enrolled_codes: Vec<String>,
    pub jobs: Vec<Ranked<JobOpening>>,
}

/// GET /api/v1/jobs
///
/// Job openings ranked by how many of their required standards the learner is enrolled in.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<LearnerQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let email = normalize_email(&params.email)?;
    let learner = load_state(state.learners.as_ref(), &email).await?;
    let enrolled_codes = learner.progress.enrolled_codes();

    let jobs = state.catalog.list_jobs().await?;
    let jobs = rank_by_compatibility(jobs, |job| {
        job_compatibility(&job.required_standard_codes, &enrolled_codes)
    });

    Ok(Json(JobListResponse {
        enrolled_codes,
        jobs,
    }))
}
