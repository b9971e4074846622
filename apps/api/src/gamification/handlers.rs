use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::errors::AppError;
use crate::gamification::badges::attach_benefits;
use crate::gamification::deriver::{derive_summary, GamificationSummary};
use crate::progress::handlers::LearnerQuery;
use crate::progress::service::{load_state, normalize_email};
use crate::state::AppState;

/// GET /api/v1/gamification
pub async fn handle_get_gamification(
    State(state): State<AppState>,
    Query(params): Query<LearnerQuery>,
) -> Result<Json<GamificationSummary>, AppError> {
    let email = normalize_email(&params.email)?;
    let learner = load_state(state.learners.as_ref(), &email).await?;

    let mut summary = derive_summary(&learner.progress, Utc::now().date_naive());
    let benefits = state.catalog.badge_benefits().await?;
    summary.badges = attach_benefits(summary.badges, &benefits);

    Ok(Json(summary))
}
