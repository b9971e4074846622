use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::business::candidates::{search_candidates, CandidateSearchRequest};
use crate::business::chat::{sales_reply, SalesChatRequest, SalesReply};
use crate::errors::AppError;
use crate::matching::compatibility::Ranked;
use crate::models::catalog::CandidateProfile;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CandidateSearchResponse {
    pub total: usize,
    pub candidates: Vec<Ranked<CandidateProfile>>,
}

/// POST /api/v1/business/candidates/search
pub async fn handle_search_candidates(
    State(state): State<AppState>,
    Json(req): Json<CandidateSearchRequest>,
) -> Result<Json<CandidateSearchResponse>, AppError> {
    let pool = state.catalog.list_candidates().await?;
    let candidates = search_candidates(pool, &req)?;
    info!(
        "Candidate search for {:?} returned {} results",
        req.required_codes,
        candidates.len()
    );
    Ok(Json(CandidateSearchResponse {
        total: candidates.len(),
        candidates,
    }))
}

/// POST /api/v1/business/chat
pub async fn handle_sales_chat(
    State(state): State<AppState>,
    Json(req): Json<SalesChatRequest>,
) -> Result<Json<SalesReply>, AppError> {
    let standards = state.catalog.list_standards().await?;
    let reply = sales_reply(&state.llm, &standards, &req.messages).await?;
    Ok(Json(reply))
}
