use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::catalog::Standard;
use crate::state::AppState;

const RELATED_LIMIT: i64 = 4;

#[derive(Debug, Serialize)]
pub struct StandardDetail {
    pub standard: Standard,
    pub related: Vec<Standard>,
}

/// GET /api/v1/standards
pub async fn handle_list_standards(
    State(state): State<AppState>,
) -> Result<Json<Vec<Standard>>, AppError> {
    Ok(Json(state.catalog.list_standards().await?))
}

/// GET /api/v1/standards/:code
pub async fn handle_get_standard(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StandardDetail>, AppError> {
    let code = code.trim().to_string();
    let standard = state
        .catalog
        .get_standard(&code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Standard {code} not found")))?;
    let related = state
        .catalog
        .related_standards(&standard.category, &standard.code, RELATED_LIMIT)
        .await?;
    Ok(Json(StandardDetail { standard, related }))
}
