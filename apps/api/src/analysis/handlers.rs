use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{analyze_resume, prepare_resume_text, AnalysisResult};
use crate::analysis::intake::{detect_format, extract_text, ResumeFormat};
use crate::errors::AppError;
use crate::progress::service::{load_state, normalize_email};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub email: String,
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: AnalysisResult,
    /// S3 key of the archived upload, for file submissions.
    pub archived_key: Option<String>,
}

/// POST /api/v1/analysis
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let email = normalize_email(&req.email)?;
    let resume_text = prepare_resume_text(&req.resume_text)?;

    let analysis = run_analysis(&state, &resume_text).await?;
    record_analysis(&state, &email, &analysis).await?;
    Ok(Json(AnalysisResponse {
        analysis,
        archived_key: None,
    }))
}

/// POST /api/v1/analysis/upload
///
/// Multipart form with an `email` field and a `file` field (PDF or plain text).
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut email: Option<String> = None;
    let mut upload: Option<(ResumeFormat, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("email") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed email field: {e}")))?;
                email = Some(value);
            }
            Some("file") => {
                let format = detect_format(field.file_name(), field.content_type()).ok_or_else(
                    || AppError::Validation("Résumé must be a PDF or plain-text file".to_string()),
                )?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed file field: {e}")))?;
                upload = Some((format, data));
            }
            _ => {}
        }
    }

    let email = normalize_email(
        email
            .as_deref()
            .ok_or_else(|| AppError::Validation("Field 'email' is required".to_string()))?,
    )?;
    let (format, data) =
        upload.ok_or_else(|| AppError::Validation("Field 'file' is required".to_string()))?;

    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::Validation(format!(
            "Uploaded file exceeds {} bytes",
            state.config.max_upload_bytes
        )));
    }

    let raw_text = extract_text(format, data.clone()).await?;
    let resume_text = prepare_resume_text(&raw_text)?;

    // A failed analysis leaves nothing behind in the archive or the learner state.
    let analysis = run_analysis(&state, &resume_text).await?;
    let archived_key = state.resume_archive.store(&email, format, data).await?;
    record_analysis(&state, &email, &analysis).await?;

    Ok(Json(AnalysisResponse {
        analysis,
        archived_key: Some(archived_key),
    }))
}

async fn run_analysis(state: &AppState, resume_text: &str) -> Result<AnalysisResult, AppError> {
    let standards = state.catalog.list_standards().await?;
    analyze_resume(&state.llm, &standards, resume_text, Utc::now()).await
}

/// Saves the analysis as the learner's latest result.
async fn record_analysis(
    state: &AppState,
    email: &str,
    analysis: &AnalysisResult,
) -> Result<(), AppError> {
    let learner = load_state(state.learners.as_ref(), email).await?;
    state
        .learners
        .save(email, &learner.with_analysis(analysis.clone()))
        .await?;
    Ok(())
}
