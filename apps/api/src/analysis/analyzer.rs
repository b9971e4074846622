//! Résumé analysis: one LLM call mapping a résumé onto the standards catalog.
//!
//! The result is stored as the learner's `last_analysis`. A failed call is reported
//! to the caller with the provider's message and leaves saved state untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::prompts::{RESUME_ANALYSIS_PROMPT_TEMPLATE, RESUME_ANALYSIS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::CATALOG_ONLY_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::catalog::Standard;

/// Résumés shorter than this are rejected before any network call.
pub const MIN_RESUME_CHARS: usize = 30;
/// Longer résumés are truncated to this many characters before prompting.
pub const MAX_RESUME_CHARS: usize = 20_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedStandard {
    pub code: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub strengths: Vec<String>,
    pub opportunities: Vec<String>,
    pub recommended_standard: RecommendedStandard,
    pub analyzed_at: DateTime<Utc>,
}

/// Shape the model is asked to return.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    opportunities: Vec<String>,
    recommended_standard: RecommendedStandard,
}

/// Trims the résumé and enforces the length bounds.
pub fn prepare_resume_text(raw: &str) -> Result<String, AppError> {
    let text = raw.trim();
    if text.chars().count() < MIN_RESUME_CHARS {
        return Err(AppError::Validation(format!(
            "Résumé text must be at least {MIN_RESUME_CHARS} characters"
        )));
    }
    Ok(text.chars().take(MAX_RESUME_CHARS).collect())
}

pub fn build_analysis_prompt(resume_text: &str, standards: &[Standard]) -> String {
    let catalog = standards
        .iter()
        .map(|s| format!("{} | {}", s.code, s.title))
        .collect::<Vec<_>>()
        .join("\n");

    RESUME_ANALYSIS_PROMPT_TEMPLATE
        .replace("{catalog}", &catalog)
        .replace("{catalog_rule}", CATALOG_ONLY_INSTRUCTION)
        .replace("{resume_text}", resume_text)
}

/// Snaps the recommended standard onto the catalog entry with the same code.
fn reconcile(raw: RawAnalysis, standards: &[Standard], now: DateTime<Utc>) -> AnalysisResult {
    let recommended = standards
        .iter()
        .find(|s| s.code.eq_ignore_ascii_case(raw.recommended_standard.code.trim()))
        .map(|s| RecommendedStandard {
            code: s.code.clone(),
            title: s.title.clone(),
        })
        .unwrap_or_else(|| {
            warn!(
                "Analysis recommended {} which is not in the catalog",
                raw.recommended_standard.code
            );
            raw.recommended_standard
        });

    AnalysisResult {
        strengths: raw.strengths,
        opportunities: raw.opportunities,
        recommended_standard: recommended,
        analyzed_at: now,
    }
}

pub async fn analyze_resume(
    llm: &LlmClient,
    standards: &[Standard],
    resume_text: &str,
    now: DateTime<Utc>,
) -> Result<AnalysisResult, AppError> {
    if standards.is_empty() {
        return Err(AppError::Validation(
            "The standards catalog is empty; nothing to recommend".to_string(),
        ));
    }

    let prompt = build_analysis_prompt(resume_text, standards);
    let raw: RawAnalysis = llm
        .call_json(&prompt, RESUME_ANALYSIS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Résumé analysis failed: {e}")))?;

    let result = reconcile(raw, standards, now);
    info!(
        "Résumé analysed: {} strengths, {} opportunities, recommended {}",
        result.strengths.len(),
        result.opportunities.len(),
        result.recommended_standard.code
    );
    Ok(result)
}
