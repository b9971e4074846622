use serde::Deserialize;

use crate::errors::AppError;
use crate::matching::compatibility::{job_compatibility, rank_by_compatibility, Ranked};
use crate::models::catalog::CandidateProfile;

/// Hard cap on returned candidates.
pub const MAX_CANDIDATE_RESULTS: usize = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateSearchRequest {
    #[serde(default)]
    pub required_codes: Vec<String>,
    /// Drop candidates scoring below this percentage.
    pub min_percent: Option<u32>,
    /// Case-insensitive substring on the candidate's location.
    pub location: Option<String>,
}

/// Normalizes the required code list: trimmed, upper-cased, empties and duplicates removed.
pub fn normalize_codes(codes: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(codes.len());
    for code in codes {
        let code = code.trim().to_uppercase();
        if !code.is_empty() && !out.contains(&code) {
            out.push(code);
        }
    }
    out
}

/// Ranks candidates by how many of the required standards they hold.
pub fn search_candidates(
    candidates: Vec<CandidateProfile>,
    request: &CandidateSearchRequest,
) -> Result<Vec<Ranked<CandidateProfile>>, AppError> {
    if let Some(min) = request.min_percent {
        if min > 100 {
            return Err(AppError::Validation(
                "min_percent must be between 0 and 100".to_string(),
            ));
        }
    }

    let required = normalize_codes(&request.required_codes);
    let location = request
        .location
        .as_deref()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty());

    let filtered: Vec<CandidateProfile> = candidates
        .into_iter()
        .filter(|c| match &location {
            Some(loc) => c.location.to_lowercase().contains(loc),
            None => true,
        })
        .collect();

    let min_percent = request.min_percent.unwrap_or(0);
    let ranked = rank_by_compatibility(filtered, |c| {
        let held: Vec<String> = c.certified_codes.iter().map(|s| s.to_uppercase()).collect();
        job_compatibility(&required, &held)
    })
    .into_iter()
    .filter(|r| r.compatibility.percent >= min_percent)
    .take(MAX_CANDIDATE_RESULTS)
    .collect();

    Ok(ranked)
}
