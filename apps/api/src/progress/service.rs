//! Read-modify-write of learner state: load the snapshot, derive the next one,
//! save it, return it. Nothing here mutates a snapshot in place.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::analyzer::AnalysisResult;
use crate::catalog::CatalogStore;
use crate::errors::AppError;
use crate::models::catalog::Standard;
use crate::progress::calculator::{summarize, StandardSummary};
use crate::progress::repository::{LearnerState, ProgressRepository};

#[derive(Debug, Serialize)]
pub struct ProgressOverview {
    pub email: String,
    pub total_completed_modules: usize,
    pub standards: Vec<StandardSummary>,
    pub last_analysis: Option<AnalysisResult>,
}

/// Trims and lower-cases an email; rejects anything without an `@`.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    Ok(email)
}

/// Loads a learner's state; a learner with nothing saved gets an empty state.
pub async fn load_state(
    repo: &dyn ProgressRepository,
    email: &str,
) -> Result<LearnerState, AppError> {
    Ok(repo.load(email).await?.unwrap_or_default())
}

pub async fn require_standard(catalog: &dyn CatalogStore, code: &str) -> Result<Standard, AppError> {
    catalog
        .get_standard(code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Standard {code} not found")))
}

pub async fn enroll(
    repo: &dyn ProgressRepository,
    catalog: &dyn CatalogStore,
    email: &str,
    code: &str,
    now: DateTime<Utc>,
) -> Result<StandardSummary, AppError> {
    let standard = require_standard(catalog, code).await?;
    let state = load_state(repo, email).await?;

    let next = state.with_progress(state.progress.enroll(&standard.code, now));
    repo.save(email, &next).await?;

    info!("Learner {email} enrolled in {}", standard.code);
    Ok(summarize(&next.progress, &standard))
}

pub async fn toggle_module(
    repo: &dyn ProgressRepository,
    catalog: &dyn CatalogStore,
    email: &str,
    code: &str,
    module_id: &str,
    now: DateTime<Utc>,
) -> Result<StandardSummary, AppError> {
    let standard = require_standard(catalog, code).await?;
    let state = load_state(repo, email).await?;

    let progress = state.progress.toggle_module(&standard, module_id, now)?;
    let next = state.with_progress(progress);
    repo.save(email, &next).await?;

    info!(
        "Learner {email} toggled module {module_id} of {} (completed: {})",
        standard.code,
        next.progress.is_completed(&standard.code, module_id)
    );
    Ok(summarize(&next.progress, &standard))
}

pub async fn overview(
    repo: &dyn ProgressRepository,
    catalog: &dyn CatalogStore,
    email: &str,
) -> Result<ProgressOverview, AppError> {
    let state = load_state(repo, email).await?;

    let mut standards = Vec::new();
    for (code, _) in state.progress.iter() {
        match catalog.get_standard(code).await? {
            Some(standard) => standards.push(summarize(&state.progress, &standard)),
            None => warn!("Learner {email} is enrolled in unknown standard {code}"),
        }
    }

    Ok(ProgressOverview {
        email: email.to_string(),
        total_completed_modules: state.progress.total_completed(),
        standards,
        last_analysis: state.last_analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::InMemoryCatalog;
    use crate::progress::calculator::ModuleStatus;
    use crate::progress::repository::InMemoryProgressRepository;
    use crate::progress::store::tests::make_standard;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 10, 12, 0, 0).unwrap()
    }

    fn fixtures() -> (InMemoryProgressRepository, InMemoryCatalog) {
        (
            InMemoryProgressRepository::default(),
            InMemoryCatalog::with_standards(vec![
                make_standard("EC0217.01", 3),
                make_standard("EC0301", 2),
            ]),
        )
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Ana@Mail.com ").unwrap(), "ana@mail.com");
        assert!(matches!(normalize_email("   "), Err(AppError::Validation(_))));
        assert!(matches!(normalize_email("nobody"), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_enroll_unknown_standard_is_not_found() {
        let (repo, catalog) = fixtures();
        let err = enroll(&repo, &catalog, "ana@mail.com", "EC9999", now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_enroll_then_toggle_persists() {
        let (repo, catalog) = fixtures();
        let summary = enroll(&repo, &catalog, "ana@mail.com", "EC0217.01", now())
            .await
            .unwrap();
        assert_eq!(summary.percent, 0);
        assert_eq!(summary.modules[0].status, ModuleStatus::Unlocked);

        let summary = toggle_module(&repo, &catalog, "ana@mail.com", "EC0217.01", "m1", now())
            .await
            .unwrap();
        assert_eq!(summary.percent, 33);

        let saved = repo.load("ana@mail.com").await.unwrap().unwrap();
        assert!(saved.progress.is_completed("EC0217.01", "m1"));
    }

    #[tokio::test]
    async fn test_locked_toggle_leaves_saved_state_untouched() {
        let (repo, catalog) = fixtures();
        enroll(&repo, &catalog, "ana@mail.com", "EC0217.01", now())
            .await
            .unwrap();
        let before = repo.load("ana@mail.com").await.unwrap();

        let err = toggle_module(&repo, &catalog, "ana@mail.com", "EC0217.01", "m3", now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.load("ana@mail.com").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_overview_lists_enrolled_standards() {
        let (repo, catalog) = fixtures();
        enroll(&repo, &catalog, "ana@mail.com", "EC0301", now())
            .await
            .unwrap();
        toggle_module(&repo, &catalog, "ana@mail.com", "EC0301", "m1", now())
            .await
            .unwrap();

        let view = overview(&repo, &catalog, "ana@mail.com").await.unwrap();
        assert_eq!(view.total_completed_modules, 1);
        assert_eq!(view.standards.len(), 1);
        assert_eq!(view.standards[0].percent, 50);
    }
}
