use std::sync::Arc;

use crate::analysis::intake::ResumeArchive;
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::progress::repository::ProgressRepository;
use crate::search::debounce::SuggestionSessions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Standards, jobs, posts, badge benefits and candidates. Postgres in production.
    pub catalog: Arc<dyn CatalogStore>,
    /// Per-learner progress and last analysis. Redis in production.
    pub learners: Arc<dyn ProgressRepository>,
    pub resume_archive: ResumeArchive,
    pub llm: LlmClient,
    pub config: Config,
    pub suggestions: Arc<SuggestionSessions>,
}
