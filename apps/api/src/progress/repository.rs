//! Persistence for per-learner state.
//!
//! Learner state is one JSON document per lower-cased email. The document carries
//! a `schema_version`; anything other than `SCHEMA_VERSION` is refused on load.

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::analysis::analyzer::AnalysisResult;
use crate::progress::store::LearnerProgress;

pub const SCHEMA_VERSION: u32 = 1;

const KEY_PREFIX: &str = "portal:learner:";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Malformed learner state: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported learner state schema version {found} (expected {expected})")]
    UnsupportedSchema { found: u64, expected: u32 },
}

/// Everything the portal remembers about one learner between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerState {
    pub schema_version: u32,
    #[serde(default)]
    pub progress: LearnerProgress,
    #[serde(default)]
    pub last_analysis: Option<AnalysisResult>,
}

impl Default for LearnerState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            progress: LearnerProgress::default(),
            last_analysis: None,
        }
    }
}

impl LearnerState {
    pub fn with_progress(&self, progress: LearnerProgress) -> Self {
        Self {
            progress,
            ..self.clone()
        }
    }

    pub fn with_analysis(&self, analysis: AnalysisResult) -> Self {
        Self {
            last_analysis: Some(analysis),
            ..self.clone()
        }
    }
}

/// Storage seam for learner state. Swap the backend without touching handlers.
///
/// Carried in `AppState` as `Arc<dyn ProgressRepository>`.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn load(&self, email: &str) -> Result<Option<LearnerState>, RepositoryError>;
    async fn save(&self, email: &str, state: &LearnerState) -> Result<(), RepositoryError>;
    async fn clear(&self, email: &str) -> Result<(), RepositoryError>;
}

pub fn learner_key(email: &str) -> String {
    format!("{KEY_PREFIX}{}", email.trim().to_lowercase())
}

pub fn encode(state: &LearnerState) -> Result<String, RepositoryError> {
    Ok(serde_json::to_string(state)?)
}

/// Decodes a stored document, checking the schema version before the shape.
pub fn decode(raw: &str) -> Result<LearnerState, RepositoryError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let found = value
        .get("schema_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    if found != SCHEMA_VERSION as u64 {
        return Err(RepositoryError::UnsupportedSchema {
            found,
            expected: SCHEMA_VERSION,
        });
    }
    Ok(serde_json::from_value(value)?)
}

// ────────────────────────────────────────────────────────────────────────────
// Redis backend
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisProgressRepository {
    client: redis::Client,
}

impl RedisProgressRepository {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProgressRepository for RedisProgressRepository {
    async fn load(&self, email: &str) -> Result<Option<LearnerState>, RepositoryError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(learner_key(email)).await?;
        debug!("Loaded learner state for {email} (present: {})", raw.is_some());
        raw.as_deref().map(decode).transpose()
    }

    async fn save(&self, email: &str, state: &LearnerState) -> Result<(), RepositoryError> {
        let payload = encode(state)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(learner_key(email), payload).await?;
        Ok(())
    }

    async fn clear(&self, email: &str) -> Result<(), RepositoryError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(learner_key(email)).await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::InMemoryProgressRepository;
