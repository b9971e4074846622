//! Catalog Store: read-mostly access to standards, job openings, community posts,
//! badge benefits and candidate profiles.
//!
//! `AppState` holds an `Arc<dyn CatalogStore>`; production uses `PgCatalogStore`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::catalog::{BadgeBenefitRow, CandidateProfile, JobOpening, Standard};
use crate::models::community::{CommunityPostRow, NewCommunityPost};

pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgCatalogStore;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All standards, ordered by code, modules in catalog order.
    async fn list_standards(&self) -> Result<Vec<Standard>, AppError>;

    async fn get_standard(&self, code: &str) -> Result<Option<Standard>, AppError>;

    /// Other standards in `category`, excluding `exclude_code`.
    async fn related_standards(
        &self,
        category: &str,
        exclude_code: &str,
        limit: i64,
    ) -> Result<Vec<Standard>, AppError>;

    async fn list_jobs(&self) -> Result<Vec<JobOpening>, AppError>;

    /// Newest first. `search` matches post content or author name, case-insensitively.
    async fn list_posts(
        &self,
        search: Option<&str>,
        limit: i64,
    ) -> Result<Vec<CommunityPostRow>, AppError>;

    async fn create_post(&self, post: NewCommunityPost) -> Result<CommunityPostRow, AppError>;

    /// Increments the like counter. `None` if the post does not exist.
    async fn like_post(&self, id: Uuid) -> Result<Option<CommunityPostRow>, AppError>;

    async fn badge_benefits(&self) -> Result<Vec<BadgeBenefitRow>, AppError>;

    async fn list_candidates(&self) -> Result<Vec<CandidateProfile>, AppError>;
}
