use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::catalog::CatalogStore;
use crate::errors::AppError;
use crate::models::catalog::{BadgeBenefitRow, CandidateProfile, JobOpening, Standard};
use crate::models::community::{CommunityPostRow, NewCommunityPost};

/// In-memory catalog used by tests.
#[derive(Default)]
pub struct InMemoryCatalog {
    pub standards: Vec<Standard>,
    pub jobs: Vec<JobOpening>,
    pub benefits: Vec<BadgeBenefitRow>,
    pub candidates: Vec<CandidateProfile>,
    pub posts: Mutex<Vec<CommunityPostRow>>,
}

impl InMemoryCatalog {
    pub fn with_standards(standards: Vec<Standard>) -> Self {
        Self {
            standards,
            ..Self::default()
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list_standards(&self) -> Result<Vec<Standard>, AppError> {
        let mut all = self.standards.clone();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(all)
    }

    async fn get_standard(&self, code: &str) -> Result<Option<Standard>, AppError> {
        Ok(self.standards.iter().find(|s| s.code == code).cloned())
    }

    async fn related_standards(
        &self,
        category: &str,
        exclude_code: &str,
        limit: i64,
    ) -> Result<Vec<Standard>, AppError> {
        Ok(self
            .list_standards()
            .await?
            .into_iter()
            .filter(|s| s.category == category && s.code != exclude_code)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn list_jobs(&self) -> Result<Vec<JobOpening>, AppError> {
        Ok(self.jobs.clone())
    }

    async fn list_posts(
        &self,
        search: Option<&str>,
        limit: i64,
    ) -> Result<Vec<CommunityPostRow>, AppError> {
        let posts = self.posts.lock().await;
        let needle = search.map(str::to_lowercase);
        let mut matching: Vec<_> = posts
            .iter()
            .filter(|p| match &needle {
                Some(n) => {
                    p.content.to_lowercase().contains(n)
                        || p.author_name.to_lowercase().contains(n)
                }
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit.max(0) as usize);
        Ok(matching)
    }

    async fn create_post(&self, post: NewCommunityPost) -> Result<CommunityPostRow, AppError> {
        let row = CommunityPostRow {
            id: Uuid::new_v4(),
            author_name: post.author_name,
            author_email: post.author_email,
            content: post.content,
            standard_code: post.standard_code,
            likes: 0,
            created_at: Utc::now(),
        };
        self.posts.lock().await.push(row.clone());
        Ok(row)
    }

    async fn like_post(&self, id: Uuid) -> Result<Option<CommunityPostRow>, AppError> {
        let mut posts = self.posts.lock().await;
        Ok(posts.iter_mut().find(|p| p.id == id).map(|p| {
            p.likes += 1;
            p.clone()
        }))
    }

    async fn badge_benefits(&self) -> Result<Vec<BadgeBenefitRow>, AppError> {
        Ok(self.benefits.clone())
    }

    async fn list_candidates(&self) -> Result<Vec<CandidateProfile>, AppError> {
        Ok(self.candidates.clone())
    }
}
