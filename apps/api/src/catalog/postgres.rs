use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::catalog::CatalogStore;
use crate::errors::AppError;
use crate::models::catalog::{
    BadgeBenefitRow, CandidateProfile, JobOpening, ModuleRow, Standard, StandardRow,
};
use crate::models::community::{CommunityPostRow, NewCommunityPost};

const MODULE_COLUMNS: &str =
    "standard_code, module_id, title, duration, is_practical, position";

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads module rows for `rows` in one query and assembles full standards.
    async fn attach_modules(&self, rows: Vec<StandardRow>) -> Result<Vec<Standard>, AppError> {
        if rows.is_empty() {
            return Ok(vec![]);
        }
        let codes: Vec<String> = rows.iter().map(|r| r.code.clone()).collect();
        let modules = sqlx::query_as::<_, ModuleRow>(&format!(
            "SELECT {MODULE_COLUMNS} FROM standard_modules \
             WHERE standard_code = ANY($1) ORDER BY standard_code, position"
        ))
        .bind(&codes)
        .fetch_all(&self.pool)
        .await?;

        let mut by_code: HashMap<String, Vec<ModuleRow>> = HashMap::new();
        for m in modules {
            by_code.entry(m.standard_code.clone()).or_default().push(m);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let modules = by_code.remove(&row.code).unwrap_or_default();
                Standard::from_rows(row, modules)
            })
            .collect())
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_standards(&self) -> Result<Vec<Standard>, AppError> {
        let rows = sqlx::query_as::<_, StandardRow>(
            "SELECT code, title, description, category FROM standards ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;
        self.attach_modules(rows).await
    }

    async fn get_standard(&self, code: &str) -> Result<Option<Standard>, AppError> {
        let row = sqlx::query_as::<_, StandardRow>(
            "SELECT code, title, description, category FROM standards WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.attach_modules(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn related_standards(
        &self,
        category: &str,
        exclude_code: &str,
        limit: i64,
    ) -> Result<Vec<Standard>, AppError> {
        let rows = sqlx::query_as::<_, StandardRow>(
            r#"
            SELECT code, title, description, category
            FROM standards
            WHERE category = $1 AND code <> $2
            ORDER BY code
            LIMIT $3
            "#,
        )
        .bind(category)
        .bind(exclude_code)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        self.attach_modules(rows).await
    }

    async fn list_jobs(&self) -> Result<Vec<JobOpening>, AppError> {
        Ok(sqlx::query_as::<_, JobOpening>(
            r#"
            SELECT id, title, company, location, description, required_standard_codes
            FROM job_openings
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_posts(
        &self,
        search: Option<&str>,
        limit: i64,
    ) -> Result<Vec<CommunityPostRow>, AppError> {
        let posts = match search {
            Some(q) => {
                sqlx::query_as::<_, CommunityPostRow>(
                    r#"
                    SELECT * FROM community_posts
                    WHERE content ILIKE $1 ESCAPE '\' OR author_name ILIKE $1 ESCAPE '\'
                    ORDER BY created_at DESC
                    LIMIT $2
                    "#,
                )
                .bind(like_pattern(q))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CommunityPostRow>(
                    "SELECT * FROM community_posts ORDER BY created_at DESC LIMIT $1",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(posts)
    }

    async fn create_post(&self, post: NewCommunityPost) -> Result<CommunityPostRow, AppError> {
        let row = sqlx::query_as::<_, CommunityPostRow>(
            r#"
            INSERT INTO community_posts (id, author_name, author_email, content, standard_code)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&post.author_name)
        .bind(&post.author_email)
        .bind(&post.content)
        .bind(&post.standard_code)
        .fetch_one(&self.pool)
        .await?;

        info!("Created community post {} by {}", row.id, row.author_email);
        Ok(row)
    }

    async fn like_post(&self, id: Uuid) -> Result<Option<CommunityPostRow>, AppError> {
        Ok(sqlx::query_as::<_, CommunityPostRow>(
            "UPDATE community_posts SET likes = likes + 1 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn badge_benefits(&self) -> Result<Vec<BadgeBenefitRow>, AppError> {
        Ok(sqlx::query_as::<_, BadgeBenefitRow>(
            r#"
            SELECT badge_id, discount_pct, premium_access_days, special_features
            FROM badge_benefits
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_candidates(&self) -> Result<Vec<CandidateProfile>, AppError> {
        Ok(sqlx::query_as::<_, CandidateProfile>(
            r#"
            SELECT id, full_name, headline, location, certified_codes
            FROM candidate_profiles
            ORDER BY full_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

/// Wraps `q` for ILIKE, escaping the pattern metacharacters.
fn like_pattern(q: &str) -> String {
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
