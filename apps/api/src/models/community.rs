use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommunityPostRow {
    pub id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub standard_code: Option<String>,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a new post. `id`, `likes` and `created_at` are assigned on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCommunityPost {
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub standard_code: Option<String>,
}
