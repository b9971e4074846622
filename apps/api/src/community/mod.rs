// Community feed: posts, search and likes.

pub mod handlers;

use crate::errors::AppError;
use crate::models::community::NewCommunityPost;
use crate::progress::service::normalize_email;

pub const MAX_POST_CHARS: usize = 2_000;
pub const MAX_AUTHOR_CHARS: usize = 120;
pub const FEED_LIMIT: i64 = 50;

/// Trims and validates a post before it is stored.
pub fn validate_post(post: NewCommunityPost) -> Result<NewCommunityPost, AppError> {
    let content = post.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::Validation("Post content cannot be empty".to_string()));
    }
    if content.chars().count() > MAX_POST_CHARS {
        return Err(AppError::Validation(format!(
            "Posts are limited to {MAX_POST_CHARS} characters"
        )));
    }

    let author_name = post.author_name.trim().to_string();
    if author_name.is_empty() || author_name.chars().count() > MAX_AUTHOR_CHARS {
        return Err(AppError::Validation("Author name is required".to_string()));
    }

    let standard_code = post
        .standard_code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(NewCommunityPost {
        author_name,
        author_email: normalize_email(&post.author_email)?,
        content,
        standard_code,
    })
}

/// Blank search terms mean "no filter".
pub fn normalize_search(q: Option<&str>) -> Option<&str> {
    q.map(str::trim).filter(|q| !q.is_empty())
}
