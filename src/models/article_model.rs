use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::tag_model::TagResponse;

#[derive(Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    #[validate(length(min = 3, max = 255, message = "Title must be 3-255 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    pub content: String,

    // Nama tag; yang belum ada akan dibuat
    #[validate(length(max = 20, message = "At most 20 tags per article"))]
    pub tags: Option<Vec<String>>,
}

#[derive(Deserialize, Validate)]
pub struct SyncTagsRequest {
    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 tags per article"))]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub tags: Vec<TagResponse>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
