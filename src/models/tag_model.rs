use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::entities::tag;

#[derive(Debug, Clone, Serialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub use_count: i32,
}

impl From<tag::Model> for TagResponse {
    fn from(t: tag::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            slug: t.slug,
            use_count: t.use_count,
        }
    }
}

/// Form tambah / ubah nama tag di halaman admin.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct TagForm {
    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    #[validate(custom(function = "crate::utils::validator_utils::validate_sluggable"))]
    #[validate(length(max = 100, message = "Nama tag maksimal 100 karakter."))]
    pub name: String,
}

#[derive(Deserialize)]
pub struct PopularTagParams {
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct TagIndexParams {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct TagIndexView {
    pub page_title: String,
    pub tags: Vec<TagResponse>,
    pub flash: Option<String>,
    pub old_name: String,
    pub name_error: Option<String>,
}
