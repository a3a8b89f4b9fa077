use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "galleries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub title_id: String,
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_ar: Option<String>,

    pub image_path: String,
    pub link_url: Option<String>,
    // Semakin kecil, semakin atas
    pub sort_order: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Judul sesuai locale, jatuh ke versi Indonesia bila varian kosong.
    pub fn localized_title(&self, locale: &str) -> &str {
        let variant = match locale {
            "en" => self.title_en.as_deref(),
            "ar" => self.title_ar.as_deref(),
            _ => None,
        };
        match variant {
            Some(v) if !v.trim().is_empty() => v,
            _ => &self.title_id,
        }
    }

    pub fn localized_description(&self, locale: &str) -> Option<&str> {
        let variant = match locale {
            "en" => self.description_en.as_deref(),
            "ar" => self.description_ar.as_deref(),
            _ => None,
        };
        match variant {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => self.description_id.as_deref().filter(|d| !d.trim().is_empty()),
        }
    }
}
