use sea_orm::{DatabaseConnection, EntityTrait, ActiveValue::Set, ActiveModelTrait, QueryFilter, ColumnTrait};
use chrono::Utc;
use slug::slugify;
use crate::entities::tag;

pub const DEFAULT_TAGS: [&str; 6] = ["Berita Sekolah", "Pengumuman", "Prestasi", "Kegiatan", "Ekstrakurikuler", "Akademik"];

/// Idempoten: tag yang slug-nya sudah ada dilewati.
pub async fn seed_tags(db: &DatabaseConnection) -> Result<(), String> {
    for name in DEFAULT_TAGS {
        let slug = slugify(name);
        let exists = tag::Entity::find()
            .filter(tag::Column::Slug.eq(&slug))
            .one(db)
            .await
            .map_err(|e| e.to_string())?;

        if exists.is_none() {
            let now = Utc::now();
            let new_tag = tag::ActiveModel {
                name: Set(name.to_string()),
                slug: Set(slug),
                use_count: Set(0),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            new_tag.insert(db).await.map_err(|e| e.to_string())?;
            tracing::info!("Seeded tag: {}", name);
        }
    }

    Ok(())
}
