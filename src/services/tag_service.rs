use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;
use slug::slugify;
use std::collections::{HashMap, HashSet};
use crate::entities::{article_tag, tag};
use crate::models::tag_model::TagResponse;
use crate::utils::api_response::ServiceError;

pub const DEFAULT_POPULAR_LIMIT: u64 = 10;
pub const MAX_POPULAR_LIMIT: u64 = 50;

pub struct TagService;

impl TagService {
    pub async fn list_tags(db: &DatabaseConnection) -> Result<Vec<TagResponse>, ServiceError> {
        let tags = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Failed to fetch tags".to_string()))?;

        Ok(tags.into_iter().map(TagResponse::from).collect())
    }

    /// Tag terpopuler berdasarkan cache `use_count`.
    pub async fn popular_tags(db: &DatabaseConnection, limit: Option<u64>) -> Result<Vec<TagResponse>, ServiceError> {
        let limit = limit.unwrap_or(DEFAULT_POPULAR_LIMIT).clamp(1, MAX_POPULAR_LIMIT);

        let tags = tag::Entity::find()
            .order_by_desc(tag::Column::UseCount)
            .order_by_asc(tag::Column::Name)
            .limit(limit)
            .all(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Failed to fetch tags".to_string()))?;

        Ok(tags.into_iter().map(TagResponse::from).collect())
    }

    pub async fn create_tag(db: &DatabaseConnection, name: String) -> Result<TagResponse, ServiceError> {
        let name = name.trim().to_string();
        let base = slugify(&name);
        if base.is_empty() {
            return Err((StatusCode::UNPROCESSABLE_ENTITY, "TAG_INVALID_NAME", "Tag name has no usable characters".to_string()));
        }

        if let Some(existing) = Self::find_by_name(db, &name, None).await? {
            return Err((StatusCode::CONFLICT, "TAG_EXISTS", format!("Tag '{}' already exists", existing.name)));
        }

        let slug = Self::ensure_unique_slug(db, &base, None).await?;
        let now = Utc::now();

        let saved = tag::ActiveModel {
            id: NotSet,
            name: Set(name),
            slug: Set(slug),
            use_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", format!("Failed to create tag: {}", e)))?;

        tracing::info!("Tag created: {} ({})", saved.name, saved.slug);
        Ok(saved.into())
    }

    pub async fn rename_tag(db: &DatabaseConnection, id: i64, name: String) -> Result<TagResponse, ServiceError> {
        let existing = Self::find_tag(db, id).await?;
        let name = name.trim().to_string();
        let base = slugify(&name);
        if base.is_empty() {
            return Err((StatusCode::UNPROCESSABLE_ENTITY, "TAG_INVALID_NAME", "Tag name has no usable characters".to_string()));
        }
        if let Some(other) = Self::find_by_name(db, &name, Some(existing.id)).await? {
            return Err((StatusCode::CONFLICT, "TAG_EXISTS", format!("Tag '{}' already exists", other.name)));
        }

        let slug = if base == existing.slug {
            base
        } else {
            Self::ensure_unique_slug(db, &base, Some(existing.id)).await?
        };

        let mut active: tag::ActiveModel = existing.into();
        active.name = Set(name);
        active.slug = Set(slug);
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(db)
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", format!("Failed to update tag: {}", e)))?;

        Ok(updated.into())
    }

    /// Hapus tag; baris pivot ikut terhapus lewat ON DELETE CASCADE.
    pub async fn delete_tag(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
        let existing = Self::find_tag(db, id).await?;

        tag::Entity::delete_by_id(existing.id)
            .exec(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to delete tag".to_string()))?;

        tracing::info!("Tag deleted: {}", existing.slug);
        Ok(())
    }

    /// Ambil tag berdasarkan nama, buat yang belum ada.
    ///
    /// Urutan pencocokan sama dengan halaman admin: nama (tanpa beda huruf besar/kecil),
    /// lalu slug. Tag baru memakai slug unik dengan sufiks seperti `create_tag`.
    pub async fn find_or_create_by_names<C>(db: &C, names: &[String]) -> Result<Vec<tag::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut seen_names = HashSet::new();
        let mut seen_ids = HashSet::new();
        let mut tags = Vec::new();

        for raw in names {
            let name = raw.trim();
            let slug = slugify(name);
            if slug.is_empty() || !seen_names.insert(name.to_lowercase()) {
                continue;
            }

            let found = match Self::find_by_name(db, name, None).await? {
                Some(t) => t,
                None => match Self::find_by_slug(db, &slug).await? {
                    Some(t) => t,
                    None => {
                        let now = Utc::now();
                        tag::ActiveModel {
                            id: NotSet,
                            name: Set(name.to_string()),
                            slug: Set(Self::ensure_unique_slug(db, &slug, None).await?),
                            use_count: Set(0),
                            created_at: Set(now),
                            updated_at: Set(now),
                        }
                        .insert(db)
                        .await
                        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", format!("Failed to create tag: {}", e)))?
                    }
                },
            };

            if seen_ids.insert(found.id) {
                tags.push(found);
            }
        }

        Ok(tags)
    }

    /// Hitung ulang `use_count` untuk tag tertentu dari tabel pivot.
    pub async fn refresh_use_counts<C>(db: &C, tag_ids: &[i64]) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        for &tag_id in tag_ids {
            let count = article_tag::Entity::find()
                .filter(article_tag::Column::TagId.eq(tag_id))
                .count(db)
                .await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Count failed".to_string()))?;

            tag::Entity::update_many()
                .col_expr(tag::Column::UseCount, Expr::value(count as i32))
                .filter(tag::Column::Id.eq(tag_id))
                .exec(db)
                .await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to update tag usage".to_string()))?;
        }
        Ok(())
    }

    /// Rekonsiliasi seluruh cache `use_count`. Mengembalikan jumlah tag yang dikoreksi.
    pub async fn recount_all(db: &DatabaseConnection) -> Result<u64, ServiceError> {
        let counts: HashMap<i64, i64> = article_tag::Entity::find()
            .select_only()
            .column(article_tag::Column::TagId)
            .column_as(Expr::col(article_tag::Column::Id).count(), "usage")
            .group_by(article_tag::Column::TagId)
            .into_tuple::<(i64, i64)>()
            .all(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Count failed".to_string()))?
            .into_iter()
            .collect();

        let tags = tag::Entity::find()
            .all(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Failed to fetch tags".to_string()))?;

        let mut corrected = 0;
        for t in tags {
            let actual = counts.get(&t.id).copied().unwrap_or(0) as i32;
            if t.use_count == actual {
                continue;
            }
            let mut active: tag::ActiveModel = t.into();
            active.use_count = Set(actual);
            active
                .update(db)
                .await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to update tag usage".to_string()))?;
            corrected += 1;
        }

        if corrected > 0 {
            tracing::warn!("Corrected use_count drift on {} tag(s)", corrected);
        }
        Ok(corrected)
    }

    async fn find_tag(db: &DatabaseConnection, id: i64) -> Result<tag::Model, ServiceError> {
        tag::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?
            .ok_or((StatusCode::NOT_FOUND, "TAG_NOT_FOUND", "Tag not found".to_string()))
    }

    async fn find_by_name<C>(db: &C, name: &str, except_id: Option<i64>) -> Result<Option<tag::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut query = tag::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(tag::Column::Name))).eq(name.to_lowercase()));
        if let Some(id) = except_id {
            query = query.filter(tag::Column::Id.ne(id));
        }
        query
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Tag lookup failed".to_string()))
    }

    async fn find_by_slug<C>(db: &C, slug: &str) -> Result<Option<tag::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Tag lookup failed".to_string()))
    }

    async fn ensure_unique_slug<C>(db: &C, base_slug: &str, except_id: Option<i64>) -> Result<String, ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut new_slug = base_slug.to_string();
        let mut count = 1;

        loop {
            let mut query = tag::Entity::find().filter(tag::Column::Slug.eq(&new_slug));
            if let Some(id) = except_id {
                query = query.filter(tag::Column::Id.ne(id));
            }
            let taken = query
                .one(db)
                .await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Slug check failed".to_string()))?
                .is_some();
            if !taken {
                return Ok(new_slug);
            }
            new_slug = format!("{}-{}", base_slug, count);
            count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::article;
    use crate::test_utils::setup_db;

    async fn insert_tag(db: &DatabaseConnection, name: &str, slug: &str) -> Result<tag::Model, DbErr> {
        let now = Utc::now();
        tag::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            use_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    async fn insert_article(db: &DatabaseConnection, slug: &str) -> article::Model {
        let now = Utc::now();
        article::ActiveModel {
            id: NotSet,
            title: Set(slug.to_string()),
            slug: Set(slug.to_string()),
            content: Set("isi".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn link(db: &DatabaseConnection, article_id: i64, tag_id: i64) -> Result<article_tag::Model, DbErr> {
        article_tag::ActiveModel {
            id: NotSet,
            article_id: Set(article_id),
            tag_id: Set(tag_id),
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn database_rejects_duplicate_slug() {
        let db = setup_db().await;

        insert_tag(&db, "Berita", "berita").await.unwrap();
        assert!(insert_tag(&db, "Berita Lain", "berita").await.is_err());
    }

    #[tokio::test]
    async fn database_rejects_duplicate_pivot_pair() {
        let db = setup_db().await;
        let a = insert_article(&db, "a").await;
        let t = insert_tag(&db, "Berita", "berita").await.unwrap();

        link(&db, a.id, t.id).await.unwrap();
        assert!(link(&db, a.id, t.id).await.is_err());
    }

    #[tokio::test]
    async fn deleting_tag_or_article_cascades_into_pivot() {
        let db = setup_db().await;
        let a1 = insert_article(&db, "a1").await;
        let a2 = insert_article(&db, "a2").await;
        let t1 = insert_tag(&db, "Satu", "satu").await.unwrap();
        let t2 = insert_tag(&db, "Dua", "dua").await.unwrap();
        for (a, t) in [(a1.id, t1.id), (a1.id, t2.id), (a2.id, t1.id)] {
            link(&db, a, t).await.unwrap();
        }

        TagService::delete_tag(&db, t1.id).await.unwrap();
        let remaining = article_tag::Entity::find().all(&db).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].tag_id, t2.id);

        article::Entity::delete_by_id(a1.id).exec(&db).await.unwrap();
        assert_eq!(article_tag::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_derives_slug_and_suffixes_collisions() {
        let db = setup_db().await;

        let first = TagService::create_tag(&db, "C++".to_string()).await.unwrap();
        let second = TagService::create_tag(&db, "C#".to_string()).await.unwrap();

        assert_eq!(first.slug, "c");
        assert_eq!(second.slug, "c-1");
        assert_eq!(first.use_count, 0);
    }

    #[tokio::test]
    async fn create_same_name_conflicts() {
        let db = setup_db().await;

        TagService::create_tag(&db, "Prestasi".to_string()).await.unwrap();
        let err = TagService::create_tag(&db, "prestasi".to_string()).await.unwrap_err();
        assert_eq!(err.0, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn rename_updates_slug_but_not_onto_another_tag() {
        let db = setup_db().await;
        TagService::create_tag(&db, "Olahraga".to_string()).await.unwrap();
        let t = TagService::create_tag(&db, "Seni".to_string()).await.unwrap();

        let err = TagService::rename_tag(&db, t.id, "olahraga".to_string()).await.unwrap_err();
        assert_eq!(err.1, "TAG_EXISTS");

        let renamed = TagService::rename_tag(&db, t.id, "Olahraga!".to_string()).await.unwrap();
        assert_eq!(renamed.slug, "olahraga-1");

        // nama sendiri boleh dipakai lagi
        let same = TagService::rename_tag(&db, t.id, "Olahraga!".to_string()).await.unwrap();
        assert_eq!(same.slug, "olahraga-1");

        let err = TagService::rename_tag(&db, 404, "x".to_string()).await.unwrap_err();
        assert_eq!(err.1, "TAG_NOT_FOUND");
    }

    #[tokio::test]
    async fn article_tagging_resolves_admin_tags_by_name_before_slug() {
        let db = setup_db().await;
        let cpp = TagService::create_tag(&db, "C++".to_string()).await.unwrap();
        let csharp = TagService::create_tag(&db, "C#".to_string()).await.unwrap();

        let names = vec!["c#".to_string(), "C++".to_string(), "C#".to_string()];
        let found = TagService::find_or_create_by_names(&db, &names).await.unwrap();
        let ids: Vec<i64> = found.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![csharp.id, cpp.id]);

        // Nama baru dengan slug yang sudah ada tetap jatuh ke tag slug tersebut
        let found = TagService::find_or_create_by_names(&db, &["c".to_string()]).await.unwrap();
        assert_eq!(found[0].id, cpp.id);

        // Tidak ada tag baru yang terbuat
        assert_eq!(tag::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn create_conflicts_with_suffixed_tag_name() {
        let db = setup_db().await;
        TagService::create_tag(&db, "C++".to_string()).await.unwrap();
        TagService::create_tag(&db, "C#".to_string()).await.unwrap();

        let err = TagService::create_tag(&db, "c#".to_string()).await.unwrap_err();
        assert_eq!(err.0, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn recount_repairs_drifted_cache() {
        let db = setup_db().await;
        let a = insert_article(&db, "a").await;
        let used = insert_tag(&db, "Dipakai", "dipakai").await.unwrap();
        let stale = insert_tag(&db, "Basi", "basi").await.unwrap();
        link(&db, a.id, used.id).await.unwrap();

        let mut drift: tag::ActiveModel = stale.clone().into();
        drift.use_count = Set(7);
        drift.update(&db).await.unwrap();

        let corrected = TagService::recount_all(&db).await.unwrap();
        assert_eq!(corrected, 2);

        let tags = TagService::list_tags(&db).await.unwrap();
        let count_of = |slug: &str| tags.iter().find(|t| t.slug == slug).map(|t| t.use_count);
        assert_eq!(count_of("dipakai"), Some(1));
        assert_eq!(count_of("basi"), Some(0));

        assert_eq!(TagService::recount_all(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn popular_orders_by_use_count_then_name() {
        let db = setup_db().await;
        for (name, count) in [("Beta", 3), ("Alfa", 3), ("Gama", 9), ("Delta", 0)] {
            let t = insert_tag(&db, name, &slugify(name)).await.unwrap();
            let mut active: tag::ActiveModel = t.into();
            active.use_count = Set(count);
            active.update(&db).await.unwrap();
        }

        let top = TagService::popular_tags(&db, Some(3)).await.unwrap();
        let names: Vec<&str> = top.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Gama", "Alfa", "Beta"]);

        // limit 0 dinaikkan ke 1
        assert_eq!(TagService::popular_tags(&db, Some(0)).await.unwrap().len(), 1);
    }
}
