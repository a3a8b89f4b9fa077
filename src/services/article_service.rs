use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::*;
use slug::slugify;
use std::collections::HashSet;
use crate::entities::{article, article::Entity as Article, article_tag, tag};
use crate::models::article_model::*;
use crate::models::tag_model::TagResponse;
use crate::services::tag_service::TagService;
use crate::utils::api_response::ServiceError;

pub struct ArticleService;

impl ArticleService {
    pub async fn create_article(
        db: &DatabaseConnection,
        payload: CreateArticleRequest,
    ) -> Result<ArticleResponse, ServiceError> {
        let txn = db.begin().await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "TXN_ERR", "Transaction start failed".to_string()))?;

        let base_slug = match slugify(&payload.title) {
            s if s.is_empty() => "artikel".to_string(),
            s => s,
        };
        let slug = Self::ensure_unique_slug(&txn, &base_slug).await?;
        let now = Utc::now();

        let saved = article::ActiveModel {
            id: NotSet,
            title: Set(payload.title.trim().to_string()),
            slug: Set(slug),
            content: Set(payload.content),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", format!("Failed to create article: {}", e)))?;

        let names = payload.tags.unwrap_or_default();
        let tags = TagService::find_or_create_by_names(&txn, &names).await?;
        let tag_ids: Vec<i64> = tags.iter().map(|t| t.id).collect();
        Self::attach(&txn, saved.id, &tag_ids).await?;
        TagService::refresh_use_counts(&txn, &tag_ids).await?;

        txn.commit().await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "TXN_COMMIT_ERR", "Transaction commit failed".to_string()))?;

        tracing::info!("Article created: {} with {} tag(s)", saved.slug, tag_ids.len());
        Self::get_article(db, saved.id).await
    }

    pub async fn get_article(
        db: &DatabaseConnection,
        id: i64,
    ) -> Result<ArticleResponse, ServiceError> {
        let article = Self::find_article(db, id).await?;

        let tags = article.find_related(tag::Entity)
            .order_by_asc(tag::Column::Name)
            .all(db).await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Failed to fetch tags".to_string()))?;

        Ok(Self::map_to_response(article, tags))
    }

    /// Ganti seluruh tag artikel dengan daftar nama yang diberikan.
    pub async fn sync_tags(
        db: &DatabaseConnection,
        id: i64,
        names: Vec<String>,
    ) -> Result<ArticleResponse, ServiceError> {
        let txn = db.begin().await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "TXN_ERR", "Transaction start failed".to_string()))?;

        let article = Self::find_article(&txn, id).await?;

        let current: HashSet<i64> = Self::tag_ids_of(&txn, article.id).await?.into_iter().collect();
        let desired: HashSet<i64> = TagService::find_or_create_by_names(&txn, &names).await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        let detached: Vec<i64> = current.difference(&desired).copied().collect();
        let attached: Vec<i64> = desired.difference(&current).copied().collect();

        if !detached.is_empty() {
            article_tag::Entity::delete_many()
                .filter(article_tag::Column::ArticleId.eq(article.id))
                .filter(article_tag::Column::TagId.is_in(detached.clone()))
                .exec(&txn).await
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to detach tags".to_string()))?;
        }
        Self::attach(&txn, article.id, &attached).await?;

        let touched: Vec<i64> = detached.iter().chain(attached.iter()).copied().collect();
        TagService::refresh_use_counts(&txn, &touched).await?;

        let mut active: article::ActiveModel = article.into();
        active.updated_at = Set(Utc::now());
        active.update(&txn).await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", format!("Failed to update article: {}", e)))?;

        txn.commit().await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "TXN_COMMIT_ERR", "Transaction commit failed".to_string()))?;

        Self::get_article(db, id).await
    }

    /// Hapus artikel; pivot ikut terhapus (cascade), lalu cache tag disegarkan.
    pub async fn delete_article(
        db: &DatabaseConnection,
        id: i64,
    ) -> Result<(), ServiceError> {
        let txn = db.begin().await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "TXN_ERR", "Transaction start failed".to_string()))?;

        let article = Self::find_article(&txn, id).await?;
        let former_tags = Self::tag_ids_of(&txn, article.id).await?;

        Article::delete_by_id(article.id).exec(&txn).await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to delete article".to_string()))?;

        TagService::refresh_use_counts(&txn, &former_tags).await?;

        txn.commit().await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "TXN_COMMIT_ERR", "Transaction commit failed".to_string()))?;

        Ok(())
    }

    async fn find_article<C>(db: &C, id: i64) -> Result<article::Model, ServiceError>
    where C: ConnectionTrait {
        Article::find_by_id(id).one(db).await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?
            .ok_or((StatusCode::NOT_FOUND, "ARTICLE_NOT_FOUND", "Article not found".to_string()))
    }

    async fn tag_ids_of<C>(db: &C, article_id: i64) -> Result<Vec<i64>, ServiceError>
    where C: ConnectionTrait {
        Ok(article_tag::Entity::find()
            .filter(article_tag::Column::ArticleId.eq(article_id))
            .all(db).await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Failed to fetch article tags".to_string()))?
            .into_iter()
            .map(|link| link.tag_id)
            .collect())
    }

    async fn attach<C>(db: &C, article_id: i64, tag_ids: &[i64]) -> Result<(), ServiceError>
    where C: ConnectionTrait {
        for &tag_id in tag_ids {
            article_tag::ActiveModel {
                id: NotSet,
                article_id: Set(article_id),
                tag_id: Set(tag_id),
            }
            .insert(db).await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", format!("Failed to attach tag: {}", e)))?;
        }
        Ok(())
    }

    async fn ensure_unique_slug<C>(db: &C, base_slug: &str) -> Result<String, ServiceError>
    where C: ConnectionTrait {
        let mut new_slug = base_slug.to_string();
        let mut count = 1;

        while Article::find().filter(article::Column::Slug.eq(&new_slug)).one(db).await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Slug check failed".to_string()))?
            .is_some()
        {
            new_slug = format!("{}-{}", base_slug, count);
            count += 1;
        }

        Ok(new_slug)
    }

    fn map_to_response(model: article::Model, tags: Vec<tag::Model>) -> ArticleResponse {
        ArticleResponse {
            id: model.id,
            title: model.title,
            slug: model.slug,
            content: model.content,
            tags: tags.into_iter().map(TagResponse::from).collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;

    fn request(title: &str, tags: &[&str]) -> CreateArticleRequest {
        CreateArticleRequest {
            title: title.to_string(),
            content: "Isi artikel untuk pengujian.".to_string(),
            tags: Some(tags.iter().map(|t| String::from(*t)).collect()),
        }
    }

    async fn use_count(db: &DatabaseConnection, slug: &str) -> i32 {
        tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(db).await.unwrap()
            .map(|t| t.use_count)
            .unwrap()
    }

    #[tokio::test]
    async fn create_attaches_tags_and_counts_usage() {
        let db = setup_db().await;

        let a = ArticleService::create_article(&db, request("Juara Olimpiade", &["Prestasi", "Sains"])).await.unwrap();
        ArticleService::create_article(&db, request("Lomba Cerdas Cermat", &["prestasi"])).await.unwrap();

        assert_eq!(a.slug, "juara-olimpiade");
        assert_eq!(a.tags.len(), 2);
        assert_eq!(use_count(&db, "prestasi").await, 2);
        assert_eq!(use_count(&db, "sains").await, 1);
    }

    #[tokio::test]
    async fn duplicate_tag_names_collapse_to_one_link() {
        let db = setup_db().await;

        let a = ArticleService::create_article(&db, request("Pentas Seni", &["Seni", " seni ", "SENI"])).await.unwrap();

        assert_eq!(a.tags.len(), 1);
        assert_eq!(use_count(&db, "seni").await, 1);
    }

    #[tokio::test]
    async fn tagging_with_admin_tag_name_attaches_that_tag() {
        let db = setup_db().await;
        TagService::create_tag(&db, "C++".to_string()).await.unwrap();
        let csharp = TagService::create_tag(&db, "C#".to_string()).await.unwrap();
        assert_eq!(csharp.slug, "c-1");

        let a = ArticleService::create_article(&db, request("Belajar Pemrograman", &["C#"])).await.unwrap();

        assert_eq!(a.tags.len(), 1);
        assert_eq!(a.tags[0].name, "C#");
        assert_eq!(use_count(&db, "c-1").await, 1);
        assert_eq!(use_count(&db, "c").await, 0);
    }

    #[tokio::test]
    async fn same_title_gets_suffixed_slug() {
        let db = setup_db().await;

        ArticleService::create_article(&db, request("Pengumuman", &[])).await.unwrap();
        let second = ArticleService::create_article(&db, request("Pengumuman", &[])).await.unwrap();

        assert_eq!(second.slug, "pengumuman-1");
    }

    #[tokio::test]
    async fn sync_replaces_tags_and_keeps_counts_in_step() {
        let db = setup_db().await;
        let a = ArticleService::create_article(&db, request("Kemah Pramuka", &["Pramuka", "Kegiatan"])).await.unwrap();

        let synced = ArticleService::sync_tags(&db, a.id, vec!["Kegiatan".into(), "Alam".into()]).await.unwrap();

        let slugs: Vec<&str> = synced.tags.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(slugs, vec!["alam", "kegiatan"]);
        assert_eq!(use_count(&db, "pramuka").await, 0);
        assert_eq!(use_count(&db, "kegiatan").await, 1);
        assert_eq!(use_count(&db, "alam").await, 1);

        let cleared = ArticleService::sync_tags(&db, a.id, vec![]).await.unwrap();
        assert!(cleared.tags.is_empty());
        assert_eq!(use_count(&db, "kegiatan").await, 0);
    }

    #[tokio::test]
    async fn deleting_article_cascades_pivot_and_refreshes_counts() {
        let db = setup_db().await;
        let a = ArticleService::create_article(&db, request("Wisuda", &["Wisuda", "Alumni"])).await.unwrap();

        ArticleService::delete_article(&db, a.id).await.unwrap();

        let links = article_tag::Entity::find()
            .filter(article_tag::Column::ArticleId.eq(a.id))
            .count(&db).await.unwrap();
        assert_eq!(links, 0);
        assert_eq!(use_count(&db, "wisuda").await, 0);
        assert_eq!(use_count(&db, "alumni").await, 0);
    }

    #[tokio::test]
    async fn missing_article_is_not_found() {
        let db = setup_db().await;

        let err = ArticleService::sync_tags(&db, 999, vec!["x".into()]).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
        assert_eq!(err.1, "ARTICLE_NOT_FOUND");
    }
}
