use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::*;
use crate::entities::{gallery, gallery::Entity as Gallery};
use crate::models::gallery_model::{GalleryFeedItem, GalleryForm, GalleryRow, UploadedImage};
use crate::services::storage_service::StorageService;
use crate::utils::api_response::ServiceError;

pub const SUPPORTED_LOCALES: [&str; 3] = ["id", "en", "ar"];

pub struct GalleryService;

impl GalleryService {
    /// Semua item dalam urutan tampil: sort_order naik, lalu id.
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<gallery::Model>, ServiceError> {
        Gallery::find()
            .order_by_asc(gallery::Column::SortOrder)
            .order_by_asc(gallery::Column::Id)
            .all(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Failed to fetch gallery".to_string()))
    }

    pub async fn find(db: &DatabaseConnection, id: i64) -> Result<gallery::Model, ServiceError> {
        Gallery::find_by_id(id)
            .one(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error".to_string()))?
            .ok_or((StatusCode::NOT_FOUND, "GALLERY_NOT_FOUND", "Gallery item not found".to_string()))
    }

    /// Simpan item baru. Form harus sudah lolos `validate_submission`.
    /// File unggahan lebih diutamakan daripada path manual.
    pub async fn create(
        db: &DatabaseConnection,
        storage: &StorageService,
        form: &GalleryForm,
        image: Option<&UploadedImage>,
    ) -> Result<gallery::Model, ServiceError> {
        let (image_path, stored) = match (image, form.image_path.as_deref()) {
            (Some(file), _) => {
                let path = Self::store(storage, file).await?;
                (path, true)
            }
            (None, Some(manual)) => (manual.to_string(), false),
            (None, None) => {
                return Err((StatusCode::UNPROCESSABLE_ENTITY, "GALLERY_IMAGE_REQUIRED", "Image is required".to_string()));
            }
        };

        let now = Utc::now();
        let item = gallery::ActiveModel {
            id: NotSet,
            title_id: Set(form.title_id.clone()),
            title_en: Set(form.title_en.clone()),
            title_ar: Set(form.title_ar.clone()),
            description_id: Set(form.description_id.clone()),
            description_en: Set(form.description_en.clone()),
            description_ar: Set(form.description_ar.clone()),
            image_path: Set(image_path.clone()),
            link_url: Set(form.link_url.clone()),
            sort_order: Set(form.sort_order_value()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match item.insert(db).await {
            Ok(saved) => {
                tracing::info!("Gallery item {} created ({})", saved.id, saved.image_path);
                Ok(saved)
            }
            Err(e) => {
                // Jangan tinggalkan file yatim bila insert gagal
                if stored {
                    let _ = storage.delete(&image_path).await;
                }
                Err((StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", format!("Failed to save gallery item: {}", e)))
            }
        }
    }

    pub async fn update(
        db: &DatabaseConnection,
        storage: &StorageService,
        id: i64,
        form: &GalleryForm,
        image: Option<&UploadedImage>,
    ) -> Result<gallery::Model, ServiceError> {
        let existing = Self::find(db, id).await?;
        let old_path = existing.image_path.clone();

        let new_path = match (image, form.image_path.as_deref()) {
            (Some(file), _) => Some(Self::store(storage, file).await?),
            (None, Some(manual)) if manual != old_path => Some(manual.to_string()),
            _ => None,
        };

        let mut active: gallery::ActiveModel = existing.into();
        active.title_id = Set(form.title_id.clone());
        active.title_en = Set(form.title_en.clone());
        active.title_ar = Set(form.title_ar.clone());
        active.description_id = Set(form.description_id.clone());
        active.description_en = Set(form.description_en.clone());
        active.description_ar = Set(form.description_ar.clone());
        active.link_url = Set(form.link_url.clone());
        active.sort_order = Set(form.sort_order_value());
        if let Some(path) = &new_path {
            active.image_path = Set(path.clone());
        }
        active.updated_at = Set(Utc::now());

        let updated = match active.update(db).await {
            Ok(m) => m,
            Err(e) => {
                if let (Some(path), Some(_)) = (&new_path, image) {
                    let _ = storage.delete(path).await;
                }
                return Err((StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", format!("Failed to update gallery item: {}", e)));
            }
        };

        if new_path.is_some() {
            if let Err(e) = storage.delete(&old_path).await {
                tracing::warn!("Failed to remove replaced image {}: {}", old_path, e);
            }
        }

        Ok(updated)
    }

    pub async fn delete(
        db: &DatabaseConnection,
        storage: &StorageService,
        id: i64,
    ) -> Result<(), ServiceError> {
        let existing = Self::find(db, id).await?;

        Gallery::delete_by_id(existing.id)
            .exec(db)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB_WRITE_ERR", "Failed to delete gallery item".to_string()))?;

        if let Err(e) = storage.delete(&existing.image_path).await {
            tracing::warn!("Gallery item {} deleted but file {} remains: {}", existing.id, existing.image_path, e);
        }

        Ok(())
    }

    /// Feed publik yang sudah dilokalkan.
    pub async fn feed(
        db: &DatabaseConnection,
        storage: &StorageService,
        locale: &str,
    ) -> Result<Vec<GalleryFeedItem>, ServiceError> {
        let locale = if SUPPORTED_LOCALES.contains(&locale) { locale } else { "id" };

        Ok(Self::list(db)
            .await?
            .into_iter()
            .map(|item| GalleryFeedItem {
                id: item.id,
                title: item.localized_title(locale).to_string(),
                description: item.localized_description(locale).map(str::to_string),
                image_url: storage.url_for(&item.image_path),
                link_url: item.link_url.clone(),
                sort_order: item.sort_order,
            })
            .collect())
    }

    pub fn to_row(storage: &StorageService, item: gallery::Model) -> GalleryRow {
        GalleryRow {
            id: item.id,
            image_url: storage.url_for(&item.image_path),
            title_id: item.title_id,
            title_en: item.title_en,
            title_ar: item.title_ar,
            link_url: item.link_url,
            sort_order: item.sort_order,
        }
    }

    async fn store(storage: &StorageService, file: &UploadedImage) -> Result<String, ServiceError> {
        storage
            .store_image(&file.data, &file.file_name)
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_WRITE_ERR", format!("Failed to store image: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{png_upload, setup_db};

    fn form(title: &str, sort_order: &str) -> GalleryForm {
        let mut form = GalleryForm::blank();
        form.set_field("title_id", title.to_string());
        form.set_field("sort_order", sort_order.to_string());
        form
    }

    #[tokio::test]
    async fn create_stores_upload_and_row() {
        let db = setup_db().await;
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageService::new(dir.path(), "/storage", 1024 * 1024);

        let saved = GalleryService::create(&db, &storage, &form("Upacara", "2"), Some(&png_upload())).await.unwrap();

        assert!(saved.image_path.starts_with("gallery/"));
        assert!(dir.path().join(&saved.image_path).exists());
        assert_eq!(saved.sort_order, 2);
    }

    #[tokio::test]
    async fn upload_wins_over_manual_path() {
        let db = setup_db().await;
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageService::new(dir.path(), "/storage", 1024 * 1024);
        let mut f = form("Upacara", "0");
        f.set_field("image_path", "img/gambar1.jpg".to_string());

        let saved = GalleryService::create(&db, &storage, &f, Some(&png_upload())).await.unwrap();
        assert!(saved.image_path.starts_with("gallery/"));

        let manual = GalleryService::create(&db, &storage, &f, None).await.unwrap();
        assert_eq!(manual.image_path, "img/gambar1.jpg");
    }

    #[tokio::test]
    async fn list_orders_by_sort_order_then_id() {
        let db = setup_db().await;
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageService::new(dir.path(), "/storage", 1024 * 1024);

        for (title, order) in [("C", "5"), ("A", "0"), ("B", "5"), ("D", "1")] {
            let mut f = form(title, order);
            f.set_field("image_path", "img/x.jpg".to_string());
            GalleryService::create(&db, &storage, &f, None).await.unwrap();
        }

        let titles: Vec<String> = GalleryService::list(&db).await.unwrap().into_iter().map(|g| g.title_id).collect();
        assert_eq!(titles, vec!["A", "D", "C", "B"]);
    }

    #[tokio::test]
    async fn update_with_new_upload_replaces_old_file() {
        let db = setup_db().await;
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageService::new(dir.path(), "/storage", 1024 * 1024);
        let saved = GalleryService::create(&db, &storage, &form("Lama", "0"), Some(&png_upload())).await.unwrap();

        let mut edit = GalleryForm::from_model(&saved);
        edit.set_field("title_id", "Baru".to_string());
        let updated = GalleryService::update(&db, &storage, saved.id, &edit, Some(&png_upload())).await.unwrap();

        assert_eq!(updated.title_id, "Baru");
        assert_ne!(updated.image_path, saved.image_path);
        assert!(!dir.path().join(&saved.image_path).exists());
        assert!(dir.path().join(&updated.image_path).exists());
    }

    #[tokio::test]
    async fn update_without_upload_keeps_image() {
        let db = setup_db().await;
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageService::new(dir.path(), "/storage", 1024 * 1024);
        let saved = GalleryService::create(&db, &storage, &form("Lama", "0"), Some(&png_upload())).await.unwrap();

        let mut edit = GalleryForm::from_model(&saved);
        edit.set_field("sort_order", "9".to_string());
        let updated = GalleryService::update(&db, &storage, saved.id, &edit, None).await.unwrap();

        assert_eq!(updated.image_path, saved.image_path);
        assert_eq!(updated.sort_order, 9);
        assert!(dir.path().join(&saved.image_path).exists());
    }

    #[tokio::test]
    async fn edit_form_hides_upload_path_and_keeps_manual_one() {
        let db = setup_db().await;
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageService::new(dir.path(), "/storage", 1024 * 1024);
        let uploaded = GalleryService::create(&db, &storage, &form("Unggah", "0"), Some(&png_upload())).await.unwrap();
        let mut f = form("Manual", "0");
        f.set_field("image_path", "img/x.jpg".to_string());
        let manual = GalleryService::create(&db, &storage, &f, None).await.unwrap();

        assert_eq!(GalleryForm::from_model(&uploaded).image_path, None);
        assert_eq!(GalleryForm::from_model(&manual).image_path.as_deref(), Some("img/x.jpg"));

        // Form edit yang dikirim apa adanya tidak menyentuh file unggahan
        let edit = GalleryForm::from_model(&uploaded);
        assert!(edit.validate_submission(None, 1024 * 1024, false).is_empty());
        let updated = GalleryService::update(&db, &storage, uploaded.id, &edit, None).await.unwrap();
        assert_eq!(updated.image_path, uploaded.image_path);
        assert!(dir.path().join(&uploaded.image_path).exists());
    }

    #[tokio::test]
    async fn delete_removes_row_and_file() {
        let db = setup_db().await;
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageService::new(dir.path(), "/storage", 1024 * 1024);
        let saved = GalleryService::create(&db, &storage, &form("Hapus", "0"), Some(&png_upload())).await.unwrap();

        GalleryService::delete(&db, &storage, saved.id).await.unwrap();

        assert!(!dir.path().join(&saved.image_path).exists());
        let err = GalleryService::find(&db, saved.id).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn feed_localizes_with_indonesian_fallback() {
        let db = setup_db().await;
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageService::new(dir.path(), "/storage", 1024 * 1024);
        let mut f = form("Perpustakaan", "0");
        f.set_field("title_en", "Library".to_string());
        f.set_field("description_id", "Ruang baca".to_string());
        f.set_field("image_path", "img/perpus.jpg".to_string());
        GalleryService::create(&db, &storage, &f, None).await.unwrap();

        let en = GalleryService::feed(&db, &storage, "en").await.unwrap();
        assert_eq!(en[0].title, "Library");
        assert_eq!(en[0].description.as_deref(), Some("Ruang baca"));
        assert_eq!(en[0].image_url, "/img/perpus.jpg");

        let ar = GalleryService::feed(&db, &storage, "ar").await.unwrap();
        assert_eq!(ar[0].title, "Perpustakaan");

        let unknown = GalleryService::feed(&db, &storage, "fr").await.unwrap();
        assert_eq!(unknown[0].title, "Perpustakaan");
    }
}
