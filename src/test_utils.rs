use axum::body::Bytes;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::sync::Arc;
use crate::config::AppState;
use crate::models::gallery_model::UploadedImage;
use crate::services::storage_service::StorageService;
use crate::utils::view::build_templates;

// Header PNG minimal; cukup untuk image::guess_format
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

/// SQLite in-memory dengan migrasi asli. Satu koneksi agar semua query melihat database yang sama.
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn png_upload() -> UploadedImage {
    UploadedImage {
        file_name: "foto.png".to_string(),
        content_type: "image/png".to_string(),
        data: Bytes::from_static(PNG_BYTES),
    }
}

pub async fn test_state(storage_root: &Path) -> AppState {
    AppState {
        db: setup_db().await,
        templates: Arc::new(build_templates().unwrap()),
        storage: StorageService::new(storage_root, "/storage", 1024 * 1024),
    }
}
