use std::env;
use std::sync::Arc;
use sea_orm::DatabaseConnection;
use tera::Tera;
use crate::services::storage_service::StorageService;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub storage_dir: String,
    pub storage_url: String,
    pub max_upload_bytes: usize,
}

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub templates: Arc<Tera>,
    pub storage: StorageService,
}

impl Config {
    pub fn init() -> Config {
        let server_host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .expect("PORT harus berupa angka");

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL wajib diisi di .env");

        let storage_dir = env::var("STORAGE_DIR").unwrap_or_else(|_| "storage".to_string());
        let storage_url = env::var("STORAGE_URL").unwrap_or_else(|_| "/storage".to_string());

        let max_upload_mb = env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<usize>()
            .expect("MAX_UPLOAD_MB harus angka");

        Config {
            server_host,
            server_port,
            database_url,
            storage_dir,
            storage_url: storage_url.trim_end_matches('/').to_string(),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        }
    }
}
