use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use crate::config::AppState;
use crate::handlers::gallery_handler::*;

// Sisa ruang untuk field teks di luar file gambar
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

// File sedikit di atas batas tetap dibaca sampai habis supaya field lain ikut tampil lagi
const OVERSIZE_FACTOR: usize = 2;

pub fn gallery_admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(gallery_index_handler).post(gallery_store_handler))
        .route("/create", get(gallery_create_handler))
        .route("/{id}", post(gallery_update_handler))
        .route("/{id}/edit", get(gallery_edit_handler))
        .route("/{id}/delete", post(gallery_delete_handler))
        .layer(DefaultBodyLimit::max(state.storage.max_upload_bytes() * OVERSIZE_FACTOR + FORM_OVERHEAD_BYTES))
}

pub fn gallery_api_routes() -> Router<AppState> {
    Router::new().route("/", get(gallery_feed_handler))
}
