use axum::{routing::{get, post}, Router};
use crate::config::AppState;
use crate::handlers::tag_handler::*;

pub fn tag_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tag_index_handler).post(tag_store_handler))
        .route("/recount", post(tag_recount_handler))
        .route("/{id}", post(tag_update_handler))
        .route("/{id}/delete", post(tag_delete_handler))
}

pub fn tag_api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags_handler))
        .route("/popular", get(popular_tags_handler))
}
