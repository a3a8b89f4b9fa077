use axum::{routing::{get, post, put}, Router};
use crate::config::AppState;
use crate::handlers::article_handler::*;

pub fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_article_handler))
        .route("/{id}", get(get_article_handler).delete(delete_article_handler))
        .route("/{id}/tags", put(sync_article_tags_handler))
}
