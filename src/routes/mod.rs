use crate::config::AppState;
use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod article_route;
pub mod gallery_route;
pub mod tag_route;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_origin(Any)
        .allow_headers(Any);

    // API JSON boleh diakses lintas origin; halaman admin tidak
    let api = Router::new()
        .nest("/articles", article_route::article_routes())
        .nest("/tags", tag_route::tag_api_routes())
        .nest("/gallery", gallery_route::gallery_api_routes())
        .route("/health", axum::routing::get(crate::handlers::health_check_handler))
        .layer(cors);

    Router::new()
        .nest("/admin/gallery", gallery_route::gallery_admin_routes(&state))
        .nest("/admin/tags", tag_route::tag_admin_routes())
        .nest("/api", api)
        .nest_service("/storage", ServeDir::new(state.storage.root()))
        .layer(TraceLayer::new_for_http())
}
