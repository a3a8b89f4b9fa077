use axum::{
    extract::{State, Path},
    response::IntoResponse,
};
use crate::config::AppState;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::validated_wrapper::ValidatedJson;
use crate::services::article_service::ArticleService;
use crate::models::article_model::*;

pub async fn create_article_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateArticleRequest>,
) -> impl IntoResponse {
    match ArticleService::create_article(&state.db, payload).await {
        Ok(res) => ResponseBuilder::created("ARTICLE_CREATED", "Article created", res).into_response(),
        Err(e) => ResponseBuilder::from_service_error(e),
    }
}

pub async fn get_article_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match ArticleService::get_article(&state.db, id).await {
        Ok(res) => ResponseBuilder::success("ARTICLE_FETCHED", "Success", res).into_response(),
        Err(e) => ResponseBuilder::from_service_error(e),
    }
}

pub async fn sync_article_tags_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<SyncTagsRequest>,
) -> impl IntoResponse {
    match ArticleService::sync_tags(&state.db, id, payload.tags).await {
        Ok(res) => ResponseBuilder::success("ARTICLE_TAGS_SYNCED", "Article tags updated", res).into_response(),
        Err(e) => ResponseBuilder::from_service_error(e),
    }
}

pub async fn delete_article_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match ArticleService::delete_article(&state.db, id).await {
        Ok(_) => ResponseBuilder::success::<()>("ARTICLE_DELETED", "Article deleted", ()).into_response(),
        Err(e) => ResponseBuilder::from_service_error(e),
    }
}
