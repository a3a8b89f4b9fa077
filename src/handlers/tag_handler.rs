use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use validator::Validate;
use crate::config::AppState;
use crate::handlers::flash_message;
use crate::models::tag_model::*;
use crate::services::tag_service::TagService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::form_errors::FormErrors;
use crate::utils::view::{error_page, render};

const INDEX_PATH: &str = "/admin/tags";

// --- Halaman admin ---

pub async fn tag_index_handler(
    State(state): State<AppState>,
    Query(params): Query<TagIndexParams>,
) -> Response {
    render_index(&state, StatusCode::OK, flash_message(params.status.as_deref()), String::new(), None).await
}

pub async fn tag_store_handler(
    State(state): State<AppState>,
    Form(payload): Form<TagForm>,
) -> Response {
    if let Err(e) = payload.validate() {
        let errors = FormErrors::from(e);
        let message = errors.first("name").map(str::to_string);
        return render_index(&state, StatusCode::UNPROCESSABLE_ENTITY, None, payload.name, message).await;
    }

    match TagService::create_tag(&state.db, payload.name.clone()).await {
        Ok(_) => Redirect::to(&format!("{}?status=created", INDEX_PATH)).into_response(),
        Err((status, _, message)) if status.is_client_error() => {
            render_index(&state, StatusCode::UNPROCESSABLE_ENTITY, None, payload.name, Some(message)).await
        }
        Err(e) => error_page(&state.templates, e),
    }
}

pub async fn tag_update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(payload): Form<TagForm>,
) -> Response {
    if let Err(e) = payload.validate() {
        let errors = FormErrors::from(e);
        let message = errors.first("name").map(str::to_string);
        return render_index(&state, StatusCode::UNPROCESSABLE_ENTITY, None, String::new(), message).await;
    }

    match TagService::rename_tag(&state.db, id, payload.name).await {
        Ok(_) => Redirect::to(&format!("{}?status=updated", INDEX_PATH)).into_response(),
        Err((status, _, message)) if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY => {
            render_index(&state, StatusCode::UNPROCESSABLE_ENTITY, None, String::new(), Some(message)).await
        }
        Err(e) => error_page(&state.templates, e),
    }
}

pub async fn tag_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    match TagService::delete_tag(&state.db, id).await {
        Ok(()) => Redirect::to(&format!("{}?status=deleted", INDEX_PATH)).into_response(),
        Err(e) => error_page(&state.templates, e),
    }
}

pub async fn tag_recount_handler(State(state): State<AppState>) -> Response {
    match TagService::recount_all(&state.db).await {
        Ok(_) => Redirect::to(&format!("{}?status=recounted", INDEX_PATH)).into_response(),
        Err(e) => error_page(&state.templates, e),
    }
}

async fn render_index(
    state: &AppState,
    status: StatusCode,
    flash: Option<String>,
    old_name: String,
    name_error: Option<String>,
) -> Response {
    match TagService::list_tags(&state.db).await {
        Ok(tags) => {
            let view = TagIndexView {
                page_title: "Tag Artikel".to_string(),
                tags,
                flash,
                old_name,
                name_error,
            };
            render(&state.templates, "tags/index.html", status, &view)
        }
        Err(e) => error_page(&state.templates, e),
    }
}

// --- JSON API ---

pub async fn list_tags_handler(
    State(state): State<AppState>,
) -> impl IntoResponse {
    match TagService::list_tags(&state.db).await {
        Ok(res) => ResponseBuilder::success("TAGS_FETCHED", "Success", res).into_response(),
        Err(e) => ResponseBuilder::from_service_error(e),
    }
}

pub async fn popular_tags_handler(
    State(state): State<AppState>,
    Query(params): Query<PopularTagParams>,
) -> impl IntoResponse {
    match TagService::popular_tags(&state.db, params.limit).await {
        Ok(res) => ResponseBuilder::success("TAGS_FETCHED", "Success", res).into_response(),
        Err(e) => ResponseBuilder::from_service_error(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::create_routes;
    use crate::test_utils::test_state;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_of(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_tag_then_list_it() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let app = create_routes(state.clone()).with_state(state);

        let created = app.clone().oneshot(form_post("/admin/tags", "name=Berita+Sekolah")).await.unwrap();
        assert_eq!(created.status(), StatusCode::SEE_OTHER);

        let list = app
            .oneshot(Request::builder().uri("/api/tags").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = json_of(list).await;
        assert_eq!(json["data"][0]["slug"], "berita-sekolah");
        assert_eq!(json["data"][0]["use_count"], 0);
    }

    #[tokio::test]
    async fn blank_or_duplicate_name_redisplays_form() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let app = create_routes(state.clone()).with_state(state);

        let blank = app.clone().oneshot(form_post("/admin/tags", "name=")).await.unwrap();
        assert_eq!(blank.status(), StatusCode::UNPROCESSABLE_ENTITY);

        app.clone().oneshot(form_post("/admin/tags", "name=Prestasi")).await.unwrap();
        let dup = app.oneshot(form_post("/admin/tags", "name=prestasi")).await.unwrap();
        assert_eq!(dup.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = dup.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&bytes).contains("is-invalid"));
    }

    #[tokio::test]
    async fn deleting_unknown_tag_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let app = create_routes(state.clone()).with_state(state);

        let response = app.oneshot(form_post("/admin/tags/77/delete", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
