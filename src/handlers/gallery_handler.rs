use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use crate::config::AppState;
use crate::handlers::flash_message;
use crate::models::gallery_model::*;
use crate::services::gallery_service::GalleryService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::form_errors::FormErrors;
use crate::utils::view::{error_page, render};

const INDEX_PATH: &str = "/admin/gallery";

pub async fn gallery_index_handler(
    State(state): State<AppState>,
    Query(params): Query<GalleryIndexParams>,
) -> Response {
    match GalleryService::list(&state.db).await {
        Ok(items) => {
            let view = GalleryIndexView {
                page_title: "Galeri".to_string(),
                items: items.into_iter().map(|i| GalleryService::to_row(&state.storage, i)).collect(),
                flash: flash_message(params.status.as_deref()),
            };
            render(&state.templates, "gallery/index.html", StatusCode::OK, &view)
        }
        Err(e) => error_page(&state.templates, e),
    }
}

pub async fn gallery_create_handler(State(state): State<AppState>) -> Response {
    let view = GalleryFormView::new(&GalleryForm::blank(), &FormErrors::new(), INDEX_PATH.to_string(), None);
    render(&state.templates, "gallery/form.html", StatusCode::OK, &view)
}

/// `admin.gallery.store`
pub async fn gallery_store_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Response {
    let GallerySubmission { form, image, mut errors } =
        match read_gallery_form(multipart, state.storage.max_upload_bytes()).await {
            Ok(parsed) => parsed,
            Err(resp) => return resp,
        };

    errors.extend(form.validate_submission(image.as_ref(), state.storage.max_upload_bytes(), true));
    if !errors.is_empty() {
        tracing::debug!("Gallery form rejected: {:?}", errors);
        let view = GalleryFormView::new(&form, &errors, INDEX_PATH.to_string(), None);
        return render(&state.templates, "gallery/form.html", StatusCode::UNPROCESSABLE_ENTITY, &view);
    }

    match GalleryService::create(&state.db, &state.storage, &form, image.as_ref()).await {
        Ok(_) => Redirect::to(&format!("{}?status=created", INDEX_PATH)).into_response(),
        Err(e) => error_page(&state.templates, e),
    }
}

pub async fn gallery_edit_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    match GalleryService::find(&state.db, id).await {
        Ok(item) => {
            let current = state.storage.url_for(&item.image_path);
            let view = GalleryFormView::new(
                &GalleryForm::from_model(&item),
                &FormErrors::new(),
                format!("{}/{}", INDEX_PATH, id),
                Some(current),
            );
            render(&state.templates, "gallery/form.html", StatusCode::OK, &view)
        }
        Err(e) => error_page(&state.templates, e),
    }
}

pub async fn gallery_update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Response {
    let existing = match GalleryService::find(&state.db, id).await {
        Ok(item) => item,
        Err(e) => return error_page(&state.templates, e),
    };

    let GallerySubmission { form, image, mut errors } =
        match read_gallery_form(multipart, state.storage.max_upload_bytes()).await {
            Ok(parsed) => parsed,
            Err(resp) => return resp,
        };

    errors.extend(form.validate_submission(image.as_ref(), state.storage.max_upload_bytes(), false));
    if !errors.is_empty() {
        let view = GalleryFormView::new(
            &form,
            &errors,
            format!("{}/{}", INDEX_PATH, id),
            Some(state.storage.url_for(&existing.image_path)),
        );
        return render(&state.templates, "gallery/form.html", StatusCode::UNPROCESSABLE_ENTITY, &view);
    }

    match GalleryService::update(&state.db, &state.storage, id, &form, image.as_ref()).await {
        Ok(_) => Redirect::to(&format!("{}?status=updated", INDEX_PATH)).into_response(),
        Err(e) => error_page(&state.templates, e),
    }
}

pub async fn gallery_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    match GalleryService::delete(&state.db, &state.storage, id).await {
        Ok(()) => Redirect::to(&format!("{}?status=deleted", INDEX_PATH)).into_response(),
        Err(e) => error_page(&state.templates, e),
    }
}

pub async fn gallery_feed_handler(
    State(state): State<AppState>,
    Query(params): Query<GalleryFeedParams>,
) -> Response {
    let locale = params.locale.unwrap_or_else(|| "id".to_string());
    match GalleryService::feed(&state.db, &state.storage, &locale).await {
        Ok(items) => ResponseBuilder::success("GALLERY_FETCHED", "Success", items).into_response(),
        Err(e) => ResponseBuilder::from_service_error(e),
    }
}

/// Isi form multipart beserta error yang muncul saat membaca body.
struct GallerySubmission {
    form: GalleryForm,
    image: Option<UploadedImage>,
    errors: FormErrors,
}

/// Baca seluruh field multipart. Input file kosong (tanpa pilihan) dianggap tidak ada.
///
/// File disimpan paling banyak `max_upload_bytes + 1` byte; sisanya dibuang agar field
/// setelahnya tetap terbaca. Body yang melewati batas router berhenti dibaca dan
/// form ditampilkan ulang dengan field yang sudah masuk.
async fn read_gallery_form(mut multipart: Multipart, max_upload_bytes: usize) -> Result<GallerySubmission, Response> {
    let mut submission = GallerySubmission {
        form: GalleryForm::default(),
        image: None,
        errors: FormErrors::new(),
    };

    'fields: loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                submission.errors.add("image_file", image_too_large_message(max_upload_bytes));
                break;
            }
            Err(e) => {
                tracing::warn!("Malformed gallery upload: {}", e);
                return Err((e.status(), e.body_text()).into_response());
            }
        };

        let name = field.name().unwrap_or("").to_string();
        if name == "image_file" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
            let mut data = Vec::new();

            loop {
                match field.chunk().await {
                    Ok(Some(chunk)) => {
                        let room = (max_upload_bytes + 1).saturating_sub(data.len());
                        data.extend_from_slice(&chunk[..chunk.len().min(room)]);
                    }
                    Ok(None) => break,
                    Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                        submission.errors.add("image_file", image_too_large_message(max_upload_bytes));
                        break 'fields;
                    }
                    Err(e) => return Err((e.status(), e.body_text()).into_response()),
                }
            }

            if !file_name.is_empty() || !data.is_empty() {
                submission.image = Some(UploadedImage { file_name, content_type, data: Bytes::from(data) });
            }
        } else {
            match field.text().await {
                Ok(value) => submission.form.set_field(&name, value),
                Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                    submission.errors.add("image_file", image_too_large_message(max_upload_bytes));
                    break;
                }
                Err(e) => return Err((e.status(), e.body_text()).into_response()),
            }
        }
    }

    Ok(submission)
}
