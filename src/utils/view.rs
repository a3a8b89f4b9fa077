use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use tera::{Context, Tera};

/// Template dibundel ke binary agar tidak bergantung pada working directory.
pub fn build_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("layout.html", include_str!("../../templates/layout.html")),
        ("error.html", include_str!("../../templates/error.html")),
        ("gallery/index.html", include_str!("../../templates/gallery/index.html")),
        ("gallery/form.html", include_str!("../../templates/gallery/form.html")),
        ("tags/index.html", include_str!("../../templates/tags/index.html")),
    ])?;
    Ok(tera)
}

/// Render template ke response HTML dengan status tertentu.
pub fn render<C: Serialize>(tera: &Tera, template: &str, status: StatusCode, context: &C) -> Response {
    let context = match Context::from_serialize(context) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Template context for {} is not an object: {}", template, e);
            return plain_error(StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed");
        }
    };

    match tera.render(template, &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render {}: {:?}", template, e);
            plain_error(StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed")
        }
    }
}

#[derive(Serialize)]
struct ErrorPage<'a> {
    page_title: &'a str,
    status: u16,
    code: &'a str,
    message: &'a str,
}

/// Halaman error admin untuk `Err` dari service.
pub fn error_page(tera: &Tera, (status, code, message): (StatusCode, &'static str, String)) -> Response {
    render(
        tera,
        "error.html",
        status,
        &ErrorPage {
            page_title: "Terjadi Kesalahan",
            status: status.as_u16(),
            code,
            message: &message,
        },
    )
}

fn plain_error(status: StatusCode, message: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], message).into_response()
}
