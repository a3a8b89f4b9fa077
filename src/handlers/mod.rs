pub mod article_handler;
pub mod gallery_handler;
pub mod tag_handler;

use axum::response::IntoResponse;
use chrono::{Utc, FixedOffset};
use crate::utils::api_response::ResponseBuilder;

pub async fn health_check_handler() -> impl IntoResponse {
    let now = match FixedOffset::east_opt(8 * 3600) {
        Some(offset) => Utc::now().with_timezone(&offset).to_rfc3339(),
        None => Utc::now().to_rfc3339(),
    };

    ResponseBuilder::success(
        "HEALTH_CHECK_SUCCESS",
        "Server is healthy",
        serde_json::json!({
            "status": "up",
            "server_time": now,
            "timezone": "UTC+8 (WITA)"
        })
    )
}

/// Teks banner setelah redirect (`?status=created` dst).
pub(crate) fn flash_message(status: Option<&str>) -> Option<String> {
    let text = match status? {
        "created" => "Data berhasil disimpan.",
        "updated" => "Data berhasil diperbarui.",
        "deleted" => "Data berhasil dihapus.",
        "recounted" => "Jumlah pemakaian tag berhasil dihitung ulang.",
        _ => return None,
    };
    Some(text.to_string())
}
