use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use std::borrow::Cow;
use crate::entities::gallery;
use crate::services::storage_service::{StorageService, GALLERY_DIR};
use crate::utils::form_errors::FormErrors;

/// Isian form galeri (create & edit), apa adanya dari request.
/// String kosong pada field opsional sudah dinormalisasi menjadi `None`.
#[derive(Debug, Default, Clone, Serialize, Validate)]
pub struct GalleryForm {
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    #[validate(length(max = 255, message = "Judul maksimal 255 karakter."))]
    pub title_id: String,
    #[validate(length(max = 255, message = "Judul maksimal 255 karakter."))]
    pub title_en: Option<String>,
    #[validate(length(max = 255, message = "Judul maksimal 255 karakter."))]
    pub title_ar: Option<String>,

    pub description_id: Option<String>,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,

    #[validate(custom(function = "crate::utils::validator_utils::validate_http_url"))]
    #[validate(length(max = 255, message = "Link maksimal 255 karakter."))]
    pub link_url: Option<String>,

    #[validate(custom(function = "validate_manual_image_path"))]
    #[validate(length(max = 255, message = "Path gambar maksimal 255 karakter."))]
    pub image_path: Option<String>,

    // Disimpan mentah agar bisa ditampilkan ulang bila tidak valid
    #[validate(custom(function = "validate_sort_order"))]
    pub sort_order: String,
}

/// File gambar yang diunggah lewat field `image_file`.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

pub const GALLERY_FIELDS: [&str; 10] = [
    "title_id",
    "title_en",
    "title_ar",
    "description_id",
    "description_en",
    "description_ar",
    "image_file",
    "image_path",
    "link_url",
    "sort_order",
];

fn validate_sort_order(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match value.trim().parse::<i32>() {
        Ok(n) if n >= 0 => Ok(()),
        Ok(_) => {
            let mut error = ValidationError::new("range");
            error.message = Some(Cow::from("Sort order minimal 0."));
            Err(error)
        }
        Err(_) => {
            let mut error = ValidationError::new("integer");
            error.message = Some(Cow::from("Sort order harus berupa bilangan bulat."));
            Err(error)
        }
    }
}

/// Folder unggahan hanya diisi lewat upload; path manual ke sana bisa terhapus bersama item lain.
fn validate_manual_image_path(value: &str) -> Result<(), ValidationError> {
    let path = value.trim().trim_start_matches("./");
    if path.split('/').any(|segment| segment == "..") {
        let mut error = ValidationError::new("path");
        error.message = Some(Cow::from("Path gambar tidak valid."));
        return Err(error);
    }
    if path.starts_with(&format!("{}/", GALLERY_DIR)) {
        let mut error = ValidationError::new("reserved");
        error.message = Some(Cow::from("Path manual tidak boleh berada di folder unggahan gallery/."));
        return Err(error);
    }
    Ok(())
}

pub fn image_too_large_message(max_upload_bytes: usize) -> String {
    format!("Ukuran gambar maksimal {} KB.", max_upload_bytes / 1024)
}

impl GalleryForm {
    /// Terima satu field teks dari multipart / form.
    pub fn set_field(&mut self, name: &str, value: String) {
        let optional = if value.trim().is_empty() { None } else { Some(value.trim().to_string()) };
        match name {
            "title_id" => self.title_id = value.trim().to_string(),
            "title_en" => self.title_en = optional,
            "title_ar" => self.title_ar = optional,
            "description_id" => self.description_id = optional,
            "description_en" => self.description_en = optional,
            "description_ar" => self.description_ar = optional,
            "link_url" => self.link_url = optional,
            "image_path" => self.image_path = optional,
            "sort_order" => self.sort_order = value.trim().to_string(),
            _ => {}
        }
    }

    /// Nilai sort order setelah validasi; kosong berarti 0.
    pub fn sort_order_value(&self) -> i32 {
        self.sort_order.trim().parse::<i32>().unwrap_or(0)
    }

    /// Validasi lengkap, termasuk aturan file gambar.
    ///
    /// `image_required` bernilai `false` saat edit: gambar lama tetap dipakai.
    pub fn validate_submission(
        &self,
        image: Option<&UploadedImage>,
        max_upload_bytes: usize,
        image_required: bool,
    ) -> FormErrors {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from(e),
        };

        match image {
            Some(file) => {
                if !file.content_type.starts_with("image/") {
                    errors.add("image_file", "File harus berupa gambar.");
                } else if StorageService::detect_image_format(&file.data).is_none() {
                    errors.add("image_file", "File gambar tidak dikenali atau rusak.");
                }
                if file.data.len() > max_upload_bytes {
                    errors.add("image_file", image_too_large_message(max_upload_bytes));
                }
            }
            None if image_required && self.image_path.is_none() => {
                errors.add("image_file", "Gambar wajib diunggah (atau isi path manual).");
            }
            None => {}
        }

        errors
    }

    pub fn from_model(model: &gallery::Model) -> Self {
        Self {
            title_id: model.title_id.clone(),
            title_en: model.title_en.clone(),
            title_ar: model.title_ar.clone(),
            description_id: model.description_id.clone(),
            description_en: model.description_en.clone(),
            description_ar: model.description_ar.clone(),
            link_url: model.link_url.clone(),
            // File unggahan tidak ditampilkan sebagai path manual; kosong berarti gambar lama dipakai
            image_path: if StorageService::is_local_upload(&model.image_path) {
                None
            } else {
                Some(model.image_path.clone())
            },
            sort_order: model.sort_order.to_string(),
        }
    }

    /// Form kosong untuk halaman create (sort order default 0).
    pub fn blank() -> Self {
        Self {
            sort_order: "0".to_string(),
            ..Default::default()
        }
    }
}

/// Satu input di template: nilai lama + pesan error pertama.
#[derive(Serialize)]
pub struct FieldView {
    pub value: String,
    pub error: Option<String>,
}

/// Konteks template `gallery/form.html`.
#[derive(Serialize)]
pub struct GalleryFormView {
    pub page_title: String,
    pub heading: String,
    pub subheading: String,
    pub action: String,
    pub is_edit: bool,
    pub current_image_url: Option<String>,
    pub fields: std::collections::BTreeMap<&'static str, FieldView>,
}

impl GalleryFormView {
    pub fn new(form: &GalleryForm, errors: &FormErrors, action: String, current_image_url: Option<String>) -> Self {
        let is_edit = current_image_url.is_some();
        let value_of = |name: &str| -> String {
            let v = match name {
                "title_id" => Some(form.title_id.clone()),
                "title_en" => form.title_en.clone(),
                "title_ar" => form.title_ar.clone(),
                "description_id" => form.description_id.clone(),
                "description_en" => form.description_en.clone(),
                "description_ar" => form.description_ar.clone(),
                "image_path" => form.image_path.clone(),
                "link_url" => form.link_url.clone(),
                "sort_order" => Some(form.sort_order.clone()),
                _ => None,
            };
            v.unwrap_or_default()
        };

        let fields = GALLERY_FIELDS
            .iter()
            .map(|name| {
                (*name, FieldView {
                    value: value_of(name),
                    error: errors.first(name).map(str::to_string),
                })
            })
            .collect();

        Self {
            page_title: if is_edit { "Edit Galeri".to_string() } else { "Tambah Galeri".to_string() },
            heading: if is_edit { "Edit Galeri".to_string() } else { "Tambah Galeri".to_string() },
            subheading: if is_edit {
                "Perbarui data gambar galeri sekolah".to_string()
            } else {
                "Unggah gambar baru untuk galeri sekolah".to_string()
            },
            action,
            is_edit,
            current_image_url,
            fields,
        }
    }
}

/// Baris tabel di halaman index admin.
#[derive(Serialize)]
pub struct GalleryRow {
    pub id: i64,
    pub title_id: String,
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub sort_order: i32,
}

#[derive(Serialize)]
pub struct GalleryIndexView {
    pub page_title: String,
    pub items: Vec<GalleryRow>,
    pub flash: Option<String>,
}

#[derive(Deserialize)]
pub struct GalleryIndexParams {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct GalleryFeedParams {
    pub locale: Option<String>,
}

/// Item galeri publik, sudah dilokalkan.
#[derive(Debug, Serialize)]
pub struct GalleryFeedItem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub sort_order: i32,
}
