use std::borrow::Cow;
use validator::ValidationError;

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("is_required");
        error.message = Some(Cow::from("Kolom ini wajib diisi."));
        Err(error)
    } else {
        Ok(())
    }
}

/// Hanya URL absolut http/https yang diterima sebagai tautan.
pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    let lower = value.trim().to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));

    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') && !host.contains(char::is_whitespace) => Ok(()),
        _ => {
            let mut error = ValidationError::new("url");
            error.message = Some(Cow::from("Format URL tidak valid (harus diawali http:// atau https://)."));
            Err(error)
        }
    }
}

/// Nama tag harus menghasilkan slug yang tidak kosong.
pub fn validate_sluggable(value: &str) -> Result<(), ValidationError> {
    if slug::slugify(value).is_empty() {
        let mut error = ValidationError::new("slug");
        error.message = Some(Cow::from("Nama harus mengandung huruf atau angka."));
        Err(error)
    } else {
        Ok(())
    }
}
