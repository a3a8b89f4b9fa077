use std::collections::BTreeMap;
use validator::ValidationErrors;
use crate::utils::api_response::ValidationErrorDetail;

/// Pesan error per field, untuk ditampilkan inline di bawah input.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Pesan pertama untuk field, seperti `$message` di template.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|m| m.first()).map(String::as_str)
    }

    /// Gabungkan error lain; pesan yang sudah ada tetap di depan.
    pub fn extend(&mut self, other: FormErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn merge(&mut self, errors: ValidationErrors) {
        for (field, kinds) in errors.field_errors() {
            for err in kinds {
                let message = err
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Nilai tidak valid.".to_string());
                self.add(&field.to_string(), message);
            }
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        form_errors.merge(errors);
        form_errors
    }
}

// Convert validator errors to our custom struct list
pub fn map_validation_errors(errors: ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut details = Vec::new();

    for (field, error_kind) in errors.field_errors() {
        for err in error_kind {
            details.push(ValidationErrorDetail {
                field: field.to_string(),
                title: err.code.to_string(),
                message: err.message.clone().map(|m| m.to_string()).unwrap_or_else(|| "Invalid value".to_string()),
            });
        }
    }

    details
}
