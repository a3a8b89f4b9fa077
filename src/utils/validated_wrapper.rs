use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
    response::IntoResponse,
};
use validator::Validate;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::form_errors::map_validation_errors;

pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // 1. JSON Extraction
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err| {
                let message = format!("Invalid JSON format: {}", err.body_text());
                ResponseBuilder::error::<()>(
                    StatusCode::BAD_REQUEST,
                    "INVALID_JSON",
                    &message,
                ).into_response()
            })?;

        // 2. Logic Validation
        if let Err(e) = payload.validate() {
            return Err(ResponseBuilder::fail_with_data(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Validation failed",
                map_validation_errors(e),
            ).into_response());
        }

        Ok(ValidatedJson(payload))
    }
}
