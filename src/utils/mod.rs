pub mod api_response;
pub mod form_errors;
pub mod validated_wrapper;
pub mod validator_utils;
pub mod view;
