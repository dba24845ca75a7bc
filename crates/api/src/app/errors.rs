use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stocktake_core::DomainError;
use stocktake_infra::StoreError;

use crate::app::dto::messages;

/// Map a validation failure to a 400.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::MissingField(_) => json_error(
            StatusCode::BAD_REQUEST,
            "missing_fields",
            messages::MISSING_FIELDS,
        ),
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
    }
}

/// Log a store failure and answer with a generic 500.
///
/// The response carries only `public_message`; the store detail stays in the
/// server log.
pub fn store_error_to_response(
    operation: &'static str,
    err: StoreError,
    public_message: &'static str,
) -> axum::response::Response {
    tracing::error!(operation, error = %err, "store operation failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", public_message)
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
