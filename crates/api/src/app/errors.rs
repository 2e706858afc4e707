use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Value};

use catalog_core::{DomainError, ErrorKind};

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let kind = err.kind();
    if kind.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::debug!(error = %err, "request rejected");
    }
    json_error(kind, err.public_message(), err.details().cloned())
}

/// Error body: `{"error": <kind code>, "message": <text>, "details"?: {...}}`.
pub fn json_error(
    kind: ErrorKind,
    message: impl Into<String>,
    details: Option<Value>,
) -> axum::response::Response {
    let status = StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut body = json!({
        "error": kind.code(),
        "message": message.into(),
    });
    if let Some(details) = details {
        body["details"] = details;
    }
    (status, axum::Json(body)).into_response()
}
