use axum::{http::StatusCode, response::IntoResponse, Json};

/// Gateway liveness. Says nothing about the backend.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
