use axum::{routing::get, Router};

pub mod products;
pub mod system;

/// Router for every backend endpoint (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .route("/health-check", get(system::health_check))
        .nest("/products", products::router())
}
