//! HTTP application wiring (Axum router + shared state).
//!
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use catalog_products::{ProductCatalog, ProductStore};

pub mod dto;
pub mod errors;
pub mod routes;

/// Store handle shared by every request.
pub type SharedStore = Arc<dyn ProductStore>;

/// Lifecycle manager as seen by the handlers.
pub type SharedCatalog = Arc<ProductCatalog<SharedStore>>;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// Everything is mounted under `/api`.
pub fn build_app(store: SharedStore) -> Router {
    let catalog: SharedCatalog = Arc::new(ProductCatalog::new(store));

    let api = routes::router().layer(Extension(catalog));

    Router::new().nest("/api", api).layer(
        ServiceBuilder::new().layer(axum::middleware::from_fn(
            catalog_observability::http::trace_requests,
        )),
    )
}
