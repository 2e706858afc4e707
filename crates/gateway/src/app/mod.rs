//! HTTP application wiring for the gateway.
//!
//! - `routes/`: client-facing routes and handlers
//! - the [`CatalogClient`] is shared with handlers through an `Extension` layer

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::client::CatalogClient;
use crate::config::GatewayConfig;
use crate::error::GatewayError;

pub mod routes;

/// Backend client as seen by the handlers.
pub type SharedClient = Arc<CatalogClient>;

/// Build the full gateway router (used by `main.rs` and tests).
///
/// Product routes live under `/api/products`; `/health` reports the gateway
/// itself and never touches the backend.
pub fn build_app(config: &GatewayConfig) -> Result<Router, GatewayError> {
    let client: SharedClient = Arc::new(CatalogClient::new(config)?);

    let api = routes::router().layer(Extension(client));

    Ok(Router::new()
        .route("/health", axum::routing::get(routes::system::health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new().layer(axum::middleware::from_fn(
                catalog_observability::http::trace_requests,
            )),
        ))
}
