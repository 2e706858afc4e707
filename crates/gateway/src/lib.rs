//! Client-facing gateway in front of the catalog backend.
//!
//! Requests are validated and reshaped locally, forwarded over HTTP behind a
//! liveness probe and per-call timeouts, and every outcome is wrapped in the
//! same `{success, data|message|error, details?}` envelope.

pub mod app;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;

pub use client::CatalogClient;
pub use config::GatewayConfig;
pub use error::GatewayError;
