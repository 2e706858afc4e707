//! HTTP client for the catalog backend.
//!
//! Every operation is preceded by a liveness probe. If the probe fails the
//! operation is never sent. The forwarded call has its own timeout, and any
//! failure is classified into a [`GatewayError`].

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;

use catalog_core::ProductId;

use crate::config::{self, GatewayConfig};
use crate::envelope::BackendProductInput;
use crate::error::GatewayError;

/// Forwarded backend operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Restore,
}

impl Operation {
    /// Phrase used in client-facing messages ("timed out while ...").
    pub fn label(self) -> &'static str {
        match self {
            Operation::List => "fetching products",
            Operation::Get => "fetching product",
            Operation::Create => "creating product",
            Operation::Update => "updating product",
            Operation::Delete => "deleting product",
            Operation::Restore => "restoring product",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    service: String,
    request_timeout: Duration,
    health_check_timeout: Duration,
}

impl CatalogClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::internal(format!("build http client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.catalog_api_url.clone(),
            service: config.service_name.clone(),
            request_timeout: config.request_timeout,
            health_check_timeout: config.health_check_timeout,
        })
    }

    pub async fn list(&self) -> Result<Value, GatewayError> {
        self.call(Operation::List, Method::GET, "products".to_string(), None)
            .await
    }

    /// `Ok(None)` when the backend reports the product as missing.
    pub async fn get(&self, id: ProductId) -> Result<Option<Value>, GatewayError> {
        match self
            .call(Operation::Get, Method::GET, format!("products/{id}"), None)
            .await
        {
            Ok(product) => Ok(Some(product)),
            Err(GatewayError::Upstream { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create(&self, input: &BackendProductInput) -> Result<Value, GatewayError> {
        self.call(Operation::Create, Method::POST, "products".to_string(), Some(input))
            .await
    }

    pub async fn update(&self, id: ProductId, input: &BackendProductInput) -> Result<Value, GatewayError> {
        self.call(Operation::Update, Method::PUT, format!("products/{id}"), Some(input))
            .await
    }

    pub async fn delete(&self, id: ProductId) -> Result<Value, GatewayError> {
        self.call(Operation::Delete, Method::DELETE, format!("products/{id}"), None)
            .await
    }

    pub async fn restore(&self, id: ProductId) -> Result<Value, GatewayError> {
        self.call(Operation::Restore, Method::PATCH, format!("products/{id}/restore"), None)
            .await
    }

    #[tracing::instrument(skip(self, body), fields(service = %self.service))]
    async fn call(
        &self,
        op: Operation,
        method: Method,
        path: String,
        body: Option<&BackendProductInput>,
    ) -> Result<Value, GatewayError> {
        self.ensure_available().await?;

        let mut request = self.http.request(method, format!("{}/{}", self.base_url, path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.forward(op, request).await
    }

    /// Probe `GET {base}/health-check`. Any failure means unavailable.
    async fn ensure_available(&self) -> Result<(), GatewayError> {
        let probe = self
            .http
            .get(format!("{}/health-check", self.base_url))
            .timeout(self.health_check_timeout)
            .send()
            .await;

        match probe {
            Ok(res) if res.status().is_success() => Ok(()),
            Ok(res) => {
                tracing::warn!(status = res.status().as_u16(), "health probe rejected");
                Err(GatewayError::unavailable(&self.service))
            }
            Err(e) => {
                tracing::warn!(error = %e, timeout = e.is_timeout(), "health probe failed");
                Err(GatewayError::unavailable(&self.service))
            }
        }
    }

    async fn forward(&self, op: Operation, request: RequestBuilder) -> Result<Value, GatewayError> {
        let res = request
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| self.classify(op, e))?;

        let status = res.status();
        let bytes = res.bytes().await.map_err(|e| self.classify(op, e))?;

        if !status.is_success() {
            tracing::info!(status = status.as_u16(), operation = op.label(), "upstream error");
            return Err(GatewayError::upstream(
                &self.service,
                op.label(),
                status.as_u16(),
                error_body(&bytes),
            ));
        }

        if bytes.is_empty() || status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::internal(format!("{}: upstream returned invalid JSON: {e}", op.label())))
    }

    /// Map a transport failure. Timeouts win over refused connections, which
    /// win over everything else.
    fn classify(&self, op: Operation, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            tracing::warn!(operation = op.label(), "upstream timed out");
            return GatewayError::timeout(
                &self.service,
                op.label(),
                config::millis(self.request_timeout),
            );
        }

        let io_kind = io_error_kind(&err);
        if io_kind == Some(io::ErrorKind::ConnectionRefused)
            || (err.is_connect() && chain_text(&err).contains("refused"))
        {
            tracing::warn!(operation = op.label(), "upstream refused connection");
            return GatewayError::connection_refused(&self.service);
        }

        let code = match io_kind {
            Some(kind) => format!("{kind:?}"),
            None if err.is_connect() => "connect_error".to_string(),
            None if err.is_body() => "body_error".to_string(),
            None if err.is_decode() => "decode_error".to_string(),
            None if err.is_request() => "request_error".to_string(),
            None => "transport_error".to_string(),
        };
        tracing::warn!(operation = op.label(), error = %err, code = %code, "upstream transport error");
        GatewayError::connection_error(&self.service, &code)
    }
}

/// First `io::Error` in the source chain.
fn io_error_kind(err: &reqwest::Error) -> Option<io::ErrorKind> {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = cause.source();
    }
    None
}

/// Lowercased messages of the whole error chain.
fn chain_text(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text.to_lowercase()
}

fn error_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
