//! Gateway error taxonomy.
//!
//! Backend-reported failures are relayed as [`GatewayError::Upstream`] with the
//! backend's own status and message. Only failures where no response arrived
//! (probe failure, timeout, refused or broken connection) originate here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use catalog_core::ErrorKind;

use crate::envelope::Envelope;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// Client input rejected before any network call.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    #[error("not found: {message}")]
    NotFound { message: String },

    /// The backend answered with an error status.
    #[error("upstream responded {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        details: Value,
    },

    /// Probe failed or the connection could not be made.
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, details: Value },

    /// The forwarded call exceeded its bound.
    #[error("gateway timeout: {message}")]
    GatewayTimeout { message: String, details: Value },

    /// Anything unclassified. The cause is logged, never returned.
    #[error("internal error: {cause}")]
    Internal { cause: String },
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn validation_with(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(cause: impl Into<String>) -> Self {
        Self::Internal {
            cause: cause.into(),
        }
    }

    /// The liveness probe failed; the real call was never attempted.
    pub fn unavailable(service: &str) -> Self {
        Self::ServiceUnavailable {
            message: format!("{service} is not available"),
            details: json!({
                "service": service,
                "status": "unavailable",
                "timestamp": now(),
            }),
        }
    }

    pub fn timeout(service: &str, operation: &str, timeout_ms: u64) -> Self {
        Self::GatewayTimeout {
            message: format!("timed out while {operation}"),
            details: json!({
                "service": service,
                "status": "timeout",
                "timeout_ms": timeout_ms,
            }),
        }
    }

    pub fn connection_refused(service: &str) -> Self {
        Self::ServiceUnavailable {
            message: "cannot connect to backend service".to_string(),
            details: json!({
                "service": service,
                "status": "connection_refused",
                "timestamp": now(),
            }),
        }
    }

    pub fn connection_error(service: &str, error_code: &str) -> Self {
        Self::ServiceUnavailable {
            message: "error communicating with backend service".to_string(),
            details: json!({
                "service": service,
                "status": "connection_error",
                "error_code": error_code,
                "timestamp": now(),
            }),
        }
    }

    /// Relay an upstream error response.
    ///
    /// The message comes from the body's `message`, then `error` field, then a
    /// generic text naming the operation. The whole body becomes `details`, with
    /// `service`, `status` and `error_code` merged in.
    pub fn upstream(service: &str, operation: &str, status: u16, body: Value) -> Self {
        let text_field = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        let message = text_field("message")
            .or_else(|| text_field("error"))
            .unwrap_or_else(|| format!("error during {operation}"));

        let mut details = match body {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("body".to_string(), other);
                map
            }
        };
        details.insert("service".to_string(), json!(service));
        details.insert("status".to_string(), json!("responding_with_error"));
        details.insert("error_code".to_string(), json!(status));

        Self::Upstream {
            status,
            message,
            details: Value::Object(details),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Validation { .. } => ErrorKind::ValidationError,
            GatewayError::NotFound { .. } => ErrorKind::NotFound,
            GatewayError::Upstream { status, .. } => ErrorKind::from_status(*status),
            GatewayError::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            GatewayError::GatewayTimeout { .. } => ErrorKind::GatewayTimeout,
            GatewayError::Internal { .. } => ErrorKind::InternalError,
        }
    }

    /// HTTP status sent to the client. Upstream statuses are relayed verbatim.
    pub fn status(&self) -> u16 {
        match self {
            GatewayError::Upstream { status, .. } => *status,
            other => other.kind().status_code(),
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Validation { message, .. }
            | GatewayError::NotFound { message }
            | GatewayError::Upstream { message, .. }
            | GatewayError::ServiceUnavailable { message, .. }
            | GatewayError::GatewayTimeout { message, .. } => message.clone(),
            GatewayError::Internal { .. } => "internal server error".to_string(),
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            GatewayError::Validation { details, .. } => details.as_ref(),
            GatewayError::Upstream { details, .. }
            | GatewayError::ServiceUnavailable { details, .. }
            | GatewayError::GatewayTimeout { details, .. } => Some(details),
            GatewayError::NotFound { .. } | GatewayError::Internal { .. } => None,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let envelope = Envelope::failure(self.public_message(), self.details().cloned());
        (status, axum::Json(envelope)).into_response()
    }
}
