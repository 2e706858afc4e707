//! Client-facing envelope and field mapping between gateway and backend shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

/// `{success, data | message | error, details?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            details: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
            details: None,
        }
    }
}

impl Envelope<()> {
    pub fn failure(error: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
            details,
        }
    }
}

/// A product as the gateway's clients see it.
///
/// Reads the backend's snake_case record and writes camelCase, with `country`
/// exposed as `countryCode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: u64,
    pub name: String,
    #[serde(rename(serialize = "countryCode", deserialize = "country"))]
    pub country_code: String,
    pub sku: String,
    #[serde(rename(serialize = "createdAt", deserialize = "created_at"), default)]
    pub created_at: Option<String>,
    #[serde(rename(serialize = "updatedAt", deserialize = "updated_at"), default)]
    pub updated_at: Option<String>,
    #[serde(rename(serialize = "deletedAt", deserialize = "deleted_at"), default)]
    pub deleted_at: Option<String>,
}

impl ProductView {
    pub fn from_backend(payload: Value) -> Result<Self, GatewayError> {
        serde_json::from_value(payload)
            .map_err(|e| GatewayError::internal(format!("undecodable product payload: {e}")))
    }

    pub fn list_from_backend(payload: Value) -> Result<Vec<Self>, GatewayError> {
        serde_json::from_value(payload)
            .map_err(|e| GatewayError::internal(format!("undecodable product list payload: {e}")))
    }
}

/// Create/update body as clients send it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: Option<String>,
    pub country_code: Option<String>,
}

/// Create/update body as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendProductInput {
    pub name: String,
    pub country: String,
}

impl ProductPayload {
    pub fn into_backend(self) -> Result<BackendProductInput, GatewayError> {
        let name = required(self.name, "name")?;
        let country = required(self.country_code, "countryCode")?;
        Ok(BackendProductInput { name, country })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, GatewayError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(GatewayError::validation_with(
            format!("the {field} field is required"),
            serde_json::json!({ "field": field }),
        )),
    }
}
