use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use catalog_core::{DomainError, ProductId};
use catalog_products::{Product, ProductInput};

// -------------------------
// Request DTOs
// -------------------------

/// Create/update body. Both fields are required; they are optional here so a
/// missing field is reported as a validation failure rather than a decode error.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub country: Option<String>,
}

impl ProductRequest {
    pub fn into_input(self) -> Result<ProductInput, DomainError> {
        let name = self
            .name
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| DomainError::validation("the name field is required"))?;
        let country = self
            .country
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| DomainError::validation("the country field is required"))?;
        Ok(ProductInput::new(name, country))
    }
}

pub fn body_to_input(
    body: Result<axum::Json<ProductRequest>, JsonRejection>,
) -> Result<ProductInput, DomainError> {
    let axum::Json(req) = body.map_err(|e| DomainError::validation(e.body_text()))?;
    req.into_input()
}

/// Path ids that cannot be parsed cannot exist either.
pub fn parse_id(raw: &str) -> Result<ProductId, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::not_found(format!("product {raw} does not exist")))
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id,
        "name": p.name,
        "country": p.country,
        "sku": p.sku,
        "created_at": p.created_at.to_rfc3339(),
        "updated_at": p.updated_at.to_rfc3339(),
        "deleted_at": p.deleted_at.map(|d| d.to_rfc3339()),
    })
}
