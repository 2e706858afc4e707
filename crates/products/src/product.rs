use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{Entity, ProductId};

use crate::country::CountryCode;

/// Stored product record.
///
/// Serialized with the backend's wire names (`country`, `created_at`, ...).
/// A non-null `deleted_at` marks the record as tombstoned; it stays addressable
/// and keeps its (name, country) identity reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub country: CountryCode,
    pub sku: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether this record holds the given (name, country) identity.
    pub fn has_identity(&self, name: &str, country: &CountryCode) -> bool {
        self.name == name && &self.country == country
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Fields of a record about to be inserted. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub country: CountryCode,
    pub sku: String,
}
