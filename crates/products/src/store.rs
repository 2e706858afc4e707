//! Persistence contract for product records.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_core::{DomainResult, ProductId};

use crate::country::CountryCode;
use crate::product::{NewProduct, Product};

/// Durable product storage with soft-delete support.
///
/// Lookups always see tombstoned records. Implementations also enforce
/// (name, country) uniqueness on `insert`/`update` and report a
/// `DomainError::Conflict` when it trips, backing up the check the catalog runs
/// before writing.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All records, tombstoned included, ordered by id.
    async fn list(&self) -> DomainResult<Vec<Product>>;

    async fn get(&self, id: ProductId) -> DomainResult<Option<Product>>;

    /// Record holding (name, country), ignoring `excluding` when given.
    async fn find_by_identity(
        &self,
        name: &str,
        country: &CountryCode,
        excluding: Option<ProductId>,
    ) -> DomainResult<Option<Product>>;

    /// Number of records ever stored and still present, tombstoned included.
    async fn count(&self) -> DomainResult<u64>;

    async fn insert(&self, draft: NewProduct) -> DomainResult<Product>;

    /// Write name, country and sku of an existing record and refresh `updated_at`.
    async fn update(&self, product: &Product) -> DomainResult<Product>;

    /// Set the tombstone marker. No other field changes.
    async fn soft_delete(&self, id: ProductId, at: DateTime<Utc>) -> DomainResult<Product>;

    /// Clear the tombstone marker. No other field changes.
    async fn restore(&self, id: ProductId) -> DomainResult<Product>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn list(&self) -> DomainResult<Vec<Product>> {
        (**self).list().await
    }

    async fn get(&self, id: ProductId) -> DomainResult<Option<Product>> {
        (**self).get(id).await
    }

    async fn find_by_identity(
        &self,
        name: &str,
        country: &CountryCode,
        excluding: Option<ProductId>,
    ) -> DomainResult<Option<Product>> {
        (**self).find_by_identity(name, country, excluding).await
    }

    async fn count(&self) -> DomainResult<u64> {
        (**self).count().await
    }

    async fn insert(&self, draft: NewProduct) -> DomainResult<Product> {
        (**self).insert(draft).await
    }

    async fn update(&self, product: &Product) -> DomainResult<Product> {
        (**self).update(product).await
    }

    async fn soft_delete(&self, id: ProductId, at: DateTime<Utc>) -> DomainResult<Product> {
        (**self).soft_delete(id, at).await
    }

    async fn restore(&self, id: ProductId) -> DomainResult<Product> {
        (**self).restore(id).await
    }
}
