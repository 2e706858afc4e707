use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_core::{DomainError, DomainResult, Entity, ProductId};

use crate::country::CountryCode;
use crate::product::{NewProduct, Product};
use crate::store::ProductStore;

/// In-memory product store for tests/dev.
///
/// Ids come from a counter owned by the store and are never reused.
#[derive(Debug)]
pub struct InMemoryProductStore {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    records: BTreeMap<ProductId, Product>,
    next_id: u64,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::starting_at(ProductId::new(1))
    }

    /// Store whose first assigned id is `first`.
    pub fn starting_at(first: ProductId) -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: BTreeMap::new(),
                next_id: first.get(),
            }),
        }
    }

    fn read(&self) -> DomainResult<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| DomainError::storage("product store lock poisoned"))
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| DomainError::storage("product store lock poisoned"))
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn holder_of(
        &self,
        name: &str,
        country: &CountryCode,
        excluding: Option<ProductId>,
    ) -> Option<&Product> {
        self.records
            .values()
            .find(|p| Some(p.id()) != excluding && p.has_identity(name, country))
    }

    fn existing_mut(&mut self, id: ProductId) -> DomainResult<&mut Product> {
        self.records
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("product {id} does not exist")))
    }
}

fn duplicate(holder: &Product) -> DomainError {
    DomainError::conflict_with(
        "a product with the same name and country already exists",
        serde_json::json!({ "existing_product_id": holder.id() }),
    )
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> DomainResult<Vec<Product>> {
        Ok(self.read()?.records.values().cloned().collect())
    }

    async fn get(&self, id: ProductId) -> DomainResult<Option<Product>> {
        Ok(self.read()?.records.get(&id).cloned())
    }

    async fn find_by_identity(
        &self,
        name: &str,
        country: &CountryCode,
        excluding: Option<ProductId>,
    ) -> DomainResult<Option<Product>> {
        Ok(self.read()?.holder_of(name, country, excluding).cloned())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.read()?.records.len() as u64)
    }

    async fn insert(&self, draft: NewProduct) -> DomainResult<Product> {
        let mut inner = self.write()?;
        if let Some(holder) = inner.holder_of(&draft.name, &draft.country, None) {
            return Err(duplicate(holder));
        }

        let id = ProductId::new(inner.next_id);
        inner.next_id += 1;

        let now = Utc::now();
        let product = Product {
            id,
            name: draft.name,
            country: draft.country,
            sku: draft.sku,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.records.insert(id, product.clone());
        Ok(product)
    }

    async fn update(&self, product: &Product) -> DomainResult<Product> {
        let mut inner = self.write()?;
        if !inner.records.contains_key(&product.id) {
            return Err(DomainError::not_found(format!("product {} does not exist", product.id)));
        }
        if let Some(holder) = inner.holder_of(&product.name, &product.country, Some(product.id)) {
            return Err(duplicate(holder));
        }

        let stored = inner.existing_mut(product.id)?;
        stored.name = product.name.clone();
        stored.country = product.country.clone();
        stored.sku = product.sku.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn soft_delete(&self, id: ProductId, at: DateTime<Utc>) -> DomainResult<Product> {
        let mut inner = self.write()?;
        let stored = inner.existing_mut(id)?;
        stored.deleted_at = Some(at);
        Ok(stored.clone())
    }

    async fn restore(&self, id: ProductId) -> DomainResult<Product> {
        let mut inner = self.write()?;
        let stored = inner.existing_mut(id)?;
        stored.deleted_at = None;
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, country: &str, sku: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            country: CountryCode::normalize(country).unwrap(),
            sku: sku.to_string(),
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let store = InMemoryProductStore::new();
        let a = store.insert(draft("A", "MX", "CT-MX-1")).await.unwrap();
        let b = store.insert(draft("B", "MX", "CT-MX-2")).await.unwrap();
        assert_eq!(a.id, ProductId::new(1));
        assert_eq!(b.id, ProductId::new(2));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn rejects_duplicate_identity_on_insert() {
        let store = InMemoryProductStore::new();
        store.insert(draft("A", "MX", "CT-MX-1")).await.unwrap();
        let err = store.insert(draft("A", "MX", "CT-MX-2")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
        // A rejected insert does not consume an id.
        let next = store.insert(draft("B", "MX", "CT-MX-2")).await.unwrap();
        assert_eq!(next.id, ProductId::new(2));
    }

    #[tokio::test]
    async fn soft_delete_only_touches_the_tombstone() {
        let store = InMemoryProductStore::new();
        let created = store.insert(draft("A", "MX", "CT-MX-1")).await.unwrap();
        let at = Utc::now();
        let deleted = store.soft_delete(created.id, at).await.unwrap();
        assert_eq!(deleted.deleted_at, Some(at));
        assert_eq!(deleted.updated_at, created.updated_at);
        assert_eq!(deleted.sku, created.sku);

        let restored = store.restore(created.id).await.unwrap();
        assert!(!restored.is_trashed());
        assert_eq!(restored.updated_at, created.updated_at);
    }

    #[tokio::test]
    async fn update_of_unknown_record_is_not_found() {
        let store = InMemoryProductStore::new();
        let created = store.insert(draft("A", "MX", "CT-MX-1")).await.unwrap();
        let mut ghost = created.clone();
        ghost.id = ProductId::new(99);
        let err = store.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
