//! Product lifecycle rules on top of a [`ProductStore`].
//!
//! `active -> tombstoned -> active` is the only state machine: updates and
//! deletes require an active record, restore is accepted in either state.

use chrono::Utc;
use serde_json::json;

use catalog_core::{DomainError, DomainResult, ProductId};

use crate::country::CountryCode;
use crate::product::{NewProduct, Product};
use crate::sku;
use crate::store::ProductStore;

/// Raw create/update input as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub country: String,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }

    fn validate(&self) -> DomainResult<(String, CountryCode)> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        let country = CountryCode::normalize(&self.country)?;
        Ok((self.name.clone(), country))
    }
}

/// Enforces identity uniqueness, SKU derivation and the delete/restore state
/// machine. Performs no I/O beyond the store and never retries.
///
/// The uniqueness check and the following write are separate store calls, so two
/// concurrent writers can both pass the check; the store's own uniqueness guard
/// is what catches that case.
#[derive(Debug, Clone)]
pub struct ProductCatalog<S> {
    store: S,
}

impl<S: ProductStore> ProductCatalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every record, tombstoned ones included.
    pub async fn list(&self) -> DomainResult<Vec<Product>> {
        self.store.list().await
    }

    pub async fn get(&self, id: ProductId) -> DomainResult<Product> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> DomainResult<Product> {
        let (name, country) = input.validate()?;

        // Tombstoned records keep their identity reserved.
        if let Some(existing) = self.store.find_by_identity(&name, &country, None).await? {
            tracing::debug!(existing_id = %existing.id, "create rejected: identity taken");
            return Err(DomainError::conflict_with(
                "product information already exists; try different information",
                json!({ "existing_product_id": existing.id }),
            ));
        }

        let existing_records = self.store.count().await?;
        let sku = sku::for_new_product(&country, existing_records);

        let product = self.store.insert(NewProduct { name, country, sku }).await?;
        tracing::info!(id = %product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    #[tracing::instrument(skip(self, input), fields(id = %id))]
    pub async fn update(&self, id: ProductId, input: ProductInput) -> DomainResult<Product> {
        let (name, country) = input.validate()?;

        let current = self.get(id).await?;
        if current.is_trashed() {
            return Err(DomainError::forbidden(
                "product is deleted; it can only be restored",
            ));
        }

        let name_changed = name != current.name;
        let country_changed = country != current.country;
        if !name_changed && !country_changed {
            return Ok(current);
        }

        if let Some(existing) = self.store.find_by_identity(&name, &country, Some(id)).await? {
            return Err(DomainError::conflict_with(
                "a product with the same name and country already exists",
                json!({
                    "existing_product_id": existing.id,
                    "conflict_fields": {
                        "name": name,
                        "country": country,
                    },
                }),
            ));
        }

        let mut next = current;
        if country_changed {
            next.sku = sku::for_country_change(&country, id);
        }
        next.name = name;
        next.country = country;

        let product = self.store.update(&next).await?;
        tracing::info!(sku = %product.sku, "product updated");
        Ok(product)
    }

    /// Soft delete: only the tombstone marker changes.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: ProductId) -> DomainResult<Product> {
        let current = self.get(id).await?;
        if current.is_trashed() {
            return Err(DomainError::forbidden("product is already deleted"));
        }

        let product = self.store.soft_delete(id, Utc::now()).await?;
        tracing::info!("product deleted");
        Ok(product)
    }

    /// Clears the tombstone. Restoring an active record succeeds without change.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub async fn restore(&self, id: ProductId) -> DomainResult<Product> {
        let current = self.get(id).await?;
        if !current.is_trashed() {
            return Ok(current);
        }

        let product = self.store.restore(id).await?;
        tracing::info!("product restored");
        Ok(product)
    }
}

fn not_found(id: ProductId) -> DomainError {
    DomainError::not_found(format!("product {id} does not exist"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryProductStore;

    fn catalog() -> ProductCatalog<InMemoryProductStore> {
        ProductCatalog::new(InMemoryProductStore::new())
    }

    #[tokio::test]
    async fn create_normalizes_country_and_derives_sku() {
        let catalog = catalog();
        let product = catalog.create(ProductInput::new("Widget", "mx")).await.unwrap();
        assert_eq!(product.country.as_str(), "MX");
        assert_eq!(product.sku, "CT-MX-1");
        assert!(!product.is_trashed());
    }

    #[tokio::test]
    async fn create_counter_is_global_across_countries() {
        let catalog = catalog();
        catalog.create(ProductInput::new("A", "MX")).await.unwrap();
        catalog.create(ProductInput::new("B", "US")).await.unwrap();
        let third = catalog.create(ProductInput::new("C", "CA")).await.unwrap();
        assert_eq!(third.sku, "CT-CA-3");
    }

    #[tokio::test]
    async fn create_counter_includes_tombstoned_records() {
        let catalog = catalog();
        let first = catalog.create(ProductInput::new("A", "MX")).await.unwrap();
        catalog.delete(first.id).await.unwrap();
        let second = catalog.create(ProductInput::new("B", "MX")).await.unwrap();
        assert_eq!(second.sku, "CT-MX-2");
    }

    #[tokio::test]
    async fn create_rejects_blank_name_and_bad_country() {
        let catalog = catalog();
        let err = catalog.create(ProductInput::new("  ", "MX")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = catalog.create(ProductInput::new("A", "M")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_pair_conflicts_even_after_delete() {
        let catalog = catalog();
        let first = catalog.create(ProductInput::new("Widget", "MX")).await.unwrap();
        catalog.delete(first.id).await.unwrap();

        let err = catalog.create(ProductInput::new("Widget", "mx")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(err.details().unwrap()["existing_product_id"], first.id.get());
        assert_eq!(catalog.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_returns_tombstoned_records() {
        let catalog = catalog();
        let created = catalog.create(ProductInput::new("A", "MX")).await.unwrap();
        catalog.delete(created.id).await.unwrap();
        let fetched = catalog.get(created.id).await.unwrap();
        assert!(fetched.is_trashed());

        let err = catalog.get(ProductId::new(404)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_includes_tombstoned_records() {
        let catalog = catalog();
        let a = catalog.create(ProductInput::new("A", "MX")).await.unwrap();
        catalog.create(ProductInput::new("B", "MX")).await.unwrap();
        catalog.delete(a.id).await.unwrap();
        let all = catalog.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|p| p.is_trashed()).count(), 1);
    }

    #[tokio::test]
    async fn update_name_keeps_sku() {
        let catalog = catalog();
        let created = catalog.create(ProductInput::new("A", "MX")).await.unwrap();
        let updated = catalog
            .update(created.id, ProductInput::new("A2", "MX"))
            .await
            .unwrap();
        assert_eq!(updated.name, "A2");
        assert_eq!(updated.sku, created.sku);
    }

    #[tokio::test]
    async fn update_country_rewrites_sku_with_record_id() {
        let catalog = catalog();
        catalog.create(ProductInput::new("A", "MX")).await.unwrap();
        let b = catalog.create(ProductInput::new("B", "MX")).await.unwrap();
        let updated = catalog.update(b.id, ProductInput::new("B", "us")).await.unwrap();
        assert_eq!(updated.country.as_str(), "US");
        assert_eq!(updated.sku, format!("CT-US-{}", b.id));
    }

    /// Create numbers SKUs by record count while a country change numbers them by
    /// id. Pinned here so that unifying the two schemes is a visible decision.
    #[tokio::test]
    async fn sku_numbering_diverges_between_create_and_country_change() {
        let catalog = ProductCatalog::new(InMemoryProductStore::starting_at(ProductId::new(100)));
        let created = catalog.create(ProductInput::new("A", "MX")).await.unwrap();
        assert_eq!(created.id, ProductId::new(100));
        assert_eq!(created.sku, "CT-MX-1");

        let moved = catalog.update(created.id, ProductInput::new("A", "US")).await.unwrap();
        assert_eq!(moved.sku, "CT-US-100");
    }

    #[tokio::test]
    async fn update_without_changes_is_a_no_op() {
        let catalog = catalog();
        let created = catalog.create(ProductInput::new("A", "MX")).await.unwrap();
        let same = catalog.update(created.id, ProductInput::new("A", "mx")).await.unwrap();
        assert_eq!(same, created);
    }

    #[tokio::test]
    async fn update_into_taken_identity_reports_holder() {
        let catalog = catalog();
        let a = catalog.create(ProductInput::new("A", "MX")).await.unwrap();
        let b = catalog.create(ProductInput::new("B", "MX")).await.unwrap();
        catalog.delete(a.id).await.unwrap();

        let err = catalog.update(b.id, ProductInput::new("A", "MX")).await.unwrap_err();
        match err {
            DomainError::Conflict { details: Some(details), .. } => {
                assert_eq!(details["existing_product_id"], a.id.get());
                assert_eq!(details["conflict_fields"]["name"], "A");
                assert_eq!(details["conflict_fields"]["country"], "MX");
            }
            other => panic!("expected conflict with details, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn tombstoned_records_reject_update_and_delete() {
        let catalog = catalog();
        let created = catalog.create(ProductInput::new("A", "MX")).await.unwrap();
        catalog.delete(created.id).await.unwrap();

        let err = catalog
            .update(created.id, ProductInput::new("Z", "US"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = catalog.delete(created.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn missing_records_are_not_found_everywhere() {
        let catalog = catalog();
        let id = ProductId::new(7);
        for err in [
            catalog.update(id, ProductInput::new("A", "MX")).await.unwrap_err(),
            catalog.delete(id).await.unwrap_err(),
            catalog.restore(id).await.unwrap_err(),
        ] {
            assert!(matches!(err, DomainError::NotFound(_)));
        }
    }

    #[tokio::test]
    async fn restore_is_idempotent() {
        let catalog = catalog();
        let created = catalog.create(ProductInput::new("A", "MX")).await.unwrap();
        catalog.delete(created.id).await.unwrap();

        let once = catalog.restore(created.id).await.unwrap();
        let twice = catalog.restore(created.id).await.unwrap();
        assert!(!once.is_trashed());
        assert_eq!(once, twice);

        // Restored records are writable again.
        catalog
            .update(created.id, ProductInput::new("A", "CA"))
            .await
            .unwrap();
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Create(String, String),
            Update(u64, String, String),
            Delete(u64),
            Restore(u64),
        }

        fn op() -> impl Strategy<Value = Op> {
            let name = prop::sample::select(vec!["Widget", "Gadget", "Gizmo"]).prop_map(String::from);
            let country = prop::sample::select(vec!["mx", "US", "ca"]).prop_map(String::from);
            let id = 1u64..6;
            prop_oneof![
                (name.clone(), country.clone()).prop_map(|(n, c)| Op::Create(n, c)),
                (id.clone(), name, country).prop_map(|(i, n, c)| Op::Update(i, n, c)),
                id.clone().prop_map(Op::Delete),
                id.prop_map(Op::Restore),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 200,
                ..ProptestConfig::default()
            })]

            /// Property: after any sequence of operations, identities stay unique
            /// and every SKU carries the record's current country.
            #[test]
            fn invariants_hold_for_any_history(ops in prop::collection::vec(op(), 1..30)) {
                let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
                rt.block_on(async {
                    let catalog = catalog();
                    for op in ops {
                        let _ = match op {
                            Op::Create(n, c) => catalog.create(ProductInput::new(n, c)).await,
                            Op::Update(i, n, c) => {
                                catalog.update(ProductId::new(i), ProductInput::new(n, c)).await
                            }
                            Op::Delete(i) => catalog.delete(ProductId::new(i)).await,
                            Op::Restore(i) => catalog.restore(ProductId::new(i)).await,
                        };
                    }

                    let all = catalog.list().await.unwrap();
                    let mut seen = std::collections::HashSet::new();
                    for p in &all {
                        assert!(seen.insert((p.name.clone(), p.country.clone())), "duplicate {p:?}");
                        assert_eq!(sku::country_segment(&p.sku), Some(p.country.as_str()));
                    }
                });
            }

            /// Property: a deleted identity can never be created again.
            #[test]
            fn uniqueness_survives_tombstoning(name in "[A-Za-z][A-Za-z0-9 ]{0,20}", country in "[a-zA-Z]{2}") {
                let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
                rt.block_on(async {
                    let catalog = catalog();
                    let created = catalog.create(ProductInput::new(name.clone(), country.clone())).await.unwrap();
                    catalog.delete(created.id).await.unwrap();
                    let err = catalog.create(ProductInput::new(name, country)).await.unwrap_err();
                    assert!(matches!(err, DomainError::Conflict { .. }));
                });
            }
        }
    }
}
