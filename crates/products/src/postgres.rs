//! Postgres-backed product store.
//!
//! Expects a `products` table shaped like:
//!
//! ```sql
//! CREATE TABLE products (
//!     id          BIGSERIAL PRIMARY KEY,
//!     name        TEXT NOT NULL,
//!     country     CHAR(2) NOT NULL,
//!     sku         TEXT NOT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     deleted_at  TIMESTAMPTZ NULL,
//!     UNIQUE (name, country)
//! );
//! ```
//!
//! The unique index is the store-level guard against the check-then-write race
//! in the catalog. Schema management lives outside this crate.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use catalog_core::{DomainError, DomainResult, ProductId};

use crate::country::CountryCode;
use crate::product::{NewProduct, Product};
use crate::store::ProductStore;

const COLUMNS: &str = "id, name, country, sku, created_at, updated_at, deleted_at";

/// Product store on a SQLx connection pool (thread-safe, shareable).
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect a pool to `database_url`.
    pub async fn connect(database_url: &str) -> DomainResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| DomainError::storage(format!("connect: {e}")))?;
        Ok(Self::new(pool))
    }
}

fn db_id(id: ProductId) -> DomainResult<i64> {
    i64::try_from(id.get()).map_err(|_| DomainError::invalid_id(format!("ProductId out of range: {id}")))
}

fn row_to_product(row: &PgRow) -> DomainResult<Product> {
    let map = |e: sqlx::Error| DomainError::storage(format!("decode products row: {e}"));

    let id: i64 = row.try_get("id").map_err(map)?;
    let country: String = row.try_get("country").map_err(map)?;
    Ok(Product {
        id: ProductId::new(
            u64::try_from(id).map_err(|_| DomainError::storage(format!("negative product id {id}")))?,
        ),
        name: row.try_get("name").map_err(map)?,
        country: CountryCode::normalize(&country)?,
        sku: row.try_get("sku").map_err(map)?,
        created_at: row.try_get("created_at").map_err(map)?,
        updated_at: row.try_get("updated_at").map_err(map)?,
        deleted_at: row.try_get("deleted_at").map_err(map)?,
    })
}

fn write_error(op: &str, err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::conflict("a product with the same name and country already exists")
        }
        _ => DomainError::storage(format!("{op}: {err}")),
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn list(&self) -> DomainResult<Vec<Product>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM products ORDER BY id"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("list products: {e}")))?;
        rows.iter().map(row_to_product).collect()
    }

    async fn get(&self, id: ProductId) -> DomainResult<Option<Product>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
            .bind(db_id(id)?)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("get product: {e}")))?;
        row.as_ref().map(row_to_product).transpose()
    }

    async fn find_by_identity(
        &self,
        name: &str,
        country: &CountryCode,
        excluding: Option<ProductId>,
    ) -> DomainResult<Option<Product>> {
        let excluding = excluding.map(db_id).transpose()?;
        let row = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS} FROM products
            WHERE name = $1 AND country = $2 AND ($3::BIGINT IS NULL OR id <> $3)
            LIMIT 1
            "#
        ))
        .bind(name)
        .bind(country.as_str())
        .bind(excluding)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("find product by identity: {e}")))?;
        row.as_ref().map(row_to_product).transpose()
    }

    async fn count(&self) -> DomainResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("count products: {e}")))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn insert(&self, draft: NewProduct) -> DomainResult<Product> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (name, country, sku, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&draft.name)
        .bind(draft.country.as_str())
        .bind(&draft.sku)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| write_error("insert product", e))?;
        row_to_product(&row)
    }

    async fn update(&self, product: &Product) -> DomainResult<Product> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET name = $2, country = $3, sku = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(db_id(product.id)?)
        .bind(&product.name)
        .bind(product.country.as_str())
        .bind(&product.sku)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| write_error("update product", e))?;
        match row {
            Some(row) => row_to_product(&row),
            None => Err(DomainError::not_found(format!("product {} does not exist", product.id))),
        }
    }

    async fn soft_delete(&self, id: ProductId, at: DateTime<Utc>) -> DomainResult<Product> {
        self.set_tombstone(id, Some(at)).await
    }

    async fn restore(&self, id: ProductId) -> DomainResult<Product> {
        self.set_tombstone(id, None).await
    }
}

impl PostgresProductStore {
    async fn set_tombstone(&self, id: ProductId, at: Option<DateTime<Utc>>) -> DomainResult<Product> {
        let row = sqlx::query(&format!(
            "UPDATE products SET deleted_at = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(db_id(id)?)
        .bind(at)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("set tombstone: {e}")))?;
        match row {
            Some(row) => row_to_product(&row),
            None => Err(DomainError::not_found(format!("product {id} does not exist"))),
        }
    }
}
