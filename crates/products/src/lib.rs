//! Products domain module.
//!
//! Business rules for the product catalog: country normalization, SKU
//! derivation, the soft-delete lifecycle and (name, country) uniqueness. Storage
//! sits behind the [`ProductStore`] contract so the rules can be exercised
//! against the in-memory store in tests and Postgres in production.

pub mod catalog;
pub mod country;
pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod product;
pub mod sku;
pub mod store;

pub use catalog::{ProductCatalog, ProductInput};
pub use country::CountryCode;
pub use in_memory::InMemoryProductStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresProductStore;
pub use product::{NewProduct, Product};
pub use store::ProductStore;
