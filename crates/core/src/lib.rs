//! `catalog-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog backend
//! and the gateway (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod kind;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use kind::ErrorKind;
pub use value_object::ValueObject;
