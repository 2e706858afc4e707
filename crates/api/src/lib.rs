//! Catalog backend HTTP service: routing and request/response mapping over the
//! product lifecycle rules.

pub mod app;
pub mod config;
