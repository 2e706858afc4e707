//! SKU derivation.
//!
//! SKUs look like `CT-<COUNTRY>-<N>`. Two numbering schemes coexist and are kept
//! apart on purpose:
//!
//! - at creation, `N` is the number of records ever stored (tombstoned ones
//!   included) before the insert, plus one;
//! - after a country change, `N` is the record's own id.
//!
//! The two agree only while ids and creation order stay in lockstep.

use catalog_core::ProductId;

use crate::country::CountryCode;

pub const SKU_PREFIX: &str = "CT";

/// SKU for a record about to be inserted, given the current record count.
pub fn for_new_product(country: &CountryCode, existing_records: u64) -> String {
    format!("{SKU_PREFIX}-{country}-{}", existing_records + 1)
}

/// SKU for an existing record whose country changed.
pub fn for_country_change(country: &CountryCode, id: ProductId) -> String {
    format!("{SKU_PREFIX}-{country}-{id}")
}

/// Country segment of a SKU, if it has the expected shape.
pub fn country_segment(sku: &str) -> Option<&str> {
    let mut parts = sku.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(SKU_PREFIX), Some(country), Some(_)) => Some(country),
        _ => None,
    }
}
