use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, ValueObject};

/// Two-letter uppercase country code.
///
/// Built with [`CountryCode::normalize`], which keeps the first two characters
/// of the raw input and uppercases them, so `"mex"` becomes `"ME"` and `"mx"`
/// becomes `"MX"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn normalize(raw: &str) -> Result<Self, DomainError> {
        let head: String = raw.trim().chars().take(2).collect();
        if head.chars().count() != 2 || !head.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation(
                "country must start with two letters",
            ));
        }
        Ok(Self(head.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for CountryCode {}

impl core::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}
