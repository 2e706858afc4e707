//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, build a new one. Constructors are expected to normalize and
/// validate, so a value object that exists is always well-formed.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct CountryCode(String);
///
/// impl ValueObject for CountryCode {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
