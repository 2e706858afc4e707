//! Error taxonomy shared by every layer that talks to clients.

use serde::{Deserialize, Serialize};

/// Fixed set of failure kinds surfaced to callers.
///
/// Both the catalog backend and the gateway classify their failures into one of
/// these. Each kind has a canonical HTTP status; the gateway may still relay a
/// different upstream status verbatim, in which case the kind is derived from it
/// with [`ErrorKind::from_status`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    NotFound,
    Conflict,
    Forbidden,
    ServiceUnavailable,
    GatewayTimeout,
    InternalError,
}

impl ErrorKind {
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::ValidationError => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Forbidden => 403,
            ErrorKind::ServiceUnavailable => 503,
            ErrorKind::GatewayTimeout => 504,
            ErrorKind::InternalError => 500,
        }
    }

    /// Stable machine-readable code (`"not_found"`, `"conflict"`, ...).
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::ServiceUnavailable => "service_unavailable",
            ErrorKind::GatewayTimeout => "gateway_timeout",
            ErrorKind::InternalError => "internal_error",
        }
    }

    /// Classify an arbitrary HTTP error status.
    ///
    /// Any 4xx without a dedicated kind counts as a validation failure; anything
    /// else unrecognised is internal.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            401 | 403 => ErrorKind::Forbidden,
            503 | 502 => ErrorKind::ServiceUnavailable,
            504 => ErrorKind::GatewayTimeout,
            400..=499 => ErrorKind::ValidationError,
            _ => ErrorKind::InternalError,
        }
    }

    pub fn is_server_error(self) -> bool {
        self.status_code() >= 500
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_statuses_round_trip_through_from_status() {
        for kind in [
            ErrorKind::ValidationError,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::Forbidden,
            ErrorKind::ServiceUnavailable,
            ErrorKind::GatewayTimeout,
            ErrorKind::InternalError,
        ] {
            assert_eq!(ErrorKind::from_status(kind.status_code()), kind);
        }
    }

    #[test]
    fn unprocessable_entity_is_a_validation_failure() {
        assert_eq!(ErrorKind::from_status(422), ErrorKind::ValidationError);
        assert_eq!(ErrorKind::from_status(418), ErrorKind::ValidationError);
        assert_eq!(ErrorKind::from_status(599), ErrorKind::InternalError);
    }
}
