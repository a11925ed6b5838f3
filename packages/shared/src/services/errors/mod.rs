pub mod auth_service_errors;
pub mod catalog_service_errors;
pub mod favorite_service_errors;
pub mod game_service_errors;
pub mod identity_provider_errors;
pub mod rating_service_errors;
pub mod reconciliation_service_errors;
pub mod review_service_errors;
pub mod user_service_errors;

use std::fmt;

/// Stable, machine-checkable classification of a failed operation. Every
/// service error maps onto exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    UpstreamFailure,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "invalid_input",
            ErrorCategory::Unauthorized => "unauthorized",
            ErrorCategory::Forbidden => "forbidden",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Conflict => "conflict",
            ErrorCategory::UpstreamFailure => "upstream_failure",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
