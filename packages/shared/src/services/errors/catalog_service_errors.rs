use super::ErrorCategory;
use std::fmt;

#[derive(Debug)]
pub enum CatalogServiceError {
    ValidationError(String),
    RepositoryError(String),
}

impl CatalogServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogServiceError::ValidationError(_) => ErrorCategory::InvalidInput,
            CatalogServiceError::RepositoryError(_) => ErrorCategory::UpstreamFailure,
        }
    }
}

impl fmt::Display for CatalogServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            CatalogServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogServiceError {}
