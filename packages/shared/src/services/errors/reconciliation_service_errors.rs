use super::ErrorCategory;
use std::fmt;

#[derive(Debug)]
pub enum ReconciliationServiceError {
    RepositoryError(String),
}

impl ReconciliationServiceError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::UpstreamFailure
    }
}

impl fmt::Display for ReconciliationServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReconciliationServiceError::RepositoryError(msg) => {
                write!(f, "Reconciliation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ReconciliationServiceError {}
