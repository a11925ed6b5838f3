use super::ErrorCategory;
use std::fmt;

#[derive(Debug)]
pub enum RatingServiceError {
    RepositoryError(String),
}

impl RatingServiceError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::UpstreamFailure
    }
}

impl fmt::Display for RatingServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RatingServiceError::RepositoryError(msg) => {
                write!(f, "Failed to recompute rating: {}", msg)
            }
        }
    }
}

impl std::error::Error for RatingServiceError {}
