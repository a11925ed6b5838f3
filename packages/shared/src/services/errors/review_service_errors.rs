use super::rating_service_errors::RatingServiceError;
use super::ErrorCategory;
use std::fmt;

#[derive(Debug)]
pub enum ReviewServiceError {
    ValidationError(String),
    ReviewNotFound,
    GameNotFound,
    NotReviewOwner,
    RatingError(RatingServiceError),
    RepositoryError(String),
}

impl ReviewServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReviewServiceError::ValidationError(_) => ErrorCategory::InvalidInput,
            ReviewServiceError::ReviewNotFound | ReviewServiceError::GameNotFound => {
                ErrorCategory::NotFound
            }
            ReviewServiceError::NotReviewOwner => ErrorCategory::Forbidden,
            ReviewServiceError::RatingError(err) => err.category(),
            ReviewServiceError::RepositoryError(_) => ErrorCategory::UpstreamFailure,
        }
    }
}

impl From<RatingServiceError> for ReviewServiceError {
    fn from(err: RatingServiceError) -> Self {
        ReviewServiceError::RatingError(err)
    }
}

impl fmt::Display for ReviewServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReviewServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ReviewServiceError::ReviewNotFound => write!(f, "Review not found"),
            ReviewServiceError::GameNotFound => write!(f, "Game not found"),
            ReviewServiceError::NotReviewOwner => {
                write!(f, "You are not allowed to modify this review")
            }
            ReviewServiceError::RatingError(err) => write!(f, "{}", err),
            ReviewServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ReviewServiceError {}
