use super::identity_provider_errors::IdentityProviderError;
use super::ErrorCategory;
use std::fmt;

#[derive(Debug)]
pub enum UserServiceError {
    ValidationError(String),
    UserNotFound,
    UserAlreadyExists,
    NotProfileOwner,
    IdentityProviderError(IdentityProviderError),
    RepositoryError(String),
}

impl UserServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            UserServiceError::ValidationError(_) => ErrorCategory::InvalidInput,
            UserServiceError::UserNotFound => ErrorCategory::NotFound,
            UserServiceError::UserAlreadyExists => ErrorCategory::Conflict,
            UserServiceError::NotProfileOwner => ErrorCategory::Forbidden,
            UserServiceError::IdentityProviderError(err) => err.category(),
            UserServiceError::RepositoryError(_) => ErrorCategory::UpstreamFailure,
        }
    }
}

impl From<IdentityProviderError> for UserServiceError {
    fn from(err: IdentityProviderError) -> Self {
        UserServiceError::IdentityProviderError(err)
    }
}

impl fmt::Display for UserServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UserServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            UserServiceError::UserNotFound => write!(f, "User not found"),
            UserServiceError::UserAlreadyExists => write!(f, "User already exists"),
            UserServiceError::NotProfileOwner => {
                write!(f, "Profiles can only be updated by their owner")
            }
            UserServiceError::IdentityProviderError(err) => write!(f, "{}", err),
            UserServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for UserServiceError {}
