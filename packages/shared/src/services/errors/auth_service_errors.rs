use super::identity_provider_errors::IdentityProviderError;
use super::user_service_errors::UserServiceError;
use super::ErrorCategory;
use std::fmt;

#[derive(Debug)]
pub enum AuthServiceError {
    UserServiceError(UserServiceError),
    IdentityProviderError(IdentityProviderError),
    InvalidCredentials,
    MissingCredentials,
    JwtError(String),
    ValidationError(String),
    InvalidToken,
    ExpiredToken,
}

impl AuthServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthServiceError::UserServiceError(err) => err.category(),
            AuthServiceError::IdentityProviderError(err) => err.category(),
            AuthServiceError::InvalidCredentials
            | AuthServiceError::MissingCredentials
            | AuthServiceError::InvalidToken
            | AuthServiceError::ExpiredToken => ErrorCategory::Unauthorized,
            AuthServiceError::ValidationError(_) => ErrorCategory::InvalidInput,
            AuthServiceError::JwtError(_) => ErrorCategory::UpstreamFailure,
        }
    }
}

impl From<UserServiceError> for AuthServiceError {
    fn from(err: UserServiceError) -> Self {
        AuthServiceError::UserServiceError(err)
    }
}

impl From<IdentityProviderError> for AuthServiceError {
    fn from(err: IdentityProviderError) -> Self {
        match err {
            IdentityProviderError::InvalidCredentials => AuthServiceError::InvalidCredentials,
            other => AuthServiceError::IdentityProviderError(other),
        }
    }
}

impl fmt::Display for AuthServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthServiceError::UserServiceError(err) => write!(f, "User service error: {}", err),
            AuthServiceError::IdentityProviderError(err) => write!(f, "{}", err),
            AuthServiceError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthServiceError::MissingCredentials => write!(f, "Missing bearer token"),
            AuthServiceError::JwtError(msg) => write!(f, "JWT error: {}", msg),
            AuthServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AuthServiceError::InvalidToken => write!(f, "Invalid JWT token"),
            AuthServiceError::ExpiredToken => write!(f, "JWT token has expired"),
        }
    }
}

impl std::error::Error for AuthServiceError {}
