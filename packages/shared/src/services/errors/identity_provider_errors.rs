use super::ErrorCategory;
use std::fmt;

#[derive(Debug)]
pub enum IdentityProviderError {
    InvalidCredentials,
    IdentityAlreadyExists,
    InvalidParameter(String),
    ServiceError(String),
}

impl IdentityProviderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IdentityProviderError::InvalidCredentials => ErrorCategory::Unauthorized,
            IdentityProviderError::IdentityAlreadyExists => ErrorCategory::Conflict,
            IdentityProviderError::InvalidParameter(_) => ErrorCategory::InvalidInput,
            IdentityProviderError::ServiceError(_) => ErrorCategory::UpstreamFailure,
        }
    }
}

impl fmt::Display for IdentityProviderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IdentityProviderError::InvalidCredentials => write!(f, "Invalid email or password"),
            IdentityProviderError::IdentityAlreadyExists => {
                write!(f, "An account with this email already exists")
            }
            IdentityProviderError::InvalidParameter(msg) => write!(f, "Rejected by identity provider: {}", msg),
            IdentityProviderError::ServiceError(msg) => write!(f, "Identity provider error: {}", msg),
        }
    }
}

impl std::error::Error for IdentityProviderError {}
