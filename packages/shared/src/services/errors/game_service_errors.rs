use super::ErrorCategory;
use std::fmt;

#[derive(Debug)]
pub enum GameServiceError {
    ValidationError(String),
    GameNotFound,
    GameAlreadyExists,
    AdminRequired,
    RepositoryError(String),
}

impl GameServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GameServiceError::ValidationError(_) => ErrorCategory::InvalidInput,
            GameServiceError::GameNotFound => ErrorCategory::NotFound,
            GameServiceError::GameAlreadyExists => ErrorCategory::Conflict,
            GameServiceError::AdminRequired => ErrorCategory::Forbidden,
            GameServiceError::RepositoryError(_) => ErrorCategory::UpstreamFailure,
        }
    }
}

impl fmt::Display for GameServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            GameServiceError::GameNotFound => write!(f, "Game not found"),
            GameServiceError::GameAlreadyExists => write!(f, "A game with this id already exists"),
            GameServiceError::AdminRequired => write!(f, "Only administrators can manage games"),
            GameServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for GameServiceError {}
