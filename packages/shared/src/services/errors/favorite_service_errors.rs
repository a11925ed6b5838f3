use super::ErrorCategory;
use std::fmt;

#[derive(Debug)]
pub enum FavoriteServiceError {
    GameNotFound,
    FavoriteNotFound,
    AlreadyFavorited,
    NotFavoriteOwner,
    RepositoryError(String),
}

impl FavoriteServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FavoriteServiceError::GameNotFound | FavoriteServiceError::FavoriteNotFound => {
                ErrorCategory::NotFound
            }
            FavoriteServiceError::AlreadyFavorited => ErrorCategory::Conflict,
            FavoriteServiceError::NotFavoriteOwner => ErrorCategory::Forbidden,
            FavoriteServiceError::RepositoryError(_) => ErrorCategory::UpstreamFailure,
        }
    }
}

impl fmt::Display for FavoriteServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FavoriteServiceError::GameNotFound => write!(f, "Game not found"),
            FavoriteServiceError::FavoriteNotFound => write!(f, "Favorite not found"),
            FavoriteServiceError::AlreadyFavorited => write!(f, "Game is already in favorites"),
            FavoriteServiceError::NotFavoriteOwner => {
                write!(f, "Favorites can only be managed by their owner")
            }
            FavoriteServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for FavoriteServiceError {}
