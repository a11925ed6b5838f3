use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::favorite::responses::FavoriteGame;
use crate::models::favorite::Favorite;
use crate::models::user::Principal;
use crate::repositories::errors::favorite_repository_errors::FavoriteRepositoryError;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::favorite_repository::FavoriteRepository;
use crate::repositories::game_repository::GameRepository;
use crate::services::errors::favorite_service_errors::FavoriteServiceError;

fn map_favorite_error(err: FavoriteRepositoryError) -> FavoriteServiceError {
    match err {
        FavoriteRepositoryError::NotFound => FavoriteServiceError::FavoriteNotFound,
        FavoriteRepositoryError::AlreadyExists => FavoriteServiceError::AlreadyFavorited,
        other => FavoriteServiceError::RepositoryError(other.to_string()),
    }
}

/// A user's favorites are private to that user.
fn require_owner(principal: &Principal, user_id: &str) -> Result<(), FavoriteServiceError> {
    if principal.is(user_id) {
        Ok(())
    } else {
        Err(FavoriteServiceError::NotFavoriteOwner)
    }
}

pub struct FavoriteService {
    favorite_repository: Arc<dyn FavoriteRepository>,
    game_repository: Arc<dyn GameRepository>,
}

impl FavoriteService {
    pub fn new(
        favorite_repository: Arc<dyn FavoriteRepository>,
        game_repository: Arc<dyn GameRepository>,
    ) -> Self {
        FavoriteService {
            favorite_repository,
            game_repository,
        }
    }

    pub async fn add_favorite(
        &self,
        principal: &Principal,
        game_id: &str,
    ) -> Result<Favorite, FavoriteServiceError> {
        self.game_repository
            .get_game(game_id)
            .await
            .map_err(|e| match e {
                GameRepositoryError::NotFound => FavoriteServiceError::GameNotFound,
                other => FavoriteServiceError::RepositoryError(other.to_string()),
            })?;

        let favorite = Favorite::new(&principal.user_id, game_id);
        self.favorite_repository
            .add_favorite(&favorite)
            .await
            .map_err(map_favorite_error)?;
        debug!("{} added game {} to favorites", principal.user_id, game_id);
        Ok(favorite)
    }

    pub async fn remove_favorite(
        &self,
        principal: &Principal,
        user_id: &str,
        game_id: &str,
    ) -> Result<(), FavoriteServiceError> {
        require_owner(principal, user_id)?;
        self.favorite_repository
            .remove_favorite(user_id, game_id)
            .await
            .map_err(map_favorite_error)?;
        debug!("{} removed game {} from favorites", user_id, game_id);
        Ok(())
    }

    /// Favorites joined with their games. Favorites whose game no longer
    /// exists are skipped.
    pub async fn list_favorites(
        &self,
        principal: &Principal,
        user_id: &str,
    ) -> Result<Vec<FavoriteGame>, FavoriteServiceError> {
        require_owner(principal, user_id)?;
        let favorites = self
            .favorite_repository
            .list_favorites_for_user(user_id)
            .await
            .map_err(map_favorite_error)?;

        let mut joined = Vec::with_capacity(favorites.len());
        for favorite in favorites {
            match self.game_repository.get_game(&favorite.game_id).await {
                Ok(game) => joined.push(FavoriteGame::new(favorite, game)),
                Err(GameRepositoryError::NotFound) => {
                    warn!(
                        "Skipping favorite of {} for missing game {}",
                        favorite.user_id, favorite.game_id
                    );
                }
                Err(e) => return Err(FavoriteServiceError::RepositoryError(e.to_string())),
            }
        }
        Ok(joined)
    }

    pub async fn is_favorited(
        &self,
        principal: &Principal,
        user_id: &str,
        game_id: &str,
    ) -> Result<bool, FavoriteServiceError> {
        require_owner(principal, user_id)?;
        let favorite = self
            .favorite_repository
            .get_favorite(user_id, game_id)
            .await
            .map_err(map_favorite_error)?;
        Ok(favorite.is_some())
    }
}
