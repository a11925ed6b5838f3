use std::sync::Arc;

use shared::config::{AppConfig, ConfigError};
use shared::repositories::favorite_repository::FavoriteRepository;
use shared::repositories::game_repository::GameRepository;
use shared::repositories::review_repository::ReviewRepository;
use shared::repositories::user_repository::UserRepository;
use shared::services::auth_service::AuthService;
use shared::services::catalog_service::CatalogService;
use shared::services::favorite_service::FavoriteService;
use shared::services::game_service::GameService;
use shared::services::identity_provider::IdentityProvider;
use shared::services::rating_service::RatingService;
use shared::services::review_service::ReviewService;
use shared::services::user_service::UserService;

/// Storage backends the services are wired onto.
pub struct Repositories {
    pub games: Arc<dyn GameRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub users: Arc<dyn UserRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub catalog_service: Arc<CatalogService>,
    pub game_service: Arc<GameService>,
    pub review_service: Arc<ReviewService>,
    pub favorite_service: Arc<FavoriteService>,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        identity_provider: Arc<dyn IdentityProvider>,
        config: &AppConfig,
    ) -> Result<Self, ConfigError> {
        let Repositories {
            games,
            reviews,
            favorites,
            users,
        } = repositories;

        let user_service = Arc::new(UserService::new(
            users,
            identity_provider.clone(),
            config.allow_admin_signup,
        ));
        let auth_service = Arc::new(AuthService::new(
            user_service.clone(),
            identity_provider,
            config.jwt_secret()?.to_string(),
            config.token_ttl_hours,
        ));
        let rating_service = Arc::new(RatingService::new(reviews.clone(), games.clone()));

        Ok(AppState {
            auth_service,
            user_service,
            catalog_service: Arc::new(CatalogService::new(games.clone())),
            game_service: Arc::new(GameService::new(
                games.clone(),
                reviews.clone(),
                favorites.clone(),
                config.max_image_base64_len,
            )),
            review_service: Arc::new(ReviewService::new(reviews, games.clone(), rating_service)),
            favorite_service: Arc::new(FavoriteService::new(favorites, games)),
        })
    }
}
