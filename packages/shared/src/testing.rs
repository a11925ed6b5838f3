//! In-memory stand-ins for the DynamoDB repositories and the identity
//! provider. They honour the same conditional-write rules as the real stores
//! so that services behave identically on top of them.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::favorite::Favorite;
use crate::models::game::{Game, GameDetailsUpdate, RatingSummary};
use crate::models::review::{sort_newest_first, Review};
use crate::models::user::User;
use crate::repositories::errors::favorite_repository_errors::FavoriteRepositoryError;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::errors::review_repository_errors::ReviewRepositoryError;
use crate::repositories::errors::user_repository_errors::UserRepositoryError;
use crate::repositories::favorite_repository::FavoriteRepository;
use crate::repositories::game_repository::GameRepository;
use crate::repositories::review_repository::ReviewRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::errors::identity_provider_errors::IdentityProviderError;
use crate::services::identity_provider::IdentityProvider;

#[derive(Clone, Default)]
pub struct InMemoryGameRepository {
    games: Arc<RwLock<HashMap<String, Game>>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, game: Game) {
        self.games.write().await.insert(game.game_id.clone(), game);
    }

    pub async fn find(&self, game_id: &str) -> Option<Game> {
        self.games.read().await.get(game_id).cloned()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let mut games = self.games.write().await;
        if games.contains_key(&game.game_id) {
            return Err(GameRepositoryError::AlreadyExists);
        }
        games.insert(game.game_id.clone(), game.clone());
        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Game, GameRepositoryError> {
        self.games
            .read()
            .await
            .get(game_id)
            .cloned()
            .ok_or(GameRepositoryError::NotFound)
    }

    async fn list_games(&self) -> Result<Vec<Game>, GameRepositoryError> {
        let mut games: Vec<Game> = self.games.read().await.values().cloned().collect();
        games.sort_by(|a, b| a.game_id.cmp(&b.game_id));
        Ok(games)
    }

    async fn update_game_details(
        &self,
        game_id: &str,
        update: &GameDetailsUpdate,
    ) -> Result<Game, GameRepositoryError> {
        let mut games = self.games.write().await;
        let game = games.get_mut(game_id).ok_or(GameRepositoryError::NotFound)?;
        update.apply_to(game);
        Ok(game.clone())
    }

    async fn update_rating_summary(
        &self,
        game_id: &str,
        summary: &RatingSummary,
    ) -> Result<(), GameRepositoryError> {
        let mut games = self.games.write().await;
        let game = games.get_mut(game_id).ok_or(GameRepositoryError::NotFound)?;
        game.average_rating = summary.average_rating;
        game.total_ratings = summary.total_ratings;
        Ok(())
    }

    async fn delete_game(&self, game_id: &str) -> Result<(), GameRepositoryError> {
        self.games
            .write()
            .await
            .remove(game_id)
            .map(|_| ())
            .ok_or(GameRepositoryError::NotFound)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryReviewRepository {
    reviews: Arc<RwLock<HashMap<String, Review>>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, review: Review) {
        self.reviews
            .write()
            .await
            .insert(review.review_id.clone(), review);
    }

    async fn matching<F>(&self, predicate: F) -> Vec<Review>
    where
        F: Fn(&Review) -> bool,
    {
        let mut reviews: Vec<Review> = self
            .reviews
            .read()
            .await
            .values()
            .filter(|review| predicate(review))
            .cloned()
            .collect();
        sort_newest_first(&mut reviews);
        reviews
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn create_review(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        self.insert(review.clone()).await;
        Ok(())
    }

    async fn get_review(&self, review_id: &str) -> Result<Review, ReviewRepositoryError> {
        self.reviews
            .read()
            .await
            .get(review_id)
            .cloned()
            .ok_or(ReviewRepositoryError::NotFound)
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(self.matching(|_| true).await)
    }

    async fn list_reviews_for_game(
        &self,
        game_id: &str,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(self.matching(|review| review.game_id == game_id).await)
    }

    async fn list_reviews_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(self.matching(|review| review.user_id == user_id).await)
    }

    async fn update_review_content(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut reviews = self.reviews.write().await;
        let stored = reviews
            .get_mut(&review.review_id)
            .ok_or(ReviewRepositoryError::NotFound)?;
        stored.text = review.text.clone();
        stored.rating = review.rating;
        Ok(())
    }

    async fn delete_review(&self, review_id: &str) -> Result<(), ReviewRepositoryError> {
        self.reviews
            .write()
            .await
            .remove(review_id)
            .map(|_| ())
            .ok_or(ReviewRepositoryError::NotFound)
    }

    async fn delete_reviews_for_game(&self, game_id: &str) -> Result<usize, ReviewRepositoryError> {
        let mut reviews = self.reviews.write().await;
        let before = reviews.len();
        reviews.retain(|_, review| review.game_id != game_id);
        Ok(before - reviews.len())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryFavoriteRepository {
    favorites: Arc<RwLock<HashMap<(String, String), Favorite>>>,
}

impl InMemoryFavoriteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, favorite: Favorite) {
        self.favorites.write().await.insert(
            (favorite.user_id.clone(), favorite.game_id.clone()),
            favorite,
        );
    }
}

fn pair(user_id: &str, game_id: &str) -> (String, String) {
    (user_id.to_string(), game_id.to_string())
}

#[async_trait]
impl FavoriteRepository for InMemoryFavoriteRepository {
    async fn add_favorite(&self, favorite: &Favorite) -> Result<(), FavoriteRepositoryError> {
        let mut favorites = self.favorites.write().await;
        let key = pair(&favorite.user_id, &favorite.game_id);
        if favorites.contains_key(&key) {
            return Err(FavoriteRepositoryError::AlreadyExists);
        }
        favorites.insert(key, favorite.clone());
        Ok(())
    }

    async fn get_favorite(
        &self,
        user_id: &str,
        game_id: &str,
    ) -> Result<Option<Favorite>, FavoriteRepositoryError> {
        Ok(self
            .favorites
            .read()
            .await
            .get(&pair(user_id, game_id))
            .cloned())
    }

    async fn list_favorites_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Favorite>, FavoriteRepositoryError> {
        let mut favorites: Vec<Favorite> = self
            .favorites
            .read()
            .await
            .values()
            .filter(|favorite| favorite.user_id == user_id)
            .cloned()
            .collect();
        favorites.sort_by(|a, b| a.game_id.cmp(&b.game_id));
        Ok(favorites)
    }

    async fn list_favorites(&self) -> Result<Vec<Favorite>, FavoriteRepositoryError> {
        Ok(self.favorites.read().await.values().cloned().collect())
    }

    async fn remove_favorite(
        &self,
        user_id: &str,
        game_id: &str,
    ) -> Result<(), FavoriteRepositoryError> {
        self.favorites
            .write()
            .await
            .remove(&pair(user_id, game_id))
            .map(|_| ())
            .ok_or(FavoriteRepositoryError::NotFound)
    }

    async fn delete_favorites_for_game(
        &self,
        game_id: &str,
    ) -> Result<usize, FavoriteRepositoryError> {
        let mut favorites = self.favorites.write().await;
        let before = favorites.len();
        favorites.retain(|_, favorite| favorite.game_id != game_id);
        Ok(before - favorites.len())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.user_id.clone(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.user_id) {
            return Err(UserRepositoryError::AlreadyExists);
        }
        users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<User, UserRepositoryError> {
        self.users
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or(UserRepositoryError::NotFound)
    }

    async fn update_user(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.user_id) {
            return Err(UserRepositoryError::NotFound);
        }
        users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Identity {
    user_id: String,
    email: String,
    password: String,
}

/// Identity provider keeping credentials in memory. Emails are unique across
/// identities, mirroring a pool with email as a sign-in alias.
#[derive(Clone, Default)]
pub struct InMemoryIdentityProvider {
    identities: Arc<RwLock<Vec<Identity>>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityProviderError> {
        let mut identities = self.identities.write().await;
        if identities.iter().any(|identity| identity.email == email) {
            return Err(IdentityProviderError::IdentityAlreadyExists);
        }
        if password.len() < 8 {
            return Err(IdentityProviderError::InvalidParameter(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        let user_id = Uuid::new_v4().to_string();
        identities.push(Identity {
            user_id: user_id.clone(),
            email: email.to_string(),
            password: password.to_string(),
        });
        Ok(user_id)
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityProviderError> {
        self.identities
            .read()
            .await
            .iter()
            .find(|identity| identity.email == email && identity.password == password)
            .map(|identity| identity.user_id.clone())
            .ok_or(IdentityProviderError::InvalidCredentials)
    }

    async fn update_email(&self, user_id: &str, email: &str) -> Result<(), IdentityProviderError> {
        let mut identities = self.identities.write().await;
        if identities
            .iter()
            .any(|identity| identity.email == email && identity.user_id != user_id)
        {
            return Err(IdentityProviderError::IdentityAlreadyExists);
        }
        let identity = identities
            .iter_mut()
            .find(|identity| identity.user_id == user_id)
            .ok_or_else(|| IdentityProviderError::InvalidParameter("Unknown user".to_string()))?;
        identity.email = email.to_string();
        Ok(())
    }

    async fn delete_identity(&self, user_id: &str) -> Result<(), IdentityProviderError> {
        self.identities
            .write()
            .await
            .retain(|identity| identity.user_id != user_id);
        Ok(())
    }
}
