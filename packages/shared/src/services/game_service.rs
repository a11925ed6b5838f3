use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::game::requests::{CreateGameRequest, UpdateGameRequest};
use crate::models::game::responses::{GameDeletionResponse, GameDetailsResponse};
use crate::models::game::{Game, GameDetailsUpdate, ReleaseStatus};
use crate::models::user::Principal;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::favorite_repository::FavoriteRepository;
use crate::repositories::game_repository::GameRepository;
use crate::repositories::review_repository::ReviewRepository;
use crate::services::errors::game_service_errors::GameServiceError;

pub struct GameService {
    game_repository: Arc<dyn GameRepository>,
    review_repository: Arc<dyn ReviewRepository>,
    favorite_repository: Arc<dyn FavoriteRepository>,
    max_image_base64_len: usize,
}

fn map_game_error(err: GameRepositoryError) -> GameServiceError {
    match err {
        GameRepositoryError::NotFound => GameServiceError::GameNotFound,
        GameRepositoryError::AlreadyExists => GameServiceError::GameAlreadyExists,
        other => GameServiceError::RepositoryError(other.to_string()),
    }
}

fn require_admin(principal: &Principal) -> Result<(), GameServiceError> {
    if principal.administrator {
        Ok(())
    } else {
        Err(GameServiceError::AdminRequired)
    }
}

fn required_text(field: &str, value: &str) -> Result<String, GameServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GameServiceError::ValidationError(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(value.to_string())
}

fn parse_release_date(value: &str) -> Result<NaiveDate, GameServiceError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        GameServiceError::ValidationError(format!(
            "releaseDate must be a YYYY-MM-DD date, got '{}'",
            value
        ))
    })
}

fn parse_status(value: &str) -> Result<ReleaseStatus, GameServiceError> {
    value.parse().map_err(GameServiceError::ValidationError)
}

impl GameService {
    pub fn new(
        game_repository: Arc<dyn GameRepository>,
        review_repository: Arc<dyn ReviewRepository>,
        favorite_repository: Arc<dyn FavoriteRepository>,
        max_image_base64_len: usize,
    ) -> Self {
        GameService {
            game_repository,
            review_repository,
            favorite_repository,
            max_image_base64_len,
        }
    }

    fn check_image(&self, image_base64: &str) -> Result<(), GameServiceError> {
        if image_base64.len() > self.max_image_base64_len {
            return Err(GameServiceError::ValidationError(format!(
                "Image is too large ({} characters, limit {})",
                image_base64.len(),
                self.max_image_base64_len
            )));
        }
        Ok(())
    }

    pub async fn create_game(
        &self,
        principal: &Principal,
        request: CreateGameRequest,
    ) -> Result<Game, GameServiceError> {
        require_admin(principal)?;

        let game_id = required_text("gameId", &request.game_id)?;
        let title = required_text("title", &request.title)?;
        let release_date = parse_release_date(&request.release_date)?;
        let status = parse_status(&request.status)?;
        self.check_image(&request.image_base64)?;

        let mut game = Game::new(&game_id, &title, release_date, status);
        game.description = request.description;
        game.platform = request.platform;
        game.genre = request.genre;
        game.image_base64 = request.image_base64;

        self.game_repository
            .create_game(&game)
            .await
            .map_err(map_game_error)?;
        info!("Game {} created by {}", game.game_id, principal.user_id);
        Ok(game)
    }

    pub async fn get_game(&self, game_id: &str) -> Result<Game, GameServiceError> {
        self.game_repository
            .get_game(game_id)
            .await
            .map_err(map_game_error)
    }

    /// The game together with its reviews, newest first.
    pub async fn get_game_with_reviews(
        &self,
        game_id: &str,
    ) -> Result<GameDetailsResponse, GameServiceError> {
        let game = self.get_game(game_id).await?;
        let reviews = self
            .review_repository
            .list_reviews_for_game(game_id)
            .await
            .map_err(|e| GameServiceError::RepositoryError(e.to_string()))?;
        Ok(GameDetailsResponse { game, reviews })
    }

    /// Partial update of the admin-editable fields. The rating aggregate is
    /// never part of the write.
    pub async fn update_game(
        &self,
        principal: &Principal,
        game_id: &str,
        request: UpdateGameRequest,
    ) -> Result<Game, GameServiceError> {
        require_admin(principal)?;

        let update = GameDetailsUpdate {
            title: request
                .title
                .as_deref()
                .map(|title| required_text("title", title))
                .transpose()?,
            description: request.description,
            platform: request.platform,
            genre: request.genre,
            release_date: request
                .release_date
                .as_deref()
                .map(parse_release_date)
                .transpose()?,
            status: request.status.as_deref().map(parse_status).transpose()?,
            image_base64: request.image_base64,
        };
        if let Some(image_base64) = &update.image_base64 {
            self.check_image(image_base64)?;
        }

        let game = self
            .game_repository
            .update_game_details(game_id, &update)
            .await
            .map_err(map_game_error)?;
        debug!("Game {} updated by {}", game_id, principal.user_id);
        Ok(game)
    }

    /// Removes the game's reviews, then its favorites, then the game itself.
    /// The steps are not atomic; a failure part-way leaves orphans for the
    /// reconciliation sweep.
    pub async fn delete_game(
        &self,
        principal: &Principal,
        game_id: &str,
    ) -> Result<GameDeletionResponse, GameServiceError> {
        require_admin(principal)?;
        self.get_game(game_id).await?;

        let reviews_deleted = self
            .review_repository
            .delete_reviews_for_game(game_id)
            .await
            .map_err(|e| GameServiceError::RepositoryError(e.to_string()))?;
        let favorites_deleted = self
            .favorite_repository
            .delete_favorites_for_game(game_id)
            .await
            .map_err(|e| GameServiceError::RepositoryError(e.to_string()))?;
        self.game_repository
            .delete_game(game_id)
            .await
            .map_err(map_game_error)?;

        info!(
            "Game {} deleted with {} reviews and {} favorites",
            game_id, reviews_deleted, favorites_deleted
        );
        Ok(GameDeletionResponse {
            game_id: game_id.to_string(),
            reviews_deleted,
            favorites_deleted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::favorite::Favorite;
    use crate::models::review::Review;
    use crate::repositories::errors::review_repository_errors::ReviewRepositoryError;
    use crate::repositories::favorite_repository::MockFavoriteRepository;
    use crate::repositories::game_repository::MockGameRepository;
    use crate::repositories::review_repository::MockReviewRepository;
    use crate::testing::{InMemoryFavoriteRepository, InMemoryGameRepository, InMemoryReviewRepository};

    struct Fixture {
        games: InMemoryGameRepository,
        reviews: InMemoryReviewRepository,
        favorites: InMemoryFavoriteRepository,
        service: GameService,
    }

    fn fixture() -> Fixture {
        let games = InMemoryGameRepository::new();
        let reviews = InMemoryReviewRepository::new();
        let favorites = InMemoryFavoriteRepository::new();
        let service = GameService::new(
            Arc::new(games.clone()),
            Arc::new(reviews.clone()),
            Arc::new(favorites.clone()),
            16,
        );
        Fixture {
            games,
            reviews,
            favorites,
            service,
        }
    }

    fn admin() -> Principal {
        Principal::new("admin-1", true)
    }

    fn create_request(game_id: &str) -> CreateGameRequest {
        CreateGameRequest {
            game_id: game_id.to_string(),
            title: "Elden Ring".to_string(),
            description: "Open world".to_string(),
            platform: "PC".to_string(),
            genre: "Action RPG".to_string(),
            release_date: "2022-02-25".to_string(),
            status: "released".to_string(),
            image_base64: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_game_starts_with_zero_aggregate() {
        let fx = fixture();

        let game = fx.service.create_game(&admin(), create_request("g1")).await.unwrap();

        assert_eq!(game.status, ReleaseStatus::Released);
        assert_eq!(game.average_rating, 0.0);
        assert_eq!(fx.games.find("g1").await.unwrap().title, "Elden Ring");
    }

    #[tokio::test]
    async fn test_create_game_requires_admin() {
        let fx = fixture();
        let player = Principal::new("u1", false);

        let result = fx.service.create_game(&player, create_request("g1")).await;

        assert!(matches!(result, Err(GameServiceError::AdminRequired)));
        assert!(fx.games.find("g1").await.is_none());
    }

    #[tokio::test]
    async fn test_create_game_rejects_duplicate_id() {
        let fx = fixture();
        fx.service.create_game(&admin(), create_request("g1")).await.unwrap();

        let result = fx.service.create_game(&admin(), create_request("g1")).await;
        assert!(matches!(result, Err(GameServiceError::GameAlreadyExists)));
    }

    #[tokio::test]
    async fn test_create_game_validates_fields() {
        let fx = fixture();

        let mut bad_date = create_request("g1");
        bad_date.release_date = "25/02/2022".to_string();
        let mut bad_status = create_request("g2");
        bad_status.status = "archived".to_string();
        let mut big_image = create_request("g3");
        big_image.image_base64 = "A".repeat(17);
        let mut no_title = create_request("g4");
        no_title.title = "  ".to_string();

        for request in [bad_date, bad_status, big_image, no_title] {
            let result = fx.service.create_game(&admin(), request).await;
            assert!(matches!(result, Err(GameServiceError::ValidationError(_))));
        }
    }

    #[tokio::test]
    async fn test_update_is_partial_and_keeps_aggregate() {
        let fx = fixture();
        fx.service.create_game(&admin(), create_request("g1")).await.unwrap();
        let mut stored = fx.games.find("g1").await.unwrap();
        stored.average_rating = 4.5;
        stored.total_ratings = 2;
        fx.games.insert(stored).await;

        let request = UpdateGameRequest {
            title: Some("Elden Ring: Nightreign".to_string()),
            status: Some("upcoming".to_string()),
            ..Default::default()
        };
        let game = fx.service.update_game(&admin(), "g1", request).await.unwrap();

        assert_eq!(game.title, "Elden Ring: Nightreign");
        assert_eq!(game.status, ReleaseStatus::Upcoming);
        assert_eq!(game.platform, "PC");
        assert_eq!(game.average_rating, 4.5);
        assert_eq!(game.total_ratings, 2);
    }

    #[tokio::test]
    async fn test_update_missing_game_is_not_found() {
        let fx = fixture();

        let result = fx
            .service
            .update_game(&admin(), "nope", UpdateGameRequest::default())
            .await;
        assert!(matches!(result, Err(GameServiceError::GameNotFound)));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_reviews_and_favorites() {
        let fx = fixture();
        fx.service.create_game(&admin(), create_request("g1")).await.unwrap();
        fx.service.create_game(&admin(), create_request("g2")).await.unwrap();
        fx.reviews.insert(Review::new("u1", "g1", None, Some(5))).await;
        fx.reviews.insert(Review::new("u2", "g1", Some("meh".to_string()), None)).await;
        fx.reviews.insert(Review::new("u1", "g2", None, Some(3))).await;
        fx.favorites.insert(Favorite::new("u1", "g1")).await;
        fx.favorites.insert(Favorite::new("u1", "g2")).await;

        let deletion = fx.service.delete_game(&admin(), "g1").await.unwrap();

        assert_eq!(deletion.reviews_deleted, 2);
        assert_eq!(deletion.favorites_deleted, 1);
        assert!(matches!(
            fx.service.get_game("g1").await,
            Err(GameServiceError::GameNotFound)
        ));
        assert!(fx.reviews.list_reviews_for_game("g1").await.unwrap().is_empty());
        assert_eq!(fx.reviews.list_reviews_for_game("g2").await.unwrap().len(), 1);
        assert!(fx.favorites.get_favorite("u1", "g1").await.unwrap().is_none());
        assert!(fx.favorites.get_favorite("u1", "g2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_game_is_not_found() {
        let fx = fixture();

        let result = fx.service.delete_game(&admin(), "ghost").await;
        assert!(matches!(result, Err(GameServiceError::GameNotFound)));
    }

    #[tokio::test]
    async fn test_delete_stops_when_review_cascade_fails() {
        let mut games = MockGameRepository::new();
        games
            .expect_get_game()
            .returning(|id| Ok(Game::new(id, "Doomed", NaiveDate::MIN, ReleaseStatus::Released)));
        games.expect_delete_game().never();
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_delete_reviews_for_game()
            .returning(|_| Err(ReviewRepositoryError::DynamoDb("3 of 30 deletes unprocessed".to_string())));
        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_delete_favorites_for_game().never();

        let service = GameService::new(Arc::new(games), Arc::new(reviews), Arc::new(favorites), 16);
        let result = service.delete_game(&admin(), "g1").await;

        assert!(matches!(result, Err(GameServiceError::RepositoryError(_))));
    }

    #[tokio::test]
    async fn test_game_details_include_reviews_newest_first() {
        let fx = fixture();
        fx.service.create_game(&admin(), create_request("g1")).await.unwrap();
        let mut older = Review::new("u1", "g1", None, Some(4));
        older.date_time_posted = older.date_time_posted - chrono::Duration::hours(1);
        let newer = Review::new("u2", "g1", None, Some(2));
        fx.reviews.insert(older.clone()).await;
        fx.reviews.insert(newer.clone()).await;

        let details = fx.service.get_game_with_reviews("g1").await.unwrap();

        assert_eq!(details.game.game_id, "g1");
        assert_eq!(details.reviews[0].review_id, newer.review_id);
        assert_eq!(details.reviews[1].review_id, older.review_id);
    }
}
