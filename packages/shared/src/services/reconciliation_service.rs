use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::repositories::errors::favorite_repository_errors::FavoriteRepositoryError;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::favorite_repository::FavoriteRepository;
use crate::repositories::game_repository::GameRepository;
use crate::repositories::review_repository::ReviewRepository;
use crate::services::errors::reconciliation_service_errors::ReconciliationServiceError;
use crate::services::rating_service::compute_rating_summary;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub games_checked: usize,
    pub aggregates_corrected: usize,
    pub orphan_reviews_deleted: usize,
    pub orphan_favorites_deleted: usize,
}

/// Repairs what the non-transactional write paths can leave behind: stale
/// aggregates, and reviews or favorites pointing at deleted games. Running it
/// twice in a row changes nothing the second time.
pub struct ReconciliationService {
    game_repository: Arc<dyn GameRepository>,
    review_repository: Arc<dyn ReviewRepository>,
    favorite_repository: Arc<dyn FavoriteRepository>,
}

impl ReconciliationService {
    pub fn new(
        game_repository: Arc<dyn GameRepository>,
        review_repository: Arc<dyn ReviewRepository>,
        favorite_repository: Arc<dyn FavoriteRepository>,
    ) -> Self {
        ReconciliationService {
            game_repository,
            review_repository,
            favorite_repository,
        }
    }

    pub async fn reconcile(&self) -> Result<ReconciliationReport, ReconciliationServiceError> {
        let mut report = ReconciliationReport::default();

        let games = self
            .game_repository
            .list_games()
            .await
            .map_err(|e| ReconciliationServiceError::RepositoryError(e.to_string()))?;
        let game_ids: HashSet<&str> = games.iter().map(|game| game.game_id.as_str()).collect();

        for game in &games {
            report.games_checked += 1;
            let reviews = self
                .review_repository
                .list_reviews_for_game(&game.game_id)
                .await
                .map_err(|e| ReconciliationServiceError::RepositoryError(e.to_string()))?;
            let summary = compute_rating_summary(&reviews);
            if summary == game.rating_summary() {
                continue;
            }

            warn!(
                "Game {} aggregate was {}/{}, recomputed {}/{}",
                game.game_id,
                game.average_rating,
                game.total_ratings,
                summary.average_rating,
                summary.total_ratings
            );
            self.game_repository
                .update_rating_summary(&game.game_id, &summary)
                .await
                .map_err(|e| ReconciliationServiceError::RepositoryError(e.to_string()))?;
            report.aggregates_corrected += 1;
        }

        // Games created after the scan above are not in `game_ids`, so every
        // candidate orphan is checked again before anything is deleted.
        let mut missing_games: HashMap<String, bool> = HashMap::new();

        let reviews = self
            .review_repository
            .list_reviews()
            .await
            .map_err(|e| ReconciliationServiceError::RepositoryError(e.to_string()))?;
        let candidate_games: HashSet<&str> = reviews
            .iter()
            .map(|review| review.game_id.as_str())
            .filter(|game_id| !game_ids.contains(game_id))
            .collect();
        for game_id in candidate_games {
            if !self.is_missing(game_id, &mut missing_games).await? {
                continue;
            }
            report.orphan_reviews_deleted += self
                .review_repository
                .delete_reviews_for_game(game_id)
                .await
                .map_err(|e| ReconciliationServiceError::RepositoryError(e.to_string()))?;
        }

        let favorites = self
            .favorite_repository
            .list_favorites()
            .await
            .map_err(|e| ReconciliationServiceError::RepositoryError(e.to_string()))?;
        for favorite in favorites
            .iter()
            .filter(|favorite| !game_ids.contains(favorite.game_id.as_str()))
        {
            if !self.is_missing(&favorite.game_id, &mut missing_games).await? {
                continue;
            }
            match self
                .favorite_repository
                .remove_favorite(&favorite.user_id, &favorite.game_id)
                .await
            {
                Ok(()) => report.orphan_favorites_deleted += 1,
                Err(FavoriteRepositoryError::NotFound) => {
                    debug!(
                        "Favorite {} already removed",
                        favorite.favorite_id()
                    );
                }
                Err(e) => return Err(ReconciliationServiceError::RepositoryError(e.to_string())),
            }
        }

        info!(
            "Reconciled {} games: {} aggregates corrected, {} orphan reviews and {} orphan favorites removed",
            report.games_checked,
            report.aggregates_corrected,
            report.orphan_reviews_deleted,
            report.orphan_favorites_deleted
        );
        Ok(report)
    }

    async fn is_missing(
        &self,
        game_id: &str,
        checked: &mut HashMap<String, bool>,
    ) -> Result<bool, ReconciliationServiceError> {
        if let Some(missing) = checked.get(game_id) {
            return Ok(*missing);
        }
        let missing = match self.game_repository.get_game(game_id).await {
            Ok(_) => {
                debug!("Game {} appeared during the sweep, keeping its records", game_id);
                false
            }
            Err(GameRepositoryError::NotFound) => true,
            Err(e) => return Err(ReconciliationServiceError::RepositoryError(e.to_string())),
        };
        checked.insert(game_id.to_string(), missing);
        Ok(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::favorite::Favorite;
    use crate::models::game::{Game, ReleaseStatus};
    use crate::models::review::Review;
    use crate::repositories::favorite_repository::MockFavoriteRepository;
    use crate::repositories::game_repository::MockGameRepository;
    use crate::testing::{InMemoryFavoriteRepository, InMemoryGameRepository, InMemoryReviewRepository};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_reconcile_repairs_and_is_idempotent() {
        let games = InMemoryGameRepository::new();
        let reviews = InMemoryReviewRepository::new();
        let favorites = InMemoryFavoriteRepository::new();

        let mut stale = Game::new(
            "g1",
            "Stale",
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            ReleaseStatus::Released,
        );
        stale.average_rating = 1.0;
        stale.total_ratings = 9;
        games.insert(stale).await;
        reviews.insert(Review::new("u1", "g1", None, Some(5))).await;
        reviews.insert(Review::new("u2", "g1", None, Some(4))).await;
        reviews.insert(Review::new("u1", "gone", None, Some(2))).await;
        favorites.insert(Favorite::new("u1", "g1")).await;
        favorites.insert(Favorite::new("u1", "gone")).await;

        let service = ReconciliationService::new(
            Arc::new(games.clone()),
            Arc::new(reviews.clone()),
            Arc::new(favorites.clone()),
        );

        let report = service.reconcile().await.unwrap();
        assert_eq!(
            report,
            ReconciliationReport {
                games_checked: 1,
                aggregates_corrected: 1,
                orphan_reviews_deleted: 1,
                orphan_favorites_deleted: 1,
            }
        );
        let repaired = games.find("g1").await.unwrap();
        assert_eq!(repaired.average_rating, 4.5);
        assert_eq!(repaired.total_ratings, 2);
        assert_eq!(reviews.list_reviews().await.unwrap().len(), 2);
        assert_eq!(favorites.list_favorites().await.unwrap().len(), 1);

        let second = service.reconcile().await.unwrap();
        assert_eq!(second.aggregates_corrected, 0);
        assert_eq!(second.orphan_reviews_deleted, 0);
        assert_eq!(second.orphan_favorites_deleted, 0);
    }

    #[tokio::test]
    async fn test_records_of_game_created_mid_sweep_are_kept() {
        let mut games = MockGameRepository::new();
        games.expect_list_games().returning(|| Ok(vec![]));
        games
            .expect_get_game()
            .withf(|id| id == "new")
            .returning(|id| {
                Ok(Game::new(
                    id,
                    "Fresh",
                    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                    ReleaseStatus::Upcoming,
                ))
            });
        let reviews = InMemoryReviewRepository::new();
        reviews.insert(Review::new("u1", "new", None, Some(4))).await;
        let favorites = InMemoryFavoriteRepository::new();
        favorites.insert(Favorite::new("u1", "new")).await;

        let service = ReconciliationService::new(
            Arc::new(games),
            Arc::new(reviews.clone()),
            Arc::new(favorites.clone()),
        );
        let report = service.reconcile().await.unwrap();

        assert_eq!(report.orphan_reviews_deleted, 0);
        assert_eq!(report.orphan_favorites_deleted, 0);
        assert_eq!(reviews.list_reviews_for_game("new").await.unwrap().len(), 1);
        assert_eq!(favorites.list_favorites().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_favorite_removed_concurrently_does_not_abort_sweep() {
        let mut games = MockGameRepository::new();
        games.expect_list_games().returning(|| Ok(vec![]));
        games
            .expect_get_game()
            .returning(|_| Err(GameRepositoryError::NotFound));
        let mut favorites = MockFavoriteRepository::new();
        favorites
            .expect_list_favorites()
            .returning(|| Ok(vec![Favorite::new("u1", "gone")]));
        favorites
            .expect_remove_favorite()
            .returning(|_, _| Err(FavoriteRepositoryError::NotFound));

        let service = ReconciliationService::new(
            Arc::new(games),
            Arc::new(InMemoryReviewRepository::new()),
            Arc::new(favorites),
        );
        let report = service.reconcile().await.unwrap();

        assert_eq!(report.orphan_favorites_deleted, 0);
    }
}
