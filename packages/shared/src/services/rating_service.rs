use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::game::RatingSummary;
use crate::models::review::Review;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::game_repository::GameRepository;
use crate::repositories::review_repository::ReviewRepository;
use crate::services::errors::rating_service_errors::RatingServiceError;

/// Rounds to one decimal place, halves away from zero.
pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean and count of the non-null ratings in `reviews`. Text-only reviews are
/// ignored; no ratings gives exactly zero.
pub fn compute_rating_summary(reviews: &[Review]) -> RatingSummary {
    let (sum, count) = reviews
        .iter()
        .filter_map(|review| review.rating)
        .fold((0u64, 0u32), |(sum, count), rating| {
            (sum + u64::from(rating), count + 1)
        });

    if count == 0 {
        return RatingSummary::default();
    }

    RatingSummary {
        average_rating: round_to_one_decimal(sum as f64 / f64::from(count)),
        total_ratings: count,
    }
}

pub struct RatingService {
    review_repository: Arc<dyn ReviewRepository>,
    game_repository: Arc<dyn GameRepository>,
}

impl RatingService {
    pub fn new(
        review_repository: Arc<dyn ReviewRepository>,
        game_repository: Arc<dyn GameRepository>,
    ) -> Self {
        RatingService {
            review_repository,
            game_repository,
        }
    }

    /// Recomputes a game's aggregate from its persisted reviews and writes it
    /// back. If the game has been deleted in the meantime nothing is written
    /// and the computed summary is still returned.
    pub async fn recompute(&self, game_id: &str) -> Result<RatingSummary, RatingServiceError> {
        let reviews = self
            .review_repository
            .list_reviews_for_game(game_id)
            .await
            .map_err(|e| RatingServiceError::RepositoryError(e.to_string()))?;
        let summary = compute_rating_summary(&reviews);

        match self
            .game_repository
            .update_rating_summary(game_id, &summary)
            .await
        {
            Ok(()) => {
                debug!(
                    "Rating for game {} is now {} over {} ratings",
                    game_id, summary.average_rating, summary.total_ratings
                );
                Ok(summary)
            }
            Err(GameRepositoryError::NotFound) => {
                warn!("Skipped rating write for missing game {}", game_id);
                Ok(summary)
            }
            Err(e) => Err(RatingServiceError::RepositoryError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::errors::review_repository_errors::ReviewRepositoryError;
    use crate::repositories::game_repository::MockGameRepository;
    use crate::repositories::review_repository::MockReviewRepository;
    use proptest::prelude::*;

    fn review(rating: Option<u8>) -> Review {
        let text = rating.is_none().then(|| "text only".to_string());
        Review::new("u1", "g1", text, rating)
    }

    #[test]
    fn test_mixed_ratings_ignore_text_only_reviews() {
        let reviews = vec![review(Some(5)), review(Some(3)), review(None)];

        let summary = compute_rating_summary(&reviews);

        assert_eq!(summary.average_rating, 4.0);
        assert_eq!(summary.total_ratings, 2);
    }

    #[test]
    fn test_no_ratings_is_zero() {
        assert_eq!(compute_rating_summary(&[]), RatingSummary::default());
        assert_eq!(
            compute_rating_summary(&[review(None), review(None)]),
            RatingSummary {
                average_rating: 0.0,
                total_ratings: 0
            }
        );
    }

    #[test]
    fn test_rounding_goes_half_away_from_zero() {
        assert_eq!(round_to_one_decimal(4.25), 4.3);
        assert_eq!(round_to_one_decimal(3.333_333), 3.3);
        assert_eq!(round_to_one_decimal(2.0 / 3.0), 0.7);

        // 4, 4, 5 -> 4.333..
        let reviews = vec![review(Some(4)), review(Some(4)), review(Some(5))];
        assert_eq!(compute_rating_summary(&reviews).average_rating, 4.3);
    }

    proptest! {
        #[test]
        fn prop_summary_matches_rated_reviews(ratings in prop::collection::vec(prop::option::of(1u8..=5), 0..60)) {
            let reviews: Vec<Review> = ratings.iter().copied().map(review).collect();
            let rated: Vec<u8> = ratings.iter().flatten().copied().collect();

            let summary = compute_rating_summary(&reviews);

            prop_assert_eq!(summary.total_ratings as usize, rated.len());
            if rated.is_empty() {
                prop_assert_eq!(summary.average_rating, 0.0);
            } else {
                let mean = rated.iter().map(|r| f64::from(*r)).sum::<f64>() / rated.len() as f64;
                prop_assert!((summary.average_rating - mean).abs() <= 0.05 + 1e-9);
                prop_assert!(summary.average_rating >= 1.0 && summary.average_rating <= 5.0);
                let tenths = summary.average_rating * 10.0;
                prop_assert!((tenths - tenths.round()).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_summary_ignores_review_order(mut ratings in prop::collection::vec(prop::option::of(1u8..=5), 0..30)) {
            let forward: Vec<Review> = ratings.iter().copied().map(review).collect();
            ratings.reverse();
            let backward: Vec<Review> = ratings.iter().copied().map(review).collect();

            prop_assert_eq!(compute_rating_summary(&forward), compute_rating_summary(&backward));
        }
    }

    #[tokio::test]
    async fn test_recompute_writes_summary() {
        let mut review_repo = MockReviewRepository::new();
        review_repo
            .expect_list_reviews_for_game()
            .withf(|game_id| game_id == "g1")
            .returning(|_| Ok(vec![review(Some(5)), review(Some(3)), review(None)]));
        let mut game_repo = MockGameRepository::new();
        game_repo
            .expect_update_rating_summary()
            .withf(|game_id, summary| {
                game_id == "g1" && summary.average_rating == 4.0 && summary.total_ratings == 2
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = RatingService::new(Arc::new(review_repo), Arc::new(game_repo));
        let summary = service.recompute("g1").await.unwrap();

        assert_eq!(summary.total_ratings, 2);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let mut review_repo = MockReviewRepository::new();
        review_repo
            .expect_list_reviews_for_game()
            .times(2)
            .returning(|_| Ok(vec![review(Some(2)), review(Some(5))]));
        let mut game_repo = MockGameRepository::new();
        game_repo
            .expect_update_rating_summary()
            .times(2)
            .returning(|_, _| Ok(()));

        let service = RatingService::new(Arc::new(review_repo), Arc::new(game_repo));
        let first = service.recompute("g1").await.unwrap();
        let second = service.recompute("g1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.average_rating, 3.5);
    }

    #[tokio::test]
    async fn test_recompute_on_deleted_game_returns_summary() {
        let mut review_repo = MockReviewRepository::new();
        review_repo
            .expect_list_reviews_for_game()
            .returning(|_| Ok(vec![]));
        let mut game_repo = MockGameRepository::new();
        game_repo
            .expect_update_rating_summary()
            .returning(|_, _| Err(GameRepositoryError::NotFound));

        let service = RatingService::new(Arc::new(review_repo), Arc::new(game_repo));
        let summary = service.recompute("gone").await.unwrap();

        assert_eq!(summary, RatingSummary::default());
    }

    #[tokio::test]
    async fn test_recompute_surfaces_store_failures() {
        let mut review_repo = MockReviewRepository::new();
        review_repo
            .expect_list_reviews_for_game()
            .returning(|_| Err(ReviewRepositoryError::DynamoDb("timeout".to_string())));
        let game_repo = MockGameRepository::new();

        let service = RatingService::new(Arc::new(review_repo), Arc::new(game_repo));
        let result = service.recompute("g1").await;

        assert!(matches!(result, Err(RatingServiceError::RepositoryError(_))));
    }
}
