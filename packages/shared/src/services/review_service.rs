use std::sync::Arc;
use tracing::{debug, info};

use crate::models::review::requests::{CreateReviewRequest, UpdateReviewRequest};
use crate::models::review::{sort_newest_first, Review, MAX_RATING, MIN_RATING};
use crate::models::user::Principal;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::errors::review_repository_errors::ReviewRepositoryError;
use crate::repositories::game_repository::GameRepository;
use crate::repositories::review_repository::ReviewRepository;
use crate::services::errors::review_service_errors::ReviewServiceError;
use crate::services::rating_service::RatingService;

/// Validated review body: trimmed text, rating within bounds, and at least
/// one of the two present.
#[derive(Debug, Clone, PartialEq)]
struct ReviewContent {
    text: Option<String>,
    rating: Option<u8>,
}

impl ReviewContent {
    fn parse(text: Option<String>, rating: Option<i64>) -> Result<Self, ReviewServiceError> {
        let text = text
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        let rating = rating
            .map(|rating| {
                u8::try_from(rating)
                    .ok()
                    .filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating))
                    .ok_or_else(|| {
                        ReviewServiceError::ValidationError(format!(
                            "Rating must be between {} and {}, got {}",
                            MIN_RATING, MAX_RATING, rating
                        ))
                    })
            })
            .transpose()?;

        if text.is_none() && rating.is_none() {
            return Err(ReviewServiceError::ValidationError(
                "A review needs text, a rating, or both".to_string(),
            ));
        }
        Ok(ReviewContent { text, rating })
    }
}

fn map_review_error(err: ReviewRepositoryError) -> ReviewServiceError {
    match err {
        ReviewRepositoryError::NotFound => ReviewServiceError::ReviewNotFound,
        other => ReviewServiceError::RepositoryError(other.to_string()),
    }
}

pub struct ReviewService {
    review_repository: Arc<dyn ReviewRepository>,
    game_repository: Arc<dyn GameRepository>,
    rating_service: Arc<RatingService>,
}

impl ReviewService {
    pub fn new(
        review_repository: Arc<dyn ReviewRepository>,
        game_repository: Arc<dyn GameRepository>,
        rating_service: Arc<RatingService>,
    ) -> Self {
        ReviewService {
            review_repository,
            game_repository,
            rating_service,
        }
    }

    pub async fn add_review(
        &self,
        principal: &Principal,
        request: CreateReviewRequest,
    ) -> Result<Review, ReviewServiceError> {
        let content = ReviewContent::parse(request.text, request.rating)?;

        self.game_repository
            .get_game(&request.game_id)
            .await
            .map_err(|e| match e {
                GameRepositoryError::NotFound => ReviewServiceError::GameNotFound,
                other => ReviewServiceError::RepositoryError(other.to_string()),
            })?;

        let review = Review::new(
            &principal.user_id,
            &request.game_id,
            content.text,
            content.rating,
        );
        self.review_repository
            .create_review(&review)
            .await
            .map_err(map_review_error)?;
        info!(
            "Review {} posted on game {} by {}",
            review.review_id, review.game_id, review.user_id
        );

        if review.rating.is_some() {
            self.rating_service.recompute(&review.game_id).await?;
        }
        Ok(review)
    }

    pub async fn get_review(&self, review_id: &str) -> Result<Review, ReviewServiceError> {
        self.review_repository
            .get_review(review_id)
            .await
            .map_err(map_review_error)
    }

    /// Replaces text and rating. Only the author may edit, administrators
    /// included.
    pub async fn update_review(
        &self,
        principal: &Principal,
        review_id: &str,
        request: UpdateReviewRequest,
    ) -> Result<Review, ReviewServiceError> {
        let mut review = self.get_review(review_id).await?;
        if !review.is_owned_by(&principal.user_id) {
            return Err(ReviewServiceError::NotReviewOwner);
        }
        let content = ReviewContent::parse(request.text, request.rating)?;

        let previous_rating = review.rating;
        review.text = content.text;
        review.rating = content.rating;
        self.review_repository
            .update_review_content(&review)
            .await
            .map_err(map_review_error)?;
        debug!("Review {} updated", review_id);

        if previous_rating != review.rating {
            self.rating_service.recompute(&review.game_id).await?;
        }
        Ok(review)
    }

    /// The author or an administrator may delete.
    pub async fn delete_review(
        &self,
        principal: &Principal,
        review_id: &str,
    ) -> Result<(), ReviewServiceError> {
        let review = self.get_review(review_id).await?;
        if !review.is_owned_by(&principal.user_id) && !principal.administrator {
            return Err(ReviewServiceError::NotReviewOwner);
        }

        self.review_repository
            .delete_review(review_id)
            .await
            .map_err(map_review_error)?;
        info!("Review {} deleted by {}", review_id, principal.user_id);

        if review.rating.is_some() {
            self.rating_service.recompute(&review.game_id).await?;
        }
        Ok(())
    }

    pub async fn list_reviews(&self) -> Result<Vec<Review>, ReviewServiceError> {
        let mut reviews = self
            .review_repository
            .list_reviews()
            .await
            .map_err(map_review_error)?;
        sort_newest_first(&mut reviews);
        Ok(reviews)
    }

    pub async fn list_reviews_for_game(
        &self,
        game_id: &str,
    ) -> Result<Vec<Review>, ReviewServiceError> {
        self.review_repository
            .list_reviews_for_game(game_id)
            .await
            .map_err(map_review_error)
    }

    pub async fn list_reviews_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Review>, ReviewServiceError> {
        self.review_repository
            .list_reviews_for_user(user_id)
            .await
            .map_err(map_review_error)
    }
}
