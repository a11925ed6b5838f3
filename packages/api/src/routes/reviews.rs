use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use lambda_http::tracing::{debug, error};

use crate::{
    error::ApiError,
    middleware::{auth::AuthenticatedUser, json::ApiJson},
    state::AppState,
};
use shared::models::review::requests::{
    CreateReviewRequest, ReviewCreatedResponse, UpdateReviewRequest,
};
use shared::models::review::Review;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(list_reviews).post(create_review))
        .route("/reviews/game/{game_id}", get(list_reviews_for_game))
        .route("/reviews/user/{user_id}", get(list_reviews_for_user))
        .route(
            "/reviews/{review_id}",
            put(update_review).delete(delete_review),
        )
}

async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, ApiError> {
    state
        .review_service
        .list_reviews()
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list reviews: {}", e);
            ApiError::from(e)
        })
}

async fn list_reviews_for_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    state
        .review_service
        .list_reviews_for_game(&game_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list reviews of game {}: {}", game_id, e);
            ApiError::from(e)
        })
}

async fn list_reviews_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    state
        .review_service
        .list_reviews_for_user(&user_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list reviews by user {}: {}", user_id, e);
            ApiError::from(e)
        })
}

async fn create_review(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    ApiJson(request): ApiJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewCreatedResponse>), ApiError> {
    let game_id = request.game_id.clone();
    let review = state
        .review_service
        .add_review(&principal, request)
        .await
        .map_err(|e| {
            error!(
                "Failed to add review on game {} for {}: {}",
                game_id, principal.user_id, e
            );
            ApiError::from(e)
        })?;
    debug!("Review {} created", review.review_id);
    Ok((
        StatusCode::CREATED,
        Json(ReviewCreatedResponse {
            review_id: review.review_id,
        }),
    ))
}

async fn update_review(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(review_id): Path<String>,
    ApiJson(request): ApiJson<UpdateReviewRequest>,
) -> Result<Json<Review>, ApiError> {
    state
        .review_service
        .update_review(&principal, &review_id, request)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to update review {}: {}", review_id, e);
            ApiError::from(e)
        })
}

async fn delete_review(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(review_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .review_service
        .delete_review(&principal, &review_id)
        .await
        .map_err(|e| {
            error!("Failed to delete review {}: {}", review_id, e);
            ApiError::from(e)
        })?;
    debug!("Review {} deleted by {}", review_id, principal.user_id);
    Ok(StatusCode::NO_CONTENT)
}
