use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use lambda_http::tracing::{debug, error};

use crate::{
    error::ApiError,
    middleware::{auth::AuthenticatedUser, json::ApiJson},
    state::AppState,
};
use shared::models::favorite::requests::AddFavoriteRequest;
use shared::models::favorite::responses::{
    FavoriteAddedResponse, FavoriteGame, FavoriteStatusResponse,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", post(add_favorite))
        .route("/favorites/user/{user_id}", get(list_favorites))
        .route("/favorites/check/{user_id}/{game_id}", get(check_favorite))
        .route("/favorites/{user_id}/{game_id}", delete(remove_favorite))
}

async fn add_favorite(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    ApiJson(request): ApiJson<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<FavoriteAddedResponse>), ApiError> {
    let favorite = state
        .favorite_service
        .add_favorite(&principal, &request.game_id)
        .await
        .map_err(|e| {
            error!(
                "Failed to favorite game {} for {}: {}",
                request.game_id, principal.user_id, e
            );
            ApiError::from(e)
        })?;
    Ok((
        StatusCode::CREATED,
        Json(FavoriteAddedResponse {
            favorite_id: favorite.favorite_id(),
        }),
    ))
}

async fn list_favorites(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<FavoriteGame>>, ApiError> {
    state
        .favorite_service
        .list_favorites(&principal, &user_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list favorites of {}: {}", user_id, e);
            ApiError::from(e)
        })
}

async fn remove_favorite(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path((user_id, game_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .favorite_service
        .remove_favorite(&principal, &user_id, &game_id)
        .await
        .map_err(|e| {
            error!(
                "Failed to remove favorite {} for {}: {}",
                game_id, user_id, e
            );
            ApiError::from(e)
        })?;
    debug!("Favorite {} removed for {}", game_id, user_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn check_favorite(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path((user_id, game_id)): Path<(String, String)>,
) -> Result<Json<FavoriteStatusResponse>, ApiError> {
    let is_favorited = state
        .favorite_service
        .is_favorited(&principal, &user_id, &game_id)
        .await
        .map_err(|e| {
            error!("Failed to check favorite {} for {}: {}", game_id, user_id, e);
            ApiError::from(e)
        })?;
    Ok(Json(FavoriteStatusResponse { is_favorited }))
}
