use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use lambda_http::tracing::{error, info};

use crate::{
    error::ApiError,
    middleware::{auth::AuthenticatedUser, json::ApiJson},
    state::AppState,
};
use shared::models::catalog::FilterParams;
use shared::models::game::requests::{
    CalendarParams, CreateGameRequest, SearchParams, UpdateGameRequest,
};
use shared::models::game::responses::{
    CalendarMonthResponse, GameDeletionResponse, GameDetailsResponse,
};
use shared::models::game::Game;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/search", get(search_games))
        .route("/games/filter", get(filter_games))
        .route("/games/calendar", get(calendar_month))
        .route(
            "/games/{game_id}",
            get(get_game).put(update_game).delete(delete_game),
        )
}

async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<Game>>, ApiError> {
    state
        .catalog_service
        .list_games()
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list games: {}", e);
            ApiError::from(e)
        })
}

async fn search_games(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Game>>, ApiError> {
    state
        .catalog_service
        .search_by_title(params.title.as_deref())
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to search games for {:?}: {}", params.title, e);
            ApiError::from(e)
        })
}

async fn filter_games(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Game>>, ApiError> {
    state
        .catalog_service
        .filter(&params)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to filter games with {:?}: {}", params, e);
            ApiError::from(e)
        })
}

async fn calendar_month(
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> Result<Json<CalendarMonthResponse>, ApiError> {
    state
        .catalog_service
        .calendar_month(&params)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to build calendar for {:?}: {}", params, e);
            ApiError::from(e)
        })
}

async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameDetailsResponse>, ApiError> {
    state
        .game_service
        .get_game_with_reviews(&game_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to retrieve game {}: {}", game_id, e);
            ApiError::from(e)
        })
}

async fn create_game(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    ApiJson(request): ApiJson<CreateGameRequest>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    let game_id = request.game_id.clone();
    let game = state
        .game_service
        .create_game(&principal, request)
        .await
        .map_err(|e| {
            error!("Failed to create game {}: {}", game_id, e);
            ApiError::from(e)
        })?;
    Ok((StatusCode::CREATED, Json(game)))
}

async fn update_game(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(game_id): Path<String>,
    ApiJson(request): ApiJson<UpdateGameRequest>,
) -> Result<Json<Game>, ApiError> {
    state
        .game_service
        .update_game(&principal, &game_id, request)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to update game {}: {}", game_id, e);
            ApiError::from(e)
        })
}

async fn delete_game(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(game_id): Path<String>,
) -> Result<Json<GameDeletionResponse>, ApiError> {
    let deletion = state
        .game_service
        .delete_game(&principal, &game_id)
        .await
        .map_err(|e| {
            error!("Failed to delete game {}: {}", game_id, e);
            ApiError::from(e)
        })?;
    info!("Game {} deleted by {}", game_id, principal.user_id);
    Ok(Json(deletion))
}
