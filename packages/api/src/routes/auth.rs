use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lambda_http::tracing::{debug, error};

use crate::{
    error::ApiError,
    middleware::{auth::AuthenticatedUser, json::ApiJson},
    state::AppState,
};
use shared::models::auth::requests::{LoginRequest, RegisterRequest, UpdateUserRequest};
use shared::models::auth::responses::{AdminStatusResponse, LoginResponse, RegisterResponse};
use shared::models::user::User;
use shared::services::auth_service::AuthServiceTrait;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/user/{user_id}", get(get_user).put(update_user))
        .route("/auth/verify-admin/{user_id}", get(verify_admin))
}

async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let email = request.email.clone();
    let user = state.user_service.register(request).await.map_err(|e| {
        error!("Failed to register {}: {}", email, e);
        ApiError::from(e)
    })?;
    debug!("User registered successfully: {}", user.user_id);
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.user_id,
            username: user.username,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(login_data): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    state
        .auth_service
        .authenticate_user(&login_data.email, &login_data.password)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to authenticate user {}: {}", login_data.email, e);
            ApiError::from(e)
        })
}

async fn get_user(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    state
        .user_service
        .get_user_by_id(&user_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                "Failed to retrieve user {} for {}: {}",
                user_id, principal.user_id, e
            );
            ApiError::from(e)
        })
}

async fn update_user(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(user_id): Path<String>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    state
        .user_service
        .update_profile(&principal, &user_id, request)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to update user {}: {}", user_id, e);
            ApiError::from(e)
        })
}

async fn verify_admin(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<AdminStatusResponse>, ApiError> {
    let is_admin = state.user_service.is_admin(&user_id).await.map_err(|e| {
        error!(
            "Failed to check admin status of {} for {}: {}",
            user_id, principal.user_id, e
        );
        ApiError::from(e)
    })?;
    Ok(Json(AdminStatusResponse { is_admin }))
}
