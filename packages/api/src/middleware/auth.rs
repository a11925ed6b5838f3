use axum::{extract::FromRequestParts, http::request::Parts};
use lambda_http::tracing::debug;

use crate::{error::ApiError, state::AppState};
use shared::models::user::Principal;
use shared::services::auth_service::AuthServiceTrait;
use shared::services::errors::auth_service_errors::AuthServiceError;

/// The caller behind a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .ok_or(ApiError::AuthService(AuthServiceError::MissingCredentials))?
            .to_str()
            .map_err(|_| {
                ApiError::AuthService(AuthServiceError::ValidationError(
                    "Invalid header format".to_string(),
                ))
            })?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::AuthService(AuthServiceError::MissingCredentials))?;

        let principal = state
            .auth_service
            .principal_from_token(token)
            .await
            .map_err(|e| {
                debug!("Rejected bearer token: {}", e);
                ApiError::from(e)
            })?;

        Ok(AuthenticatedUser(principal))
    }
}
