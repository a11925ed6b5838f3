use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::services::errors::{
    auth_service_errors::AuthServiceError, catalog_service_errors::CatalogServiceError,
    favorite_service_errors::FavoriteServiceError, game_service_errors::GameServiceError,
    review_service_errors::ReviewServiceError, user_service_errors::UserServiceError,
    ErrorCategory,
};
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    CatalogService(CatalogServiceError),
    GameService(GameServiceError),
    ReviewService(ReviewServiceError),
    FavoriteService(FavoriteServiceError),
    UserService(UserServiceError),
    AuthService(AuthServiceError),
    MalformedBody(String),
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::CatalogService(err) => err.category(),
            ApiError::GameService(err) => err.category(),
            ApiError::ReviewService(err) => err.category(),
            ApiError::FavoriteService(err) => err.category(),
            ApiError::UserService(err) => err.category(),
            ApiError::AuthService(err) => err.category(),
            ApiError::MalformedBody(_) => ErrorCategory::InvalidInput,
        }
    }
}

fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorCategory::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCategory::Forbidden => StatusCode::FORBIDDEN,
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::Conflict => StatusCode::CONFLICT,
        ErrorCategory::UpstreamFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::CatalogService(err) => write!(f, "{}", err),
            ApiError::GameService(err) => write!(f, "{}", err),
            ApiError::ReviewService(err) => write!(f, "{}", err),
            ApiError::FavoriteService(err) => write!(f, "{}", err),
            ApiError::UserService(err) => write!(f, "{}", err),
            ApiError::AuthService(err) => write!(f, "{}", err),
            ApiError::MalformedBody(msg) => write!(f, "Malformed request body: {}", msg),
        }
    }
}

impl From<CatalogServiceError> for ApiError {
    fn from(error: CatalogServiceError) -> Self {
        ApiError::CatalogService(error)
    }
}

impl From<GameServiceError> for ApiError {
    fn from(error: GameServiceError) -> Self {
        ApiError::GameService(error)
    }
}

impl From<ReviewServiceError> for ApiError {
    fn from(error: ReviewServiceError) -> Self {
        ApiError::ReviewService(error)
    }
}

impl From<FavoriteServiceError> for ApiError {
    fn from(error: FavoriteServiceError) -> Self {
        ApiError::FavoriteService(error)
    }
}

impl From<UserServiceError> for ApiError {
    fn from(error: UserServiceError) -> Self {
        ApiError::UserService(error)
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        ApiError::AuthService(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    category: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let category = self.category();
        // Store failures are logged by the handler; clients get a generic message.
        let message = match category {
            ErrorCategory::UpstreamFailure => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (
            status_for(category),
            Json(ErrorBody {
                error: &message,
                category: category.as_str(),
            }),
        )
            .into_response()
    }
}
