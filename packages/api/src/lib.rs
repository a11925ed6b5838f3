use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

/// Builds the HTTP router with every route group merged in.
pub fn create_app(app_state: AppState) -> Router {
    // Browser clients are served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::auth::routes())
        .merge(routes::games::routes())
        .merge(routes::reviews::routes())
        .merge(routes::favorites::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
