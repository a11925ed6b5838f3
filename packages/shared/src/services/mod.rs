pub mod auth_service;
pub mod catalog_service;
pub mod errors;
pub mod favorite_service;
pub mod game_service;
pub mod identity_provider;
pub mod rating_service;
pub mod reconciliation_service;
pub mod review_service;
pub mod user_service;
