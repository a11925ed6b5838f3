pub mod favorite_repository_errors;
pub mod game_repository_errors;
pub mod review_repository_errors;
pub mod user_repository_errors;
