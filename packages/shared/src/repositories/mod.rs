pub mod dynamodb;
pub mod errors;
pub mod favorite_repository;
pub mod game_repository;
pub mod review_repository;
pub mod user_repository;
