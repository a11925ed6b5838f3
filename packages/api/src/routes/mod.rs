pub mod auth;
pub mod favorites;
pub mod games;
pub mod health;
pub mod reviews;
