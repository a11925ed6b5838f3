pub mod auth;
pub mod catalog;
pub mod favorite;
pub mod game;
pub mod review;
pub mod user;
