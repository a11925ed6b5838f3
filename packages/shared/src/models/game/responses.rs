use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::game::Game;
use crate::models::review::Review;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetailsResponse {
    pub game: Game,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonthResponse {
    pub year: i32,
    pub month: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub games_by_date: BTreeMap<NaiveDate, Vec<Game>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDeletionResponse {
    pub game_id: String,
    pub reviews_deleted: usize,
    pub favorites_deleted: usize,
}
