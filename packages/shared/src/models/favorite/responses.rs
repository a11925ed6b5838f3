use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::favorite::Favorite;
use crate::models::game::Game;

/// A favorite joined with the game it points at.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteGame {
    pub favorite_id: String,
    pub user_id: String,
    pub game_id: String,
    pub date_added: NaiveDate,
    pub game: Game,
}

impl FavoriteGame {
    pub fn new(favorite: Favorite, game: Game) -> Self {
        FavoriteGame {
            favorite_id: favorite.favorite_id(),
            user_id: favorite.user_id,
            game_id: favorite.game_id,
            date_added: favorite.date_added,
            game,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteAddedResponse {
    pub favorite_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatusResponse {
    pub is_favorited: bool,
}
