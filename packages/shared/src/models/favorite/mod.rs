pub mod requests;
pub mod responses;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A user's bookmark of a game, keyed by the `(user_id, game_id)` pair.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub user_id: String,
    pub game_id: String,
    pub date_added: NaiveDate,
}

impl Favorite {
    pub fn new(user_id: &str, game_id: &str) -> Self {
        Favorite {
            user_id: user_id.to_string(),
            game_id: game_id.to_string(),
            date_added: Utc::now().date_naive(),
        }
    }

    pub fn favorite_id(&self) -> String {
        favorite_id(&self.user_id, &self.game_id)
    }
}

pub fn favorite_id(user_id: &str, game_id: &str) -> String {
    format!("{}_{}", user_id, game_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_creation() {
        let favorite = Favorite::new("user-1", "game-1");

        assert_eq!(favorite.user_id, "user-1");
        assert_eq!(favorite.game_id, "game-1");
        assert_eq!(favorite.date_added, Utc::now().date_naive());
        assert_eq!(favorite.favorite_id(), "user-1_game-1");
    }
}
