pub mod requests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A user's review of a game. At least one of `text` and `rating` is set.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_id: String,
    pub user_id: String,
    pub game_id: String,
    pub text: Option<String>,
    pub rating: Option<u8>,
    pub date_time_posted: DateTime<Utc>,
}

impl Review {
    pub fn new(user_id: &str, game_id: &str, text: Option<String>, rating: Option<u8>) -> Self {
        Review {
            review_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            game_id: game_id.to_string(),
            text,
            rating,
            date_time_posted: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Newest first, the order every review listing is returned in.
pub fn sort_newest_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.date_time_posted.cmp(&a.date_time_posted));
}
