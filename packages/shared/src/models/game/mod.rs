pub mod requests;
pub mod responses;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a catalog entry. A game is either announced and not yet out,
/// or already released; never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    Upcoming,
    Released,
}

impl ReleaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseStatus::Upcoming => "upcoming",
            ReleaseStatus::Released => "released",
        }
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(ReleaseStatus::Upcoming),
            "released" => Ok(ReleaseStatus::Released),
            other => Err(format!(
                "Unknown status '{}', expected 'upcoming' or 'released'",
                other
            )),
        }
    }
}

/// A catalog entry. `average_rating` and `total_ratings` are derived from the
/// game's reviews and are only ever written by the rating aggregator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub game_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub genre: String,
    pub release_date: NaiveDate,
    pub status: ReleaseStatus,
    #[serde(default)]
    pub image_base64: String,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
}

impl Game {
    pub fn new(game_id: &str, title: &str, release_date: NaiveDate, status: ReleaseStatus) -> Self {
        Game {
            game_id: game_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            platform: String::new(),
            genre: String::new(),
            release_date,
            status,
            image_base64: String::new(),
            average_rating: 0.0,
            total_ratings: 0,
        }
    }

    pub fn rating_summary(&self) -> RatingSummary {
        RatingSummary {
            average_rating: self.average_rating,
            total_ratings: self.total_ratings,
        }
    }
}

/// Aggregate rating statistics for one game.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_ratings: u32,
}

/// Admin-editable fields of a game. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameDetailsUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub platform: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub status: Option<ReleaseStatus>,
    pub image_base64: Option<String>,
}

impl GameDetailsUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.platform.is_none()
            && self.genre.is_none()
            && self.release_date.is_none()
            && self.status.is_none()
            && self.image_base64.is_none()
    }

    pub fn apply_to(&self, game: &mut Game) {
        if let Some(title) = &self.title {
            game.title = title.clone();
        }
        if let Some(description) = &self.description {
            game.description = description.clone();
        }
        if let Some(platform) = &self.platform {
            game.platform = platform.clone();
        }
        if let Some(genre) = &self.genre {
            game.genre = genre.clone();
        }
        if let Some(release_date) = self.release_date {
            game.release_date = release_date;
        }
        if let Some(status) = self.status {
            game.status = status;
        }
        if let Some(image_base64) = &self.image_base64 {
            game.image_base64 = image_base64.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 22).unwrap()
    }

    #[test]
    fn test_new_game_has_empty_aggregate() {
        let game = Game::new("g1", "Dragon's Dogma 2", release_date(), ReleaseStatus::Released);

        assert_eq!(game.average_rating, 0.0);
        assert_eq!(game.total_ratings, 0);
        assert!(game.image_base64.is_empty());
        assert_eq!(game.rating_summary(), RatingSummary::default());
    }

    #[test]
    fn test_release_status_parsing() {
        assert_eq!("upcoming".parse::<ReleaseStatus>(), Ok(ReleaseStatus::Upcoming));
        assert_eq!(" Released ".parse::<ReleaseStatus>(), Ok(ReleaseStatus::Released));
        assert!("both".parse::<ReleaseStatus>().is_err());
        assert!("".parse::<ReleaseStatus>().is_err());
    }

    #[test]
    fn test_game_serializes_with_camel_case_fields() {
        let game = Game::new("g1", "Hades II", release_date(), ReleaseStatus::Upcoming);

        let json = serde_json::to_value(&game).unwrap();
        assert_eq!(json["gameId"], "g1");
        assert_eq!(json["releaseDate"], "2024-03-22");
        assert_eq!(json["status"], "upcoming");
        assert_eq!(json["averageRating"], 0.0);
        assert_eq!(json["totalRatings"], 0);
    }

    #[test]
    fn test_details_update_leaves_aggregate_alone() {
        let mut game = Game::new("g1", "Old Title", release_date(), ReleaseStatus::Upcoming);
        game.average_rating = 4.5;
        game.total_ratings = 8;

        let update = GameDetailsUpdate {
            title: Some("New Title".to_string()),
            status: Some(ReleaseStatus::Released),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply_to(&mut game);

        assert_eq!(game.title, "New Title");
        assert_eq!(game.status, ReleaseStatus::Released);
        assert_eq!(game.average_rating, 4.5);
        assert_eq!(game.total_ratings, 8);
    }
}
