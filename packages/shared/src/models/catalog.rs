//! Predicates for catalog queries and the calendar grouping built on them.
//!
//! Every predicate is evaluated independently against a single game, so the
//! order they run in never changes the result set.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::game::{Game, ReleaseStatus};

/// Raw `GET /games/filter` query string. Everything is kept as text until
/// [`FilterCriteria::from_params`] validates it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub platform: Option<String>,
    pub genre: Option<String>,
    pub status: Option<String>,
    pub min_rating: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Inclusive range of release dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if start > end {
            return Err(format!(
                "startDate {} is after endDate {}",
                start, end
            ));
        }
        Ok(DateRange { start, end })
    }

    /// First to last day of a calendar month.
    pub fn month(year: i32, month: u32) -> Result<Self, String> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| format!("Invalid calendar month {}-{}", year, month))?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .ok_or_else(|| format!("Invalid calendar month {}-{}", year, month))?;
        Ok(DateRange { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month_number(&self) -> u32 {
        self.start.month()
    }
}

/// Validated, normalised filter. Text predicates are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub platform: Option<String>,
    pub genre: Option<String>,
    pub status: Option<ReleaseStatus>,
    pub min_rating: Option<f64>,
    pub release_window: Option<DateRange>,
}

impl FilterCriteria {
    pub fn from_params(params: &FilterParams) -> Result<Self, String> {
        let status = present(&params.status)
            .map(str::parse::<ReleaseStatus>)
            .transpose()?;

        let min_rating = present(&params.min_rating)
            .map(parse_min_rating)
            .transpose()?;

        let start = present(&params.start_date)
            .map(|value| parse_date("startDate", value))
            .transpose()?;
        let end = present(&params.end_date)
            .map(|value| parse_date("endDate", value))
            .transpose()?;
        let release_window = match (start, end) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
            (None, None) => None,
            _ => {
                return Err("startDate and endDate must be supplied together".to_string());
            }
        };

        Ok(FilterCriteria {
            platform: present(&params.platform).map(str::to_lowercase),
            genre: present(&params.genre).map(str::to_lowercase),
            status,
            min_rating,
            release_window,
        })
    }

    pub fn for_window(release_window: DateRange) -> Self {
        FilterCriteria {
            release_window: Some(release_window),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterCriteria::default()
    }

    pub fn matches(&self, game: &Game) -> bool {
        if let Some(platform) = &self.platform {
            if !game.platform.to_lowercase().contains(platform.as_str()) {
                return false;
            }
        }
        if let Some(genre) = &self.genre {
            if !game.genre.to_lowercase().contains(genre.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if game.status != status {
                return false;
            }
        }
        if let Some(min_rating) = self.min_rating {
            if game.average_rating < min_rating {
                return false;
            }
        }
        if let Some(window) = &self.release_window {
            if !window.contains(game.release_date) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, games: Vec<Game>) -> Vec<Game> {
        games.into_iter().filter(|game| self.matches(game)).collect()
    }
}

/// Case-insensitive substring match on the title. `needle` must already be
/// lowercased.
pub fn title_contains(game: &Game, needle: &str) -> bool {
    game.title.to_lowercase().contains(needle)
}

/// Buckets games by release date, keeping input order within each day.
pub fn group_by_release_date(games: Vec<Game>) -> BTreeMap<NaiveDate, Vec<Game>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<Game>> = BTreeMap::new();
    for game in games {
        grouped.entry(game.release_date).or_default().push(game);
    }
    grouped
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_min_rating(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| format!("minRating must be a number, got '{}'", value))?;
    if !parsed.is_finite() {
        return Err(format!("minRating must be a finite number, got '{}'", value));
    }
    Ok(parsed)
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("{} must be a YYYY-MM-DD date, got '{}'", field, value))
}
