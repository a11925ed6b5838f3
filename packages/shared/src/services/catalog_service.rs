use std::sync::Arc;
use tracing::debug;

use crate::models::catalog::{
    group_by_release_date, title_contains, DateRange, FilterCriteria, FilterParams,
};
use crate::models::game::requests::CalendarParams;
use crate::models::game::responses::CalendarMonthResponse;
use crate::models::game::Game;
use crate::repositories::game_repository::GameRepository;
use crate::services::errors::catalog_service_errors::CatalogServiceError;

/// Read-only queries over the full game scan. Predicates run in memory.
pub struct CatalogService {
    game_repository: Arc<dyn GameRepository>,
}

impl CatalogService {
    pub fn new(game_repository: Arc<dyn GameRepository>) -> Self {
        CatalogService { game_repository }
    }

    pub async fn list_games(&self) -> Result<Vec<Game>, CatalogServiceError> {
        self.game_repository
            .list_games()
            .await
            .map_err(|e| CatalogServiceError::RepositoryError(e.to_string()))
    }

    pub async fn search_by_title(&self, query: Option<&str>) -> Result<Vec<Game>, CatalogServiceError> {
        let needle = query
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .ok_or_else(|| {
                CatalogServiceError::ValidationError("Search term cannot be empty".to_string())
            })?
            .to_lowercase();

        let games = self.list_games().await?;
        let matches: Vec<Game> = games
            .into_iter()
            .filter(|game| title_contains(game, &needle))
            .collect();
        debug!("Title search '{}' matched {} games", needle, matches.len());
        Ok(matches)
    }

    pub async fn filter(&self, params: &FilterParams) -> Result<Vec<Game>, CatalogServiceError> {
        let criteria =
            FilterCriteria::from_params(params).map_err(CatalogServiceError::ValidationError)?;
        self.filter_by(&criteria).await
    }

    pub async fn filter_by(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Game>, CatalogServiceError> {
        let games = self.list_games().await?;
        if criteria.is_empty() {
            return Ok(games);
        }
        Ok(criteria.apply(games))
    }

    /// Games released within one calendar month, bucketed by release date.
    pub async fn calendar_month(
        &self,
        params: &CalendarParams,
    ) -> Result<CalendarMonthResponse, CatalogServiceError> {
        let year: i32 = parse_required("year", params.year.as_deref())?;
        let month: u32 = parse_required("month", params.month.as_deref())?;
        let window = DateRange::month(year, month).map_err(CatalogServiceError::ValidationError)?;

        let games = self.filter_by(&FilterCriteria::for_window(window)).await?;
        Ok(CalendarMonthResponse {
            year: window.year(),
            month: window.month_number(),
            start_date: window.start,
            end_date: window.end,
            games_by_date: group_by_release_date(games),
        })
    }
}

fn parse_required<T: std::str::FromStr>(
    field: &str,
    value: Option<&str>,
) -> Result<T, CatalogServiceError> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CatalogServiceError::ValidationError(format!("{} is required", field)))?;
    value.parse().map_err(|_| {
        CatalogServiceError::ValidationError(format!("{} must be a number, got '{}'", field, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::ReleaseStatus;
    use crate::repositories::errors::game_repository_errors::GameRepositoryError;
    use crate::repositories::game_repository::MockGameRepository;
    use crate::testing::InMemoryGameRepository;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn catalog(games: Vec<Game>) -> CatalogService {
        let repo = InMemoryGameRepository::new();
        for game in games {
            repo.insert(game).await;
        }
        CatalogService::new(Arc::new(repo))
    }

    fn rated(id: &str, title: &str, rating: f64) -> Game {
        let mut game = Game::new(id, title, date(2023, 6, 1), ReleaseStatus::Released);
        game.average_rating = rating;
        game
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let service = catalog(vec![
            rated("g1", "Super Mario Odyssey", 0.0),
            rated("g2", "Mario Kart 8", 0.0),
            rated("g3", "Celeste", 0.0),
        ])
        .await;

        let mut ids: Vec<String> = service
            .search_by_title(Some("MARIO"))
            .await
            .unwrap()
            .into_iter()
            .map(|game| game.game_id)
            .collect();
        ids.sort();

        assert_eq!(ids, vec!["g1", "g2"]);
    }

    #[tokio::test]
    async fn test_empty_search_is_invalid() {
        let service = catalog(vec![]).await;

        assert!(matches!(
            service.search_by_title(None).await,
            Err(CatalogServiceError::ValidationError(_))
        ));
        assert!(matches!(
            service.search_by_title(Some("   ")).await,
            Err(CatalogServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_filter_by_min_rating() {
        let service = catalog(vec![
            rated("a", "A", 0.0),
            rated("b", "B", 3.5),
            rated("c", "C", 4.0),
            rated("d", "D", 4.5),
        ])
        .await;
        let params = FilterParams {
            min_rating: Some("4".to_string()),
            ..Default::default()
        };

        let ids: Vec<String> = service
            .filter(&params)
            .await
            .unwrap()
            .into_iter()
            .map(|game| game.game_id)
            .collect();

        assert_eq!(ids, vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_filter_rejects_bad_min_rating() {
        let service = catalog(vec![]).await;
        let params = FilterParams {
            min_rating: Some("four".to_string()),
            ..Default::default()
        };

        let err = service.filter(&params).await.unwrap_err();
        assert_eq!(err.category(), crate::services::errors::ErrorCategory::InvalidInput);
    }

    #[tokio::test]
    async fn test_filter_without_criteria_returns_everything() {
        let service = catalog(vec![rated("a", "A", 0.0), rated("b", "B", 2.0)]).await;

        let games = service.filter(&FilterParams::default()).await.unwrap();
        assert_eq!(games.len(), 2);
    }

    #[tokio::test]
    async fn test_calendar_month_groups_by_day() {
        let mut march_2 = Game::new("m2", "March Two", date(2024, 3, 2), ReleaseStatus::Released);
        march_2.platform = "PC".to_string();
        let march_20a = Game::new("m20a", "Twenty A", date(2024, 3, 20), ReleaseStatus::Upcoming);
        let march_20b = Game::new("m20b", "Twenty B", date(2024, 3, 20), ReleaseStatus::Upcoming);
        let april = Game::new("apr", "April", date(2024, 4, 1), ReleaseStatus::Upcoming);
        let service = catalog(vec![march_2, march_20a, march_20b, april]).await;

        let params = CalendarParams {
            year: Some("2024".to_string()),
            month: Some("3".to_string()),
        };
        let calendar = service.calendar_month(&params).await.unwrap();

        assert_eq!(calendar.start_date, date(2024, 3, 1));
        assert_eq!(calendar.end_date, date(2024, 3, 31));
        assert_eq!(calendar.games_by_date.len(), 2);
        assert_eq!(calendar.games_by_date[&date(2024, 3, 20)].len(), 2);
        assert!(!calendar.games_by_date.contains_key(&date(2024, 4, 1)));
    }

    #[tokio::test]
    async fn test_calendar_rejects_bad_month() {
        let service = catalog(vec![]).await;

        for (year, month) in [("2024", "13"), ("2024", "x"), ("", "3")] {
            let params = CalendarParams {
                year: Some(year.to_string()),
                month: Some(month.to_string()),
            };
            assert!(matches!(
                service.calendar_month(&params).await,
                Err(CatalogServiceError::ValidationError(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_scan_failure_is_upstream() {
        let mut repo = MockGameRepository::new();
        repo.expect_list_games()
            .returning(|| Err(GameRepositoryError::DynamoDb("unavailable".to_string())));
        let service = CatalogService::new(Arc::new(repo));

        assert!(matches!(
            service.list_games().await,
            Err(CatalogServiceError::RepositoryError(_))
        ));
    }
}
