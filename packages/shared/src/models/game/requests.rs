use serde::{Deserialize, Serialize};

/// Body of `POST /games`. Dates and status arrive as strings so that a bad
/// value is reported as a validation error rather than a body rejection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub game_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub genre: String,
    pub release_date: String,
    pub status: String,
    #[serde(default)]
    pub image_base64: String,
}

/// Body of `PUT /games/{gameId}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub platform: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    pub status: Option<String>,
    pub image_base64: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchParams {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CalendarParams {
    pub year: Option<String>,
    pub month: Option<String>,
}
