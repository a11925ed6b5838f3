use serde::{Deserialize, Serialize};

/// Body of `POST /reviews`. The author is the authenticated principal.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub game_id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
}

/// Body of `PUT /reviews/{reviewId}`. Replaces both text and rating.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreatedResponse {
    pub review_id: String,
}
