use serde::{Deserialize, Serialize};

/// Body of `POST /favorites`. The owner is the authenticated principal.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub game_id: String,
}
