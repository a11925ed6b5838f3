use crate::models::game::{Game, GameDetailsUpdate, RatingSummary};
use crate::repositories::dynamodb::{scan_all, StoreError};
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde::Serialize;
use serde_dynamo::{from_item, to_attribute_value, to_item};
use std::collections::HashMap;

#[cfg(test)]
use mockall::automock;

const GAME_KEY: &str = "gameId";

pub struct DynamoDbGameRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbGameRepository {
    pub fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Stores a new game, failing with `AlreadyExists` if the id is taken.
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError>;
    async fn get_game(&self, game_id: &str) -> Result<Game, GameRepositoryError>;
    async fn list_games(&self) -> Result<Vec<Game>, GameRepositoryError>;
    /// Writes only the fields present in `update` and returns the stored game.
    async fn update_game_details(
        &self,
        game_id: &str,
        update: &GameDetailsUpdate,
    ) -> Result<Game, GameRepositoryError>;
    /// Overwrites `averageRating` and `totalRatings` of an existing game.
    async fn update_rating_summary(
        &self,
        game_id: &str,
        summary: &RatingSummary,
    ) -> Result<(), GameRepositoryError>;
    async fn delete_game(&self, game_id: &str) -> Result<(), GameRepositoryError>;
}

impl From<StoreError> for GameRepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Serialization(msg) => GameRepositoryError::Serialization(msg),
            StoreError::DynamoDb(msg) => GameRepositoryError::DynamoDb(msg),
        }
    }
}

fn attribute<T: Serialize>(value: &T) -> Result<AttributeValue, GameRepositoryError> {
    to_attribute_value(value).map_err(|e| GameRepositoryError::Serialization(e.to_string()))
}

/// `SET #field = :field, ...` over the fields present in the update. Every
/// name goes through a placeholder since `status` is a reserved word.
struct SetExpression {
    clauses: Vec<String>,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl SetExpression {
    fn new() -> Self {
        SetExpression {
            clauses: Vec::new(),
            names: HashMap::new(),
            values: HashMap::new(),
        }
    }

    fn set(&mut self, field: &str, value: AttributeValue) {
        self.clauses.push(format!("#{field} = :{field}"));
        self.names.insert(format!("#{field}"), field.to_string());
        self.values.insert(format!(":{field}"), value);
    }

    fn expression(&self) -> String {
        format!("SET {}", self.clauses.join(", "))
    }
}

#[async_trait]
impl GameRepository for DynamoDbGameRepository {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let item = to_item(game).map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(gameId)")
            .send()
            .await
            .map_err(|e| {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return GameRepositoryError::AlreadyExists;
                    }
                }
                GameRepositoryError::DynamoDb(e.to_string())
            })?;
        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Game, GameRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(GAME_KEY, AttributeValue::S(game_id.to_string()))
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;
        match output.item {
            Some(item) => {
                from_item(item).map_err(|e| GameRepositoryError::Serialization(e.to_string()))
            }
            None => Err(GameRepositoryError::NotFound),
        }
    }

    async fn list_games(&self) -> Result<Vec<Game>, GameRepositoryError> {
        Ok(scan_all(&self.client, &self.table_name).await?)
    }

    async fn update_game_details(
        &self,
        game_id: &str,
        update: &GameDetailsUpdate,
    ) -> Result<Game, GameRepositoryError> {
        if update.is_empty() {
            return self.get_game(game_id).await;
        }

        let mut expression = SetExpression::new();
        if let Some(title) = &update.title {
            expression.set("title", attribute(title)?);
        }
        if let Some(description) = &update.description {
            expression.set("description", attribute(description)?);
        }
        if let Some(platform) = &update.platform {
            expression.set("platform", attribute(platform)?);
        }
        if let Some(genre) = &update.genre {
            expression.set("genre", attribute(genre)?);
        }
        if let Some(release_date) = &update.release_date {
            expression.set("releaseDate", attribute(release_date)?);
        }
        if let Some(status) = &update.status {
            expression.set("status", attribute(status)?);
        }
        if let Some(image_base64) = &update.image_base64 {
            expression.set("imageBase64", attribute(image_base64)?);
        }

        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(GAME_KEY, AttributeValue::S(game_id.to_string()))
            .update_expression(expression.expression())
            .set_expression_attribute_names(Some(expression.names))
            .set_expression_attribute_values(Some(expression.values))
            .condition_expression("attribute_exists(gameId)")
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return GameRepositoryError::NotFound;
                    }
                }
                GameRepositoryError::DynamoDb(e.to_string())
            })?;

        match output.attributes {
            Some(item) => {
                from_item(item).map_err(|e| GameRepositoryError::Serialization(e.to_string()))
            }
            None => Err(GameRepositoryError::NotFound),
        }
    }

    async fn update_rating_summary(
        &self,
        game_id: &str,
        summary: &RatingSummary,
    ) -> Result<(), GameRepositoryError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(GAME_KEY, AttributeValue::S(game_id.to_string()))
            .update_expression("SET averageRating = :average, totalRatings = :total")
            .expression_attribute_values(":average", attribute(&summary.average_rating)?)
            .expression_attribute_values(":total", attribute(&summary.total_ratings)?)
            .condition_expression("attribute_exists(gameId)")
            .send()
            .await
            .map_err(|e| {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return GameRepositoryError::NotFound;
                    }
                }
                GameRepositoryError::DynamoDb(e.to_string())
            })?;
        Ok(())
    }

    async fn delete_game(&self, game_id: &str) -> Result<(), GameRepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(GAME_KEY, AttributeValue::S(game_id.to_string()))
            .condition_expression("attribute_exists(gameId)")
            .send()
            .await
            .map_err(|e| {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return GameRepositoryError::NotFound;
                    }
                }
                GameRepositoryError::DynamoDb(e.to_string())
            })?;
        Ok(())
    }
}
