use crate::models::favorite::Favorite;
use crate::repositories::dynamodb::{batch_delete, query_all, scan_all, Item, StoreError};
use crate::repositories::errors::favorite_repository_errors::FavoriteRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_item};
use std::collections::HashMap;

#[cfg(test)]
use mockall::automock;

/// Favorites are keyed by `userId` (partition) and `gameId` (sort), which
/// makes the pair unique. A secondary index on `gameId` serves cascades.
pub struct DynamoDbFavoriteRepository {
    pub client: Client,
    pub table_name: String,
    pub game_index: String,
}

impl DynamoDbFavoriteRepository {
    pub fn new(client: Client, table_name: &str, game_index: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            game_index: game_index.to_string(),
        }
    }
}

fn pair_key(user_id: &str, game_id: &str) -> Item {
    HashMap::from([
        ("userId".to_string(), AttributeValue::S(user_id.to_string())),
        ("gameId".to_string(), AttributeValue::S(game_id.to_string())),
    ])
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Fails with `AlreadyExists` if the pair is already stored.
    async fn add_favorite(&self, favorite: &Favorite) -> Result<(), FavoriteRepositoryError>;
    async fn get_favorite(
        &self,
        user_id: &str,
        game_id: &str,
    ) -> Result<Option<Favorite>, FavoriteRepositoryError>;
    async fn list_favorites_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Favorite>, FavoriteRepositoryError>;
    async fn list_favorites(&self) -> Result<Vec<Favorite>, FavoriteRepositoryError>;
    /// Fails with `NotFound` if the pair is not stored.
    async fn remove_favorite(&self, user_id: &str, game_id: &str)
        -> Result<(), FavoriteRepositoryError>;
    async fn delete_favorites_for_game(&self, game_id: &str)
        -> Result<usize, FavoriteRepositoryError>;
}

impl From<StoreError> for FavoriteRepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Serialization(msg) => FavoriteRepositoryError::Serialization(msg),
            StoreError::DynamoDb(msg) => FavoriteRepositoryError::DynamoDb(msg),
        }
    }
}

#[async_trait]
impl FavoriteRepository for DynamoDbFavoriteRepository {
    async fn add_favorite(&self, favorite: &Favorite) -> Result<(), FavoriteRepositoryError> {
        let item =
            to_item(favorite).map_err(|e| FavoriteRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(userId)")
            .send()
            .await
            .map_err(|e| {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return FavoriteRepositoryError::AlreadyExists;
                    }
                }
                FavoriteRepositoryError::DynamoDb(e.to_string())
            })?;
        Ok(())
    }

    async fn get_favorite(
        &self,
        user_id: &str,
        game_id: &str,
    ) -> Result<Option<Favorite>, FavoriteRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(pair_key(user_id, game_id)))
            .send()
            .await
            .map_err(|e| FavoriteRepositoryError::DynamoDb(e.to_string()))?;
        output
            .item
            .map(|item| {
                from_item(item).map_err(|e| FavoriteRepositoryError::Serialization(e.to_string()))
            })
            .transpose()
    }

    async fn list_favorites_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Favorite>, FavoriteRepositoryError> {
        let query = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("userId = :userId")
            .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()));
        Ok(query_all(query).await?)
    }

    async fn list_favorites(&self) -> Result<Vec<Favorite>, FavoriteRepositoryError> {
        Ok(scan_all(&self.client, &self.table_name).await?)
    }

    async fn remove_favorite(
        &self,
        user_id: &str,
        game_id: &str,
    ) -> Result<(), FavoriteRepositoryError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(pair_key(user_id, game_id)))
            .condition_expression("attribute_exists(userId)")
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(FavoriteRepositoryError::NotFound);
                    }
                }
                Err(FavoriteRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn delete_favorites_for_game(
        &self,
        game_id: &str,
    ) -> Result<usize, FavoriteRepositoryError> {
        let query = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(&self.game_index)
            .key_condition_expression("gameId = :gameId")
            .expression_attribute_values(":gameId", AttributeValue::S(game_id.to_string()));
        let favorites: Vec<Favorite> = query_all(query).await?;
        let keys = favorites
            .iter()
            .map(|favorite| pair_key(&favorite.user_id, &favorite.game_id))
            .collect();
        Ok(batch_delete(&self.client, &self.table_name, keys).await?)
    }
}
