use crate::models::review::Review;
use crate::repositories::dynamodb::{batch_delete, query_all, scan_all, string_key, StoreError};
use crate::repositories::errors::review_repository_errors::ReviewRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

const REVIEW_KEY: &str = "reviewId";

/// Reviews live in their own table with two secondary indexes, one keyed by
/// `gameId` and one by `userId`, both sorted by `dateTimePosted`.
pub struct DynamoDbReviewRepository {
    pub client: Client,
    pub table_name: String,
    pub game_index: String,
    pub user_index: String,
}

impl DynamoDbReviewRepository {
    pub fn new(client: Client, table_name: &str, game_index: &str, user_index: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            game_index: game_index.to_string(),
            user_index: user_index.to_string(),
        }
    }

    async fn query_index(
        &self,
        index_name: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let query = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(index_name)
            .key_condition_expression("#key = :value")
            .expression_attribute_names("#key", attribute)
            .expression_attribute_values(":value", AttributeValue::S(value.to_string()))
            .scan_index_forward(false);
        Ok(query_all(query).await?)
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create_review(&self, review: &Review) -> Result<(), ReviewRepositoryError>;
    async fn get_review(&self, review_id: &str) -> Result<Review, ReviewRepositoryError>;
    async fn list_reviews(&self) -> Result<Vec<Review>, ReviewRepositoryError>;
    /// Newest first.
    async fn list_reviews_for_game(&self, game_id: &str)
        -> Result<Vec<Review>, ReviewRepositoryError>;
    /// Newest first.
    async fn list_reviews_for_user(&self, user_id: &str)
        -> Result<Vec<Review>, ReviewRepositoryError>;
    /// Replaces `text` and `rating` of an existing review.
    async fn update_review_content(&self, review: &Review) -> Result<(), ReviewRepositoryError>;
    async fn delete_review(&self, review_id: &str) -> Result<(), ReviewRepositoryError>;
    /// Removes every review of a game and returns how many were deleted.
    async fn delete_reviews_for_game(&self, game_id: &str) -> Result<usize, ReviewRepositoryError>;
}

impl From<StoreError> for ReviewRepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Serialization(msg) => ReviewRepositoryError::Serialization(msg),
            StoreError::DynamoDb(msg) => ReviewRepositoryError::DynamoDb(msg),
        }
    }
}

#[async_trait]
impl ReviewRepository for DynamoDbReviewRepository {
    async fn create_review(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let item =
            to_item(review).map_err(|e| ReviewRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| ReviewRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn get_review(&self, review_id: &str) -> Result<Review, ReviewRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(REVIEW_KEY, AttributeValue::S(review_id.to_string()))
            .send()
            .await
            .map_err(|e| ReviewRepositoryError::DynamoDb(e.to_string()))?;
        if let Some(item) = output.item {
            from_item(item).map_err(|e| ReviewRepositoryError::Serialization(e.to_string()))
        } else {
            Err(ReviewRepositoryError::NotFound)
        }
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(scan_all(&self.client, &self.table_name).await?)
    }

    async fn list_reviews_for_game(
        &self,
        game_id: &str,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        self.query_index(&self.game_index, "gameId", game_id).await
    }

    async fn list_reviews_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        self.query_index(&self.user_index, "userId", user_id).await
    }

    async fn update_review_content(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let text = to_attribute_value(&review.text)
            .map_err(|e| ReviewRepositoryError::Serialization(e.to_string()))?;
        let rating = to_attribute_value(review.rating)
            .map_err(|e| ReviewRepositoryError::Serialization(e.to_string()))?;

        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(REVIEW_KEY, AttributeValue::S(review.review_id.clone()))
            .update_expression("SET #text = :text, rating = :rating")
            .expression_attribute_names("#text", "text")
            .expression_attribute_values(":text", text)
            .expression_attribute_values(":rating", rating)
            .condition_expression("attribute_exists(reviewId)")
            .send()
            .await
            .map_err(|e| {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return ReviewRepositoryError::NotFound;
                    }
                }
                ReviewRepositoryError::DynamoDb(e.to_string())
            })?;
        Ok(())
    }

    async fn delete_review(&self, review_id: &str) -> Result<(), ReviewRepositoryError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(REVIEW_KEY, AttributeValue::S(review_id.to_string()))
            .condition_expression("attribute_exists(reviewId)")
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(ReviewRepositoryError::NotFound);
                    }
                }
                Err(ReviewRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn delete_reviews_for_game(&self, game_id: &str) -> Result<usize, ReviewRepositoryError> {
        let reviews = self.list_reviews_for_game(game_id).await?;
        let keys = reviews
            .iter()
            .map(|review| string_key(REVIEW_KEY, &review.review_id))
            .collect();
        Ok(batch_delete(&self.client, &self.table_name, keys).await?)
    }
}
