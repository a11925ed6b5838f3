use crate::models::user::User;
use crate::repositories::errors::user_repository_errors::UserRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbUserRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbUserRepository {
    pub fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<(), UserRepositoryError>;
    async fn get_user_by_id(&self, user_id: &str) -> Result<User, UserRepositoryError>;
    async fn update_user(&self, user: &User) -> Result<(), UserRepositoryError>;
}

#[async_trait]
impl UserRepository for DynamoDbUserRepository {
    async fn create_user(&self, user: &User) -> Result<(), UserRepositoryError> {
        let item = to_item(user).map_err(|e| UserRepositoryError::Serialization(e.to_string()))?;
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
                        return UserRepositoryError::AlreadyExists;
                    }
                }
                UserRepositoryError::DynamoDb(e.to_string())
            })?;
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<User, UserRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "userId",
                to_attribute_value(user_id)
                    .map_err(|e| UserRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| UserRepositoryError::DynamoDb(e.to_string()))?;
        if let Some(item) = output.item {
            let user: User =
                from_item(item).map_err(|e| UserRepositoryError::Serialization(e.to_string()))?;
            Ok(user)
        } else {
            Err(UserRepositoryError::NotFound)
        }
    }

    async fn update_user(&self, user: &User) -> Result<(), UserRepositoryError> {
        let item = to_item(user).map_err(|e| UserRepositoryError::Serialization(e.to_string()))?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(userId)")
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(UserRepositoryError::NotFound);
                    }
                }
                Err(UserRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }
}
