//! Credential storage and password verification, delegated to Cognito.
//!
//! Every identity is created under a generated username which doubles as the
//! application's `userId`. The pool is expected to accept the email address as
//! a sign-in alias so that login works by email.

use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType, MessageActionType};
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::services::errors::identity_provider_errors::IdentityProviderError;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers credentials and returns the new identity's user id.
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityProviderError>;
    /// Verifies credentials and returns the matching user id.
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<String, IdentityProviderError>;
    async fn update_email(&self, user_id: &str, email: &str) -> Result<(), IdentityProviderError>;
    /// Removes an identity whose profile could not be stored.
    async fn delete_identity(&self, user_id: &str) -> Result<(), IdentityProviderError>;
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    #[serde(rename = "cognito:username")]
    cognito_username: String,
}

/// Reads the username claim from a Cognito id token. The token comes straight
/// from `InitiateAuth`, so its signature is not checked here.
fn username_from_id_token(token: &str) -> Result<String, IdentityProviderError> {
    let jwt_parts: Vec<&str> = token.split('.').collect();
    if jwt_parts.len() != 3 {
        return Err(IdentityProviderError::ServiceError(
            "Invalid id token format".to_string(),
        ));
    }
    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(jwt_parts[1])
        .map_err(|_| IdentityProviderError::ServiceError("Invalid id token payload".to_string()))?;
    let claims: IdTokenClaims = serde_json::from_slice(&payload)
        .map_err(|_| IdentityProviderError::ServiceError("Invalid id token claims".to_string()))?;
    Ok(claims.cognito_username)
}

fn attribute(name: &str, value: &str) -> Result<AttributeType, IdentityProviderError> {
    AttributeType::builder()
        .name(name)
        .value(value)
        .build()
        .map_err(|e| IdentityProviderError::ServiceError(e.to_string()))
}

pub struct CognitoIdentityProvider {
    client: CognitoClient,
    user_pool_id: String,
    client_id: String,
}

impl CognitoIdentityProvider {
    pub fn new(client: CognitoClient, user_pool_id: &str, client_id: &str) -> Self {
        CognitoIdentityProvider {
            client,
            user_pool_id: user_pool_id.to_string(),
            client_id: client_id.to_string(),
        }
    }

    async fn discard_identity(&self, username: &str) {
        if let Err(e) = self.delete_identity(username).await {
            warn!("Failed to remove incomplete identity {}: {}", username, e);
        }
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityProviderError> {
        let username = Uuid::new_v4().to_string();

        self.client
            .admin_create_user()
            .user_pool_id(&self.user_pool_id)
            .username(&username)
            .user_attributes(attribute("email", email)?)
            .user_attributes(attribute("email_verified", "true")?)
            .message_action(MessageActionType::Suppress)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_username_exists_exception() {
                    IdentityProviderError::IdentityAlreadyExists
                } else if service_err.is_invalid_parameter_exception() {
                    IdentityProviderError::InvalidParameter(service_err.to_string())
                } else {
                    IdentityProviderError::ServiceError(service_err.to_string())
                }
            })?;

        // Without a permanent password the first login would hit a
        // NEW_PASSWORD_REQUIRED challenge.
        let set_password = self
            .client
            .admin_set_user_password()
            .user_pool_id(&self.user_pool_id)
            .username(&username)
            .password(password)
            .permanent(true)
            .send()
            .await;
        if let Err(e) = set_password {
            self.discard_identity(&username).await;
            let service_err = e.into_service_error();
            return Err(
                if service_err.is_invalid_password_exception()
                    || service_err.is_invalid_parameter_exception()
                {
                    IdentityProviderError::InvalidParameter(service_err.to_string())
                } else {
                    IdentityProviderError::ServiceError(service_err.to_string())
                },
            );
        }

        debug!("Created identity {}", username);
        Ok(username)
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityProviderError> {
        let output = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .client_id(&self.client_id)
            .auth_parameters("USERNAME", email)
            .auth_parameters("PASSWORD", password)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_not_authorized_exception()
                    || service_err.is_user_not_found_exception()
                {
                    IdentityProviderError::InvalidCredentials
                } else {
                    IdentityProviderError::ServiceError(service_err.to_string())
                }
            })?;

        if let Some(challenge_name) = output.challenge_name() {
            warn!("Login for {} requires challenge {:?}", email, challenge_name);
            return Err(IdentityProviderError::InvalidCredentials);
        }

        let id_token = output
            .authentication_result()
            .and_then(|result| result.id_token())
            .ok_or_else(|| {
                IdentityProviderError::ServiceError(
                    "No id token in authentication result".to_string(),
                )
            })?;
        username_from_id_token(id_token)
    }

    async fn update_email(&self, user_id: &str, email: &str) -> Result<(), IdentityProviderError> {
        self.client
            .admin_update_user_attributes()
            .user_pool_id(&self.user_pool_id)
            .username(user_id)
            .user_attributes(attribute("email", email)?)
            .user_attributes(attribute("email_verified", "true")?)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_alias_exists_exception() {
                    IdentityProviderError::IdentityAlreadyExists
                } else if service_err.is_invalid_parameter_exception() {
                    IdentityProviderError::InvalidParameter(service_err.to_string())
                } else {
                    IdentityProviderError::ServiceError(service_err.to_string())
                }
            })?;
        Ok(())
    }

    async fn delete_identity(&self, user_id: &str) -> Result<(), IdentityProviderError> {
        self.client
            .admin_delete_user()
            .user_pool_id(&self.user_pool_id)
            .username(user_id)
            .send()
            .await
            .map_err(|e| IdentityProviderError::ServiceError(e.into_service_error().to_string()))?;
        debug!("Deleted identity {}", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#),
            general_purpose::URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_username_is_read_from_id_token() {
        let token = token_with_payload(
            r#"{"sub":"abc","cognito:username":"0b7c1d2e-user","email":"a@example.com"}"#,
        );

        assert_eq!(username_from_id_token(&token).unwrap(), "0b7c1d2e-user");
    }

    #[test]
    fn test_malformed_id_tokens_are_rejected() {
        assert!(username_from_id_token("not-a-jwt").is_err());
        assert!(username_from_id_token("a.!!!.c").is_err());

        let missing_claim = token_with_payload(r#"{"sub":"abc"}"#);
        assert!(matches!(
            username_from_id_token(&missing_claim),
            Err(IdentityProviderError::ServiceError(_))
        ));
    }
}
