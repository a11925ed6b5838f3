use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::debug;

use crate::models::auth::responses::{LoginResponse, TokenClaims};
use crate::models::user::Principal;
use crate::services::errors::auth_service_errors::AuthServiceError;
use crate::services::errors::user_service_errors::UserServiceError;
use crate::services::identity_provider::IdentityProvider;
use crate::services::user_service::UserService;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait AuthServiceTrait: Send + Sync {
    async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, AuthServiceError>;
    /// Resolves a bearer token to the caller, including the current
    /// administrator flag from the user's profile.
    async fn principal_from_token(&self, token: &str) -> Result<Principal, AuthServiceError>;
    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthServiceError>;
    fn extract_user_id_from_token(&self, token: &str) -> Result<String, AuthServiceError>;
    fn generate_token(&self, user_id: &str) -> Result<LoginResponse, AuthServiceError>;
}

pub struct AuthService {
    user_service: Arc<UserService>,
    identity_provider: Arc<dyn IdentityProvider>,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(
        user_service: Arc<UserService>,
        identity_provider: Arc<dyn IdentityProvider>,
        jwt_secret: String,
        token_ttl_hours: i64,
    ) -> Self {
        AuthService {
            user_service,
            identity_provider,
            jwt_secret,
            token_ttl_hours,
        }
    }
}

impl AuthServiceTrait for AuthService {
    async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, AuthServiceError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthServiceError::ValidationError(
                "Email or password cannot be empty".to_string(),
            ));
        }

        let user_id = self.identity_provider.authenticate(email, password).await?;

        // An identity without a profile cannot use the board.
        match self.user_service.get_user_by_id(&user_id).await {
            Ok(_) => self.generate_token(&user_id),
            Err(UserServiceError::UserNotFound) => Err(AuthServiceError::InvalidCredentials),
            Err(err) => Err(AuthServiceError::UserServiceError(err)),
        }
    }

    async fn principal_from_token(&self, token: &str) -> Result<Principal, AuthServiceError> {
        let user_id = self.extract_user_id_from_token(token)?;
        match self.user_service.get_user_by_id(&user_id).await {
            Ok(user) => Ok(Principal::from(&user)),
            Err(UserServiceError::UserNotFound) => {
                debug!("Token subject {} has no profile", user_id);
                Err(AuthServiceError::InvalidToken)
            }
            Err(err) => Err(AuthServiceError::UserServiceError(err)),
        }
    }

    fn generate_token(&self, user_id: &str) -> Result<LoginResponse, AuthServiceError> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(self.token_ttl_hours)
            .and_then(|ttl| now.checked_add_signed(ttl).map(|at| (ttl, at)));
        let (ttl, expires_at) = expires_at.ok_or_else(|| {
            AuthServiceError::JwtError(format!(
                "Token lifetime of {} hours is out of range",
                self.token_ttl_hours
            ))
        })?;
        let exp = expires_at.timestamp() as usize;
        let iat = now.timestamp() as usize;

        let claims = TokenClaims {
            sub: user_id.to_string(),
            exp,
            iat,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(|e| AuthServiceError::JwtError(format!("{:#?}", e)))?;

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: ttl.num_seconds(),
        })
    }

    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let validation = Validation::default();

        match decode::<TokenClaims>(token, &decoding_key, &validation) {
            Ok(token_data) => {
                let now = Utc::now().timestamp() as usize;
                if token_data.claims.exp < now {
                    Err(AuthServiceError::ExpiredToken)
                } else {
                    Ok(token_data.claims)
                }
            }
            Err(err) => match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    Err(AuthServiceError::ExpiredToken)
                }
                _ => Err(AuthServiceError::InvalidToken),
            },
        }
    }

    fn extract_user_id_from_token(&self, token: &str) -> Result<String, AuthServiceError> {
        let claims = self.verify_token(token)?;
        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::requests::RegisterRequest;
    use crate::services::identity_provider::MockIdentityProvider;
    use crate::testing::{InMemoryIdentityProvider, InMemoryUserRepository};

    fn auth_service_with_secret(secret: &str) -> AuthService {
        let identity_provider = Arc::new(InMemoryIdentityProvider::new());
        let user_service = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            identity_provider.clone(),
            true,
        ));
        AuthService::new(user_service, identity_provider, secret.to_string(), 24)
    }

    async fn registered(auth_service: &AuthService, email: &str, is_admin: bool) -> String {
        auth_service
            .user_service
            .register(RegisterRequest {
                email: email.to_string(),
                password: "hunter2hunter2".to_string(),
                username: "tester".to_string(),
                is_admin,
            })
            .await
            .unwrap()
            .user_id
    }

    #[test]
    fn test_token_generation_and_verification_roundtrip() {
        let auth_service = auth_service_with_secret("test-secret-key");

        let test_user_id = "roundtrip-user-id";
        let login_response = auth_service.generate_token(test_user_id).unwrap();

        assert_eq!(login_response.token_type, "Bearer");
        assert_eq!(login_response.expires_in, 24 * 60 * 60);

        let claims = auth_service.verify_token(&login_response.token).unwrap();
        assert_eq!(claims.sub, test_user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_out_of_range_token_lifetime_is_an_error() {
        let identity_provider = Arc::new(InMemoryIdentityProvider::new());
        let user_service = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            identity_provider.clone(),
            false,
        ));
        let auth_service =
            AuthService::new(user_service, identity_provider, "secret".to_string(), i64::MAX);

        assert!(matches!(
            auth_service.generate_token("user"),
            Err(AuthServiceError::JwtError(_))
        ));
    }

    #[test]
    fn test_verify_token_invalid() {
        let auth_service = auth_service_with_secret("test-secret-key");

        let result = auth_service.verify_token("invalid-token");
        assert!(matches!(result, Err(AuthServiceError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth_service = auth_service_with_secret("test-secret-key");
        let issued = Utc::now() - Duration::hours(48);
        let claims = TokenClaims {
            sub: "old-user".to_string(),
            exp: (issued + Duration::hours(24)).timestamp() as usize,
            iat: issued.timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret-key".as_ref()),
        )
        .unwrap();

        assert!(matches!(
            auth_service.verify_token(&token),
            Err(AuthServiceError::ExpiredToken)
        ));
    }

    #[test]
    fn test_different_secrets_produce_different_tokens() {
        let auth_service1 = auth_service_with_secret("secret1");
        let auth_service2 = auth_service_with_secret("secret2");

        let token1 = auth_service1.generate_token("same-user-id").unwrap().token;
        let token2 = auth_service2.generate_token("same-user-id").unwrap().token;

        assert_ne!(token1, token2);
        assert!(auth_service1.verify_token(&token1).is_ok());
        assert!(auth_service2.verify_token(&token1).is_err());
        assert!(auth_service2.verify_token(&token2).is_ok());
        assert!(auth_service1.verify_token(&token2).is_err());
    }

    #[tokio::test]
    async fn test_login_issues_token_for_registered_user() {
        let auth_service = auth_service_with_secret("test-secret-key");
        let user_id = registered(&auth_service, "login@example.com", false).await;

        let login = auth_service
            .authenticate_user("login@example.com", "hunter2hunter2")
            .await
            .unwrap();

        assert_eq!(
            auth_service.extract_user_id_from_token(&login.token).unwrap(),
            user_id
        );
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let auth_service = auth_service_with_secret("test-secret-key");
        registered(&auth_service, "login@example.com", false).await;

        let result = auth_service
            .authenticate_user("login@example.com", "wrong-password")
            .await;
        assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));

        let result = auth_service.authenticate_user("", "").await;
        assert!(matches!(result, Err(AuthServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_login_without_profile_is_rejected() {
        let mut identity_provider = MockIdentityProvider::new();
        identity_provider
            .expect_authenticate()
            .returning(|_, _| Ok("orphan-identity".to_string()));
        let identity_provider = Arc::new(identity_provider);
        let user_service = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            identity_provider.clone(),
            false,
        ));
        let auth_service =
            AuthService::new(user_service, identity_provider, "secret".to_string(), 1);

        let result = auth_service.authenticate_user("x@example.com", "password").await;
        assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_principal_carries_admin_flag() {
        let auth_service = auth_service_with_secret("test-secret-key");
        let admin_id = registered(&auth_service, "admin@example.com", true).await;
        let token = auth_service.generate_token(&admin_id).unwrap().token;

        let principal = auth_service.principal_from_token(&token).await.unwrap();
        assert!(principal.is(&admin_id));
        assert!(principal.administrator);

        let unknown = auth_service.generate_token("no-profile").unwrap().token;
        assert!(matches!(
            auth_service.principal_from_token(&unknown).await,
            Err(AuthServiceError::InvalidToken)
        ));
    }
}
