use std::sync::Arc;
use tracing::{error, info};

use crate::models::auth::requests::{RegisterRequest, UpdateUserRequest};
use crate::models::user::{Principal, User};
use crate::repositories::errors::user_repository_errors::UserRepositoryError;
use crate::repositories::user_repository::UserRepository;
use crate::services::errors::user_service_errors::UserServiceError;
use crate::services::identity_provider::IdentityProvider;

fn map_user_error(err: UserRepositoryError) -> UserServiceError {
    match err {
        UserRepositoryError::NotFound => UserServiceError::UserNotFound,
        UserRepositoryError::AlreadyExists => UserServiceError::UserAlreadyExists,
        other => UserServiceError::RepositoryError(other.to_string()),
    }
}

fn validate_username(username: &str) -> Result<String, UserServiceError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(UserServiceError::ValidationError(
            "Username cannot be empty".to_string(),
        ));
    }
    Ok(username.to_string())
}

fn validate_email(email: &str) -> Result<String, UserServiceError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(UserServiceError::ValidationError(format!(
            "'{}' is not a valid email address",
            email
        ))),
    }
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    identity_provider: Arc<dyn IdentityProvider>,
    allow_admin_signup: bool,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        identity_provider: Arc<dyn IdentityProvider>,
        allow_admin_signup: bool,
    ) -> Self {
        UserService {
            repository,
            identity_provider,
            allow_admin_signup,
        }
    }

    /// Creates the identity first, then the profile keyed by the identity's
    /// user id. The administrator flag is only honoured when admin signup is
    /// enabled.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, UserServiceError> {
        let email = validate_email(&request.email)?;
        let username = validate_username(&request.username)?;
        if request.password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Password cannot be empty".to_string(),
            ));
        }

        let user_id = self
            .identity_provider
            .create_identity(&email, &request.password)
            .await?;

        let administrator = request.is_admin && self.allow_admin_signup;
        let user = User::new(&user_id, &username, &email, administrator);
        if let Err(e) = self.repository.create_user(&user).await {
            error!("Identity {} created but profile write failed: {}", user_id, e);
            // A dangling identity would block this email from registering again.
            if let Err(cleanup) = self.identity_provider.delete_identity(&user_id).await {
                error!("Failed to remove identity {}: {}", user_id, cleanup);
            }
            return Err(map_user_error(e));
        }

        info!("Registered user {} (administrator: {})", user_id, administrator);
        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<User, UserServiceError> {
        if user_id.is_empty() {
            return Err(UserServiceError::ValidationError(
                "User ID cannot be empty".to_string(),
            ));
        }
        self.repository
            .get_user_by_id(user_id)
            .await
            .map_err(map_user_error)
    }

    /// Changes username and/or email. Email changes are pushed to the identity
    /// provider before the profile is written.
    pub async fn update_profile(
        &self,
        principal: &Principal,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<User, UserServiceError> {
        if !principal.is(user_id) {
            return Err(UserServiceError::NotProfileOwner);
        }
        let mut user = self.get_user_by_id(user_id).await?;

        if let Some(username) = request.username.as_deref() {
            user.username = validate_username(username)?;
        }
        if let Some(email) = request.email.as_deref() {
            let email = validate_email(email)?;
            if email != user.email {
                self.identity_provider.update_email(user_id, &email).await?;
                user.email = email;
            }
        }

        self.repository
            .update_user(&user)
            .await
            .map_err(map_user_error)?;
        Ok(user)
    }

    pub async fn is_admin(&self, user_id: &str) -> Result<bool, UserServiceError> {
        Ok(self.get_user_by_id(user_id).await?.administrator)
    }
}
