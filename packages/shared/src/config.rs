use std::{env, fmt, str::FromStr};

use tracing::{info, warn};

const DEFAULT_MAX_IMAGE_BASE64_LEN: usize = 1_400_000;
/// One year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;

#[derive(Debug)]
pub enum ConfigError {
    Missing(String),
    Invalid { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Environment variable {} must be set", key),
            ConfigError::Invalid { key, message } => {
                write!(f, "Invalid value for {}: {}", key, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct TableConfig {
    pub games: String,
    pub reviews: String,
    pub reviews_by_game_index: String,
    pub reviews_by_user_index: String,
    pub favorites: String,
    pub favorites_by_game_index: String,
    pub users: String,
}

#[derive(Debug, Clone)]
pub struct CognitoConfig {
    pub user_pool_id: String,
    pub client_id: String,
}

/// Process configuration, read once at cold start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tables: TableConfig,
    /// Only the API signs tokens or talks to Cognito; the reconciler runs
    /// without either.
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
    pub cognito: Option<CognitoConfig>,
    pub allow_admin_signup: bool,
    pub max_image_base64_len: usize,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = Source { lookup };

        let tables = TableConfig {
            games: source.or_default("GAMES_TABLE", "Games"),
            reviews: source.or_default("REVIEWS_TABLE", "Reviews"),
            reviews_by_game_index: source.or_default("REVIEWS_GAME_INDEX", "gameId-dateTimePosted-index"),
            reviews_by_user_index: source.or_default("REVIEWS_USER_INDEX", "userId-dateTimePosted-index"),
            favorites: source.or_default("FAVORITES_TABLE", "Favorites"),
            favorites_by_game_index: source.or_default("FAVORITES_GAME_INDEX", "gameId-index"),
            users: source.or_default("USERS_TABLE", "Users"),
        };

        let cognito = match (
            source.optional("COGNITO_USER_POOL_ID"),
            source.optional("COGNITO_CLIENT_ID"),
        ) {
            (Some(user_pool_id), Some(client_id)) => Some(CognitoConfig {
                user_pool_id,
                client_id,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("COGNITO_CLIENT_ID".to_string())),
            (None, Some(_)) => {
                return Err(ConfigError::Missing("COGNITO_USER_POOL_ID".to_string()))
            }
        };

        let token_ttl_hours: i64 = source.parse_or("TOKEN_TTL_HOURS", 24)?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_HOURS".to_string(),
                message: format!("must be between 1 and {}", MAX_TOKEN_TTL_HOURS),
            });
        }

        Ok(AppConfig {
            tables,
            jwt_secret: source.optional("JWT_SECRET"),
            token_ttl_hours,
            cognito,
            allow_admin_signup: source.parse_or("ALLOW_ADMIN_SIGNUP", false)?,
            max_image_base64_len: source
                .parse_or("MAX_IMAGE_BASE64_LEN", DEFAULT_MAX_IMAGE_BASE64_LEN)?,
            port: source.parse_or("PORT", 3000)?,
        })
    }

    pub fn jwt_secret(&self) -> Result<&str, ConfigError> {
        self.jwt_secret
            .as_deref()
            .ok_or_else(|| ConfigError::Missing("JWT_SECRET".to_string()))
    }

    pub fn cognito(&self) -> Result<&CognitoConfig, ConfigError> {
        self.cognito
            .as_ref()
            .ok_or_else(|| ConfigError::Missing("COGNITO_USER_POOL_ID".to_string()))
    }
}

struct Source<F> {
    lookup: F,
}

impl<F> Source<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr + fmt::Display,
        T::Err: fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw.parse().map_err(|e: T::Err| {
                warn!("Invalid {key} value: {e}");
                ConfigError::Invalid {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            }),
            None => {
                info!("{key} not set, using default: {default}");
                Ok(default)
            }
        }
    }
}
