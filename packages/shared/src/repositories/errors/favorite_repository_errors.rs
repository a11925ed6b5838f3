#[derive(Debug)]
pub enum FavoriteRepositoryError {
    NotFound,
    AlreadyExists,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for FavoriteRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FavoriteRepositoryError::NotFound => write!(f, "Favorite not found"),
            FavoriteRepositoryError::AlreadyExists => write!(f, "Favorite already exists"),
            FavoriteRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            FavoriteRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for FavoriteRepositoryError {}
