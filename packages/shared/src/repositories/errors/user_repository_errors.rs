use std::fmt;

#[derive(Debug)]
pub enum UserRepositoryError {
    NotFound,
    AlreadyExists,
    Serialization(String),
    DynamoDb(String),
}

impl fmt::Display for UserRepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRepositoryError::NotFound => write!(f, "User profile not found"),
            UserRepositoryError::AlreadyExists => write!(f, "User profile already exists"),
            UserRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            UserRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for UserRepositoryError {}
