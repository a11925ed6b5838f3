#[derive(Debug)]
pub enum ReviewRepositoryError {
    NotFound,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for ReviewRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewRepositoryError::NotFound => write!(f, "Review not found"),
            ReviewRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ReviewRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for ReviewRepositoryError {}
