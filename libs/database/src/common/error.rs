/// Error type for connector-level database operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Driver error (URL parsing, client construction)
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The server could not be reached
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid connector configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
