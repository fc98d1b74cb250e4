use mongodb::{Client, bson::doc, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;
use crate::common::{DatabaseError, DatabaseResult};

/// Connect using a MongoConfig
///
/// The driver connects lazily, so the client is verified with a `ping`
/// before being returned. An unreachable server fails after the configured
/// server selection timeout. No retry is attempted.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, connect_from_config};
///
/// let config = MongoConfig::new("mongodb://localhost:27017").with_app_name("demo");
/// let client = connect_from_config(&config).await?;
/// ```
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    info!(url = %config.url, "Attempting to connect to MongoDB");

    let client = build_client(config).await?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to MongoDB");
    Ok(client)
}

/// Parse the URL and construct a client without contacting the server
async fn build_client(config: &MongoConfig) -> DatabaseResult<Client> {
    if config.server_selection_timeout_secs == 0 {
        return Err(DatabaseError::ConfigError(
            "server selection timeout must be greater than zero".to_string(),
        ));
    }

    let mut options = ClientOptions::parse(&config.url).await?;

    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    Ok(Client::with_options(options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = connect_from_config(&MongoConfig::new("postgres://localhost:5432")).await;
        assert!(matches!(result, Err(DatabaseError::Mongo(_))));
    }

    #[tokio::test]
    async fn test_connect_rejects_zero_selection_timeout() {
        let config = MongoConfig::default().with_timeouts(1, 0);
        let result = connect_from_config(&config).await;
        assert!(matches!(result, Err(DatabaseError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_connect_unreachable_server_fails() {
        // Nothing listens on port 1
        let config = MongoConfig::new("mongodb://127.0.0.1:1/?directConnection=true")
            .with_timeouts(1, 1);
        let result = connect_from_config(&config).await;
        assert!(matches!(result, Err(DatabaseError::ConnectionFailed(_))));
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect() {
        let mongo_url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let result = connect_from_config(&MongoConfig::new(mongo_url)).await;
        assert!(result.is_ok());
    }
}
