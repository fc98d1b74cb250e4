use mongodb::{Client, bson::doc};
use std::time::Instant;

/// Health check status for MongoDB
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the server answered the ping
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    /// Round-trip time in milliseconds
    pub response_time_ms: u64,
}

/// Check MongoDB health with a `ping` command
pub async fn check_health(client: &Client) -> bool {
    check_health_detailed(client).await.healthy
}

/// Check MongoDB health with timing and error details
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, check_health_detailed, connect_from_config};
///
/// let client = connect_from_config(&MongoConfig::default()).await?;
/// let status = check_health_detailed(&client).await;
/// if !status.healthy {
///     tracing::warn!(message = ?status.message, "MongoDB unhealthy");
/// }
/// ```
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}
