//! MongoDB connector and utilities
//!
//! Provides client construction with a reachability check and a lightweight
//! health probe.

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::connect_from_config;
pub use health::{HealthStatus, check_health, check_health_detailed};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
