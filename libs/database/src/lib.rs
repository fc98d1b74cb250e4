//! Database connectors shared by the domain crates
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client construction and health checks
//! - `config` - `MongoConfig` loading via `core_config::FromEnv`
//! - `all` - All features
//!
//! # Example
//!
//! ```no_run
//! use database::mongodb::{MongoConfig, connect_from_config};
//!
//! # async fn example() -> database::DatabaseResult<()> {
//! let config = MongoConfig::new("mongodb://localhost:27017").with_app_name("demo");
//! let client = connect_from_config(&config).await?;
//! let db = client.database("diabetes_db");
//! # let _ = db;
//! # Ok(())
//! # }
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
