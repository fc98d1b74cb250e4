//! Health Records Domain
//!
//! Persistence for diabetes health metrics (glucose, heart rate, activity,
//! food images) stored in MongoDB, collection `diabetes_db.health_data`.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐
//! │ HealthRecordStore │  ← Facade: timestamps, logging
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │    Repository     │  ← Data access (trait + MongoDB implementation)
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │      Models       │  ← Records, update and filter types
//! └───────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::mongodb::MongoConfig;
//! use domain_health_records::{HealthRecordFilter, HealthRecordStore, NewHealthRecord};
//! use futures_util::TryStreamExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = HealthRecordStore::connect(&MongoConfig::default()).await?;
//!
//! store
//!     .insert(NewHealthRecord::new(1, 110.5, 72.0).with_activity_level(5000.0))
//!     .await?;
//!
//! let mut records = store.query(HealthRecordFilter::for_user(1)).await?;
//! while let Some(record) = records.try_next().await? {
//!     println!("{record}");
//! }
//!
//! store.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod store;

// Re-export commonly used types
pub use error::{HealthRecordError, HealthRecordResult};
pub use models::{HealthRecord, HealthRecordFilter, HealthRecordUpdate, NewHealthRecord};
pub use crate::mongodb::{COLLECTION_NAME, DATABASE_NAME, MongoHealthRecordRepository};
pub use repository::{HealthRecordRepository, RecordStream};
pub use store::HealthRecordStore;
