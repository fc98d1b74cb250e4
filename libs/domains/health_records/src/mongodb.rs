//! MongoDB implementation of HealthRecordRepository

use async_trait::async_trait;
use database::mongodb::{MongoConfig, check_health, connect_from_config};
use futures_util::{StreamExt, TryStreamExt};
use mongodb::{Client, Collection};
use tracing::{info, instrument};

use crate::error::{HealthRecordError, HealthRecordResult};
use crate::models::{HealthRecord, HealthRecordFilter, HealthRecordUpdate};
use crate::repository::{HealthRecordRepository, RecordStream};
use crate::store::HealthRecordStore;

/// Database holding the health records
pub const DATABASE_NAME: &str = "diabetes_db";

/// Collection holding the health records
pub const COLLECTION_NAME: &str = "health_data";

/// MongoDB implementation of the HealthRecordRepository
#[derive(Clone)]
pub struct MongoHealthRecordRepository {
    client: Client,
    collection: Collection<HealthRecord>,
}

impl MongoHealthRecordRepository {
    /// Bind to `diabetes_db.health_data`
    pub fn new(client: Client) -> Self {
        Self::with_collection(client, DATABASE_NAME, COLLECTION_NAME)
    }

    /// Bind to a custom database and collection
    pub fn with_collection(client: Client, database: &str, collection: &str) -> Self {
        let collection = client.database(database).collection::<HealthRecord>(collection);
        Self { client, collection }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl HealthRecordRepository for MongoHealthRecordRepository {
    #[instrument(skip(self, record), fields(user_id = record.user_id))]
    async fn insert(&self, record: HealthRecord) -> HealthRecordResult<HealthRecord> {
        let result = self
            .collection
            .insert_one(&record)
            .await
            .map_err(HealthRecordError::persistence)?;

        Ok(HealthRecord {
            id: result.inserted_id.as_object_id(),
            ..record
        })
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn insert_many(&self, records: Vec<HealthRecord>) -> HealthRecordResult<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .insert_many(&records)
            .await
            .map_err(HealthRecordError::persistence)?;

        Ok(result.inserted_ids.len() as u64)
    }

    #[instrument(skip(self))]
    async fn query(&self, filter: HealthRecordFilter) -> HealthRecordResult<RecordStream> {
        let cursor = self
            .collection
            .find(filter.to_document())
            .await
            .map_err(HealthRecordError::query)?;

        Ok(cursor.map_err(HealthRecordError::query).boxed())
    }

    #[instrument(skip(self, update))]
    async fn update_first(
        &self,
        user_id: i64,
        update: HealthRecordUpdate,
    ) -> HealthRecordResult<bool> {
        let result = self
            .collection
            .update_one(
                HealthRecordFilter::for_user(user_id).to_document(),
                update.to_update_document(),
            )
            .await
            .map_err(HealthRecordError::persistence)?;

        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete_first(&self, user_id: i64) -> HealthRecordResult<bool> {
        let result = self
            .collection
            .delete_one(HealthRecordFilter::for_user(user_id).to_document())
            .await
            .map_err(HealthRecordError::persistence)?;

        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: HealthRecordFilter) -> HealthRecordResult<u64> {
        self.collection
            .count_documents(filter.to_document())
            .await
            .map_err(HealthRecordError::query)
    }
}

impl HealthRecordStore<MongoHealthRecordRepository> {
    /// Connect to the server described by `config` and bind to
    /// `diabetes_db.health_data`.
    ///
    /// Fails with [`HealthRecordError::Connection`] when the URL is invalid or
    /// the server does not answer within the server selection timeout.
    ///
    /// # Example
    /// ```ignore
    /// let store = HealthRecordStore::connect(&MongoConfig::default()).await?;
    /// ```
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn connect(config: &MongoConfig) -> HealthRecordResult<Self> {
        let client = connect_from_config(config).await?;
        info!(
            database = DATABASE_NAME,
            collection = COLLECTION_NAME,
            "Health record store ready"
        );
        Ok(Self::new(MongoHealthRecordRepository::new(client)))
    }

    /// Whether the server currently answers a ping
    pub async fn ping(&self) -> bool {
        check_health(self.repository().client()).await
    }

    /// Close the client's connections. Clones of this store become unusable.
    pub async fn shutdown(self) {
        let client = self.repository().client().clone();
        drop(self);
        client.shutdown().await;
        info!("MongoDB connection closed");
    }
}
