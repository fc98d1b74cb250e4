use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::error::HealthRecordResult;
use crate::models::{HealthRecord, HealthRecordFilter, HealthRecordUpdate};

/// Lazy, forward-only stream of records backed by a database cursor.
///
/// Records are fetched as the stream is polled; it is not a snapshot and
/// cannot be rewound.
pub type RecordStream = BoxStream<'static, HealthRecordResult<HealthRecord>>;

/// Repository trait for health record persistence
///
/// Records arrive fully built (timestamp included); implementations only
/// move them in and out of storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthRecordRepository: Send + Sync {
    /// Persist one record, returning it with its generated id
    async fn insert(&self, record: HealthRecord) -> HealthRecordResult<HealthRecord>;

    /// Persist a batch in a single write, returning the number inserted
    async fn insert_many(&self, records: Vec<HealthRecord>) -> HealthRecordResult<u64>;

    /// Open a lazy stream over the records matching `filter`
    async fn query(&self, filter: HealthRecordFilter) -> HealthRecordResult<RecordStream>;

    /// Merge `update` into the first record of `user_id`. Returns whether one matched.
    async fn update_first(
        &self,
        user_id: i64,
        update: HealthRecordUpdate,
    ) -> HealthRecordResult<bool>;

    /// Delete the first record of `user_id`. Returns whether one was deleted.
    async fn delete_first(&self, user_id: i64) -> HealthRecordResult<bool>;

    /// Count records matching `filter`
    async fn count(&self, filter: HealthRecordFilter) -> HealthRecordResult<u64>;
}
