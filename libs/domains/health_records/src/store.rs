//! Health record store - the facade callers hold

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::HealthRecordResult;
use crate::models::{HealthRecord, HealthRecordFilter, HealthRecordUpdate, NewHealthRecord};
use crate::repository::{HealthRecordRepository, RecordStream};

/// CRUD facade over one collection of health records.
///
/// Constructed once and passed to whoever needs it; clones share the same
/// repository. Timestamps are generated here, at write time, for every
/// record written.
pub struct HealthRecordStore<R: HealthRecordRepository> {
    repository: Arc<R>,
}

impl<R: HealthRecordRepository> HealthRecordStore<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Insert one record stamped with the current UTC time.
    ///
    /// No uniqueness check: repeated inserts for a user add more records.
    #[instrument(skip(self, input), fields(user_id = input.user_id))]
    pub async fn insert(&self, input: NewHealthRecord) -> HealthRecordResult<HealthRecord> {
        let record = self.repository.insert(HealthRecord::new(input)).await?;

        info!("Data inserted for user_id {}", record.user_id);
        Ok(record)
    }

    /// Insert a batch in a single write, stamping every record.
    ///
    /// Returns the number of records the database reports as inserted. An
    /// empty batch is a no-op.
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn bulk_insert(&self, inputs: Vec<NewHealthRecord>) -> HealthRecordResult<u64> {
        let records = inputs.into_iter().map(HealthRecord::new).collect();
        let inserted = self.repository.insert_many(records).await?;

        info!("{} records inserted", inserted);
        Ok(inserted)
    }

    /// Stream the records matching `filter`, in no particular order.
    ///
    /// No match yields an empty stream.
    #[instrument(skip(self))]
    pub async fn query(&self, filter: HealthRecordFilter) -> HealthRecordResult<RecordStream> {
        self.repository.query(filter).await
    }

    /// Merge `update` into the first record of `user_id`.
    ///
    /// Fields not named in `update` are untouched. Returns `false` without
    /// error when no record matches or when `update` names no field.
    #[instrument(skip(self, update), fields(updated_fields = ?update.field_names()))]
    pub async fn update(&self, user_id: i64, update: HealthRecordUpdate) -> HealthRecordResult<bool> {
        if update.is_empty() {
            debug!("Empty update, nothing to write");
            return Ok(false);
        }

        let matched = self.repository.update_first(user_id, update).await?;
        if matched {
            info!("Data for user_id {} updated", user_id);
        } else {
            debug!("No record for user_id {}, update skipped", user_id);
        }
        Ok(matched)
    }

    /// Delete the first record of `user_id`. Returns `false` when none exists.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: i64) -> HealthRecordResult<bool> {
        let deleted = self.repository.delete_first(user_id).await?;
        if deleted {
            info!("Data for user_id {} deleted", user_id);
        } else {
            debug!("No record for user_id {}, delete skipped", user_id);
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    pub async fn count(&self, filter: HealthRecordFilter) -> HealthRecordResult<u64> {
        self.repository.count(filter).await
    }
}

impl<R: HealthRecordRepository> Clone for HealthRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HealthRecordError;
    use crate::repository::MockHealthRecordRepository;
    use chrono::{SubsecRound, Utc};
    use futures_util::{StreamExt, TryStreamExt, stream};
    use mockall::predicate::eq;

    fn new_record(user_id: i64) -> NewHealthRecord {
        NewHealthRecord::new(user_id, 110.5, 72.0)
            .with_activity_level(5000.0)
            .with_food_image_path("/path/to/image1.jpg")
    }

    #[tokio::test]
    async fn test_insert_stamps_timestamp_at_write_time() {
        let mut repo = MockHealthRecordRepository::new();
        repo.expect_insert()
            .times(1)
            .returning(|record| Ok(record));

        let store = HealthRecordStore::new(repo);
        let before = Utc::now().trunc_subsecs(3);
        let stored = store.insert(new_record(1)).await.unwrap();
        let after = Utc::now();

        let timestamp = stored.timestamp.expect("store should stamp the record");
        assert!(timestamp >= before);
        assert!(timestamp <= after);
        assert_eq!(stored.user_id, 1);
        assert_eq!(stored.glucose_level, 110.5);
        assert_eq!(stored.heart_rate, 72.0);
        assert_eq!(stored.activity_level, Some(5000.0));
        assert_eq!(stored.food_image_path.as_deref(), Some("/path/to/image1.jpg"));
    }

    #[tokio::test]
    async fn test_insert_keeps_optional_fields_absent() {
        let mut repo = MockHealthRecordRepository::new();
        repo.expect_insert()
            .withf(|record| record.activity_level.is_none() && record.food_image_path.is_none())
            .times(1)
            .returning(|record| Ok(record));

        let store = HealthRecordStore::new(repo);
        store
            .insert(NewHealthRecord::new(9, 95.0, 61.0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_insert_propagates_persistence_error() {
        let mut repo = MockHealthRecordRepository::new();
        repo.expect_insert()
            .returning(|_| Err(HealthRecordError::Persistence("disk full".to_string())));

        let store = HealthRecordStore::new(repo);
        let err = store.insert(new_record(1)).await.unwrap_err();
        assert!(matches!(err, HealthRecordError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_bulk_insert_stamps_every_record() {
        let mut repo = MockHealthRecordRepository::new();
        let before = Utc::now().trunc_subsecs(3);
        repo.expect_insert_many()
            .withf(move |records| {
                records.len() == 2
                    && records
                        .iter()
                        .all(|r| r.id.is_none() && r.timestamp.is_some_and(|t| t >= before))
                    && records[0].user_id == 2
                    && records[1].user_id == 3
            })
            .times(1)
            .returning(|records| Ok(records.len() as u64));

        let store = HealthRecordStore::new(repo);
        let inserted = store
            .bulk_insert(vec![
                NewHealthRecord::new(2, 120.3, 75.0),
                NewHealthRecord::new(3, 100.8, 80.0),
            ])
            .await
            .unwrap();

        assert_eq!(inserted, 2);
    }

    #[tokio::test]
    async fn test_bulk_insert_propagates_failure_report() {
        let mut repo = MockHealthRecordRepository::new();
        repo.expect_insert_many().returning(|_| {
            Err(HealthRecordError::Persistence(
                "1 of 2 documents failed: duplicate key".to_string(),
            ))
        });

        let store = HealthRecordStore::new(repo);
        let err = store
            .bulk_insert(vec![
                NewHealthRecord::new(2, 120.3, 75.0),
                NewHealthRecord::new(3, 100.8, 80.0),
            ])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("1 of 2 documents failed"));
    }

    #[tokio::test]
    async fn test_query_passes_filter_and_streams_results() {
        let mut repo = MockHealthRecordRepository::new();
        repo.expect_query()
            .with(eq(HealthRecordFilter::for_user(1)))
            .times(1)
            .returning(|_| {
                let record = HealthRecord::new(NewHealthRecord::new(1, 110.5, 72.0));
                Ok(stream::iter(vec![Ok(record)]).boxed())
            });

        let store = HealthRecordStore::new(repo);
        let records: Vec<HealthRecord> = store
            .query(HealthRecordFilter::for_user(1))
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, 1);
    }

    #[tokio::test]
    async fn test_query_no_match_is_empty_stream() {
        let mut repo = MockHealthRecordRepository::new();
        repo.expect_query()
            .returning(|_| Ok(stream::empty().boxed()));

        let store = HealthRecordStore::new(repo);
        let mut records = store.query(HealthRecordFilter::for_user(42)).await.unwrap();
        assert!(records.next().await.is_none());
    }

    #[tokio::test]
    async fn test_update_forwards_only_named_fields() {
        let mut repo = MockHealthRecordRepository::new();
        repo.expect_update_first()
            .withf(|user_id, update| {
                *user_id == 1
                    && update.glucose_level == Some(115.0)
                    && update.heart_rate.is_none()
                    && update.activity_level.is_none()
                    && update.food_image_path.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(true));

        let store = HealthRecordStore::new(repo);
        let update = HealthRecordUpdate {
            glucose_level: Some(115.0),
            ..Default::default()
        };
        assert!(store.update(1, update).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_no_match_is_not_an_error() {
        let mut repo = MockHealthRecordRepository::new();
        repo.expect_update_first().returning(|_, _| Ok(false));

        let store = HealthRecordStore::new(repo);
        let update = HealthRecordUpdate {
            heart_rate: Some(70.0),
            ..Default::default()
        };
        assert!(!store.update(404, update).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_update_skips_repository() {
        let mut repo = MockHealthRecordRepository::new();
        repo.expect_update_first().never();

        let store = HealthRecordStore::new(repo);
        assert!(!store.update(1, HealthRecordUpdate::default()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_reports_match() {
        let mut repo = MockHealthRecordRepository::new();
        repo.expect_delete_first()
            .with(eq(3))
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_delete_first()
            .with(eq(404))
            .times(1)
            .returning(|_| Ok(false));

        let store = HealthRecordStore::new(repo);
        assert!(store.delete(3).await.unwrap());
        assert!(!store.delete(404).await.unwrap());
    }

    #[tokio::test]
    async fn test_count_propagates_query_error() {
        let mut repo = MockHealthRecordRepository::new();
        repo.expect_count()
            .returning(|_| Err(HealthRecordError::Query("cursor killed".to_string())));

        let store = HealthRecordStore::new(repo);
        let err = store.count(HealthRecordFilter::all()).await.unwrap_err();
        assert!(matches!(err, HealthRecordError::Query(_)));
    }
}
