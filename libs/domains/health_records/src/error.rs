//! Health record domain error types

use database::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HealthRecordError {
    /// The datastore could not be reached or the client could not be built
    #[error("Connection error: {0}")]
    Connection(String),

    /// A write (insert, bulk insert, update, delete) failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A read (query, cursor iteration, count) failed
    #[error("Query error: {0}")]
    Query(String),
}

pub type HealthRecordResult<T> = Result<T, HealthRecordError>;

impl HealthRecordError {
    pub(crate) fn persistence(err: mongodb::error::Error) -> Self {
        Self::Persistence(err.to_string())
    }

    pub(crate) fn query(err: mongodb::error::Error) -> Self {
        Self::Query(err.to_string())
    }
}

impl From<DatabaseError> for HealthRecordError {
    fn from(err: DatabaseError) -> Self {
        HealthRecordError::Connection(err.to_string())
    }
}
