//! Error types for store access.
//!
//! [`StoreError`] is what a store raises when an operation fails.
//! [`FetchError`] is the one error kind the live query layer reports: a query
//! against the store could not be executed.

use std::sync::Arc;

use sea_orm::DbErr;

/// Errors raised by [`EntryStore`](crate::storage::EntryStore) implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[source] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupted store data: {0}")]
    Corrupted(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Type(message) | DbErr::Json(message) => StoreError::Corrupted(message),
            DbErr::ConnectionAcquire(err) => StoreError::Unavailable(err.to_string()),
            DbErr::Conn(err) => StoreError::Unavailable(err.to_string()),
            other => StoreError::Database(other),
        }
    }
}

/// A query against the store failed.
///
/// Cheap to clone so the most recent background failure can be kept around
/// and handed out to anyone who asks.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to fetch entries: {source}")]
pub struct FetchError {
    #[source]
    source: Arc<StoreError>,
}

impl FetchError {
    /// The store error that made the query fail.
    pub fn store_error(&self) -> &StoreError {
        &self.source
    }
}

impl From<StoreError> for FetchError {
    fn from(err: StoreError) -> Self {
        Self { source: Arc::new(err) }
    }
}
