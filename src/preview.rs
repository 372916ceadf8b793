//! Preview stand-ins for contexts without a real store.
//!
//! [`PreviewEntryRepository`] satisfies the [`EntryRepository`] contract over
//! a fixed list: it never persists, never notifies, and every mutation is a
//! successful no-op. Use it for isolated component rendering and tests that
//! only need something to read from.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use crate::entry::Entry;
use crate::error::{FetchError, StoreError};
use crate::repository::EntryRepository;

/// Plain in-memory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry {
    id: Uuid,
    created_at: DateTime<Utc>,
    is_enabled: bool,
}

impl PreviewEntry {
    /// Entry with a fresh identity and the given state.
    pub fn with_state(created_at: DateTime<Utc>, is_enabled: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            is_enabled,
        }
    }
}

impl Entry for PreviewEntry {
    type Id = Uuid;

    fn new(created_at: DateTime<Utc>) -> Self {
        Self::with_state(created_at, false)
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.is_enabled = enabled;
    }
}

/// Repository over a fixed list of entries.
pub struct PreviewEntryRepository<E: Entry = PreviewEntry> {
    models: watch::Sender<Arc<Vec<E>>>,
}

impl<E: Entry> PreviewEntryRepository<E> {
    pub fn new(models: Vec<E>) -> Self {
        let (models, _) = watch::channel(Arc::new(models));
        Self { models }
    }
}

impl<E: Entry> Default for PreviewEntryRepository<E> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl<E: Entry> EntryRepository for PreviewEntryRepository<E> {
    type Entry = E;

    fn models(&self) -> Arc<Vec<E>> {
        self.models.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Arc<Vec<E>>> {
        self.models.subscribe()
    }

    async fn add_entry(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete_entry(&self, _entry: &E) -> Result<(), StoreError> {
        Ok(())
    }

    async fn set_enabled(&self, _entry: &E, _enabled: bool) -> Result<(), StoreError> {
        Ok(())
    }

    async fn fetch_models(&self) -> Result<(), FetchError> {
        Ok(())
    }
}
