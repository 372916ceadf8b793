//! Consumer-facing repository surface.
//!
//! [`EntryRepository`] is what a UI layer (or any other consumer) talks to:
//! read the current entries, create and delete entries, flip the enabled
//! flag, and trigger a fetch. It says nothing about where entries live, so
//! a [`StoreEntryRepository`] over a real store and a
//! [`PreviewEntryRepository`](crate::preview::PreviewEntryRepository) over a
//! fixed list are interchangeable.
//!
//! Writes go to the store only. The cached entries catch up when the store's
//! change notification reaches the live query, so `models()` can lag a write
//! by one notification round-trip. Call `fetch_models()` to refresh
//! explicitly, typically once when the consumer is first shown.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use tokio::sync::watch;

use crate::entry::Entry;
use crate::error::{FetchError, StoreError};
use crate::live_query::LiveQuery;
use crate::query::EntryQuery;
use crate::storage::{EntryStore, SqliteEntryStore};

#[async_trait]
pub trait EntryRepository: Send + Sync {
    type Entry: Entry;

    /// Entries as of the last successful fetch. Pure read.
    fn models(&self) -> Arc<Vec<Self::Entry>>;

    /// Receiver that is marked changed whenever `models()` changes.
    fn subscribe(&self) -> watch::Receiver<Arc<Vec<Self::Entry>>>;

    /// Store a new disabled entry created now.
    async fn add_entry(&self) -> Result<(), StoreError>;

    /// Remove an entry by identity. Entries no longer stored are ignored.
    async fn delete_entry(&self, entry: &Self::Entry) -> Result<(), StoreError>;

    /// Write the entry's enabled flag through to the store.
    async fn set_enabled(&self, entry: &Self::Entry, enabled: bool) -> Result<(), StoreError>;

    /// Re-run the query now. On error `models()` is left as it was.
    async fn fetch_models(&self) -> Result<(), FetchError>;
}

/// Repository backed by one store handle and one live query.
pub struct StoreEntryRepository<S: EntryStore> {
    store: S,
    live_query: LiveQuery<S>,
}

/// Repository over the SQLite store.
pub type SqliteEntryRepository = StoreEntryRepository<SqliteEntryStore>;

impl<S: EntryStore> StoreEntryRepository<S> {
    /// All entries, most recently created first.
    pub fn new(store: S) -> Self {
        Self::with_query(store, EntryQuery::newest_first())
    }

    pub fn with_query(store: S, query: EntryQuery) -> Self {
        let live_query = LiveQuery::new(store.clone(), query);
        Self { store, live_query }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// See [`LiveQuery::last_refresh_error`].
    pub fn last_refresh_error(&self) -> Option<FetchError> {
        self.live_query.last_refresh_error()
    }
}

#[async_trait]
impl<S: EntryStore> EntryRepository for StoreEntryRepository<S> {
    type Entry = S::Entry;

    fn models(&self) -> Arc<Vec<S::Entry>> {
        self.live_query.current_results()
    }

    fn subscribe(&self) -> watch::Receiver<Arc<Vec<S::Entry>>> {
        self.live_query.subscribe()
    }

    async fn add_entry(&self) -> Result<(), StoreError> {
        let entry = <S::Entry as Entry>::new(Utc::now());
        debug!("Adding entry {:?}", entry.id());
        self.store.insert(entry).await
    }

    async fn delete_entry(&self, entry: &S::Entry) -> Result<(), StoreError> {
        self.store.delete(&entry.id()).await
    }

    async fn set_enabled(&self, entry: &S::Entry, enabled: bool) -> Result<(), StoreError> {
        self.store.set_enabled(&entry.id(), enabled).await
    }

    async fn fetch_models(&self) -> Result<(), FetchError> {
        self.live_query.fetch().await
    }
}
