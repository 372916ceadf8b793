//! In-memory entry store.
//!
//! Holds entries in insertion order behind a lock and notifies subscribers on
//! every effective write, just like the SQLite store, but nothing is
//! persisted. Query failures can be switched on to exercise error paths.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{ChangeNotifier, EntryId, EntryStore, StoreChange};
use crate::constants::CHANGE_CHANNEL_CAPACITY;
use crate::entry::Entry;
use crate::error::StoreError;
use crate::preview::PreviewEntry;
use crate::query::EntryQuery;

#[derive(Clone)]
pub struct InMemoryEntryStore<E: Entry = PreviewEntry> {
    entries: Arc<RwLock<Vec<E>>>,
    notifier: ChangeNotifier,
    fail_queries: Arc<AtomicBool>,
    queries_served: Arc<AtomicUsize>,
}

impl<E: Entry> InMemoryEntryStore<E> {
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    /// Start with entries already stored, in the given insertion order.
    pub fn with_entries(entries: Vec<E>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
            notifier: ChangeNotifier::new(CHANGE_CHANNEL_CAPACITY),
            fail_queries: Arc::new(AtomicBool::new(false)),
            queries_served: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every following query fail (or succeed again).
    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Number of queries answered or rejected so far.
    pub fn queries_served(&self) -> usize {
        self.queries_served.load(Ordering::SeqCst)
    }

    /// Snapshot of everything stored, in insertion order.
    pub fn entries(&self) -> Vec<E> {
        self.entries.read().map(|entries| entries.clone()).unwrap_or_default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<E>>, StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::Unavailable("entry lock poisoned".to_string()))
    }
}

impl<E: Entry> Default for InMemoryEntryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entry> EntryStore for InMemoryEntryStore<E> {
    type Entry = E;

    async fn insert(&self, entry: E) -> Result<(), StoreError> {
        {
            let mut entries = self.write()?;
            if entries.iter().any(|existing| existing.id() == entry.id()) {
                return Err(StoreError::Duplicate(format!("{:?}", entry.id())));
            }
            entries.push(entry);
        }
        self.notifier.notify(StoreChange::Inserted);
        Ok(())
    }

    async fn delete(&self, id: &EntryId<Self>) -> Result<(), StoreError> {
        let removed = {
            let mut entries = self.write()?;
            let before = entries.len();
            entries.retain(|entry| entry.id() != *id);
            entries.len() != before
        };
        if removed {
            self.notifier.notify(StoreChange::Deleted);
        }
        Ok(())
    }

    async fn set_enabled(&self, id: &EntryId<Self>, enabled: bool) -> Result<(), StoreError> {
        let updated = {
            let mut entries = self.write()?;
            match entries.iter_mut().find(|entry| entry.id() == *id) {
                Some(entry) => {
                    entry.set_enabled(enabled);
                    true
                }
                None => false,
            }
        };
        if updated {
            self.notifier.notify(StoreChange::Updated);
        }
        Ok(())
    }

    async fn query(&self, query: &EntryQuery) -> Result<Vec<E>, StoreError> {
        self.queries_served.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("queries are switched off".to_string()));
        }

        let snapshot = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("entry lock poisoned".to_string()))?
            .clone();
        Ok(query.apply(snapshot))
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.notifier.subscribe()
    }

    fn notify_external_change(&self) {
        self.notifier.notify(StoreChange::External);
    }
}
