//! Live query observer.
//!
//! A [`LiveQuery`] keeps the result of one [`EntryQuery`] cached in memory and
//! keeps it in step with the store:
//!
//! - [`LiveQuery::fetch`] runs the query now and swaps the cache.
//! - A background task subscribed to the store's change channel re-runs the
//!   query whenever the store says something may have changed.
//!
//! The cache is an `Arc<Vec<E>>` held in a `tokio::sync::watch` channel, so
//! readers always get a complete snapshot and anyone can [`subscribe`] to be
//! told when it is replaced.
//!
//! [`subscribe`]: LiveQuery::subscribe

use std::sync::{Arc, Mutex, Weak};

use log::{debug, trace, warn};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::error::FetchError;
use crate::query::EntryQuery;
use crate::storage::{EntryStore, StoreChange};

/// Snapshot of the cached result set.
pub type Results<E> = Arc<Vec<E>>;

/// Cached, self-refreshing result of one query against one store.
///
/// Must be created inside a tokio runtime: construction spawns the task that
/// listens for store changes. Dropping the `LiveQuery` stops that task and
/// releases the subscription.
pub struct LiveQuery<S: EntryStore> {
    shared: Arc<Shared<S>>,
    listener: JoinHandle<()>,
}

struct Shared<S: EntryStore> {
    store: S,
    query: EntryQuery,
    results: watch::Sender<Results<S::Entry>>,
    /// Serializes fetches so an older result never overwrites a newer one.
    fetch_lock: tokio::sync::Mutex<()>,
    last_refresh_error: Mutex<Option<FetchError>>,
}

impl<S: EntryStore> LiveQuery<S> {
    pub fn new(store: S, query: EntryQuery) -> Self {
        let changes = store.subscribe();
        let (results, _) = watch::channel(Arc::new(Vec::new()));

        let shared = Arc::new(Shared {
            store,
            query,
            results,
            fetch_lock: tokio::sync::Mutex::new(()),
            last_refresh_error: Mutex::new(None),
        });
        let listener = spawn_listener(Arc::downgrade(&shared), changes);

        Self { shared, listener }
    }

    /// Run the query and replace the cached results.
    ///
    /// On error the previous results stay in place.
    pub async fn fetch(&self) -> Result<(), FetchError> {
        self.shared.fetch().await
    }

    /// Results of the last successful fetch. Never touches the store.
    pub fn current_results(&self) -> Results<S::Entry> {
        self.shared.results.borrow().clone()
    }

    /// Receiver that is marked changed whenever the cached results are
    /// replaced with different content. Drop it to unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<Results<S::Entry>> {
        self.shared.results.subscribe()
    }

    /// Error of the most recent failed background refresh, cleared by the
    /// next successful fetch.
    pub fn last_refresh_error(&self) -> Option<FetchError> {
        self.shared
            .last_refresh_error
            .lock()
            .map(|error| error.clone())
            .unwrap_or(None)
    }

    pub fn query(&self) -> &EntryQuery {
        &self.shared.query
    }
}

impl<S: EntryStore> Drop for LiveQuery<S> {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

impl<S: EntryStore> Shared<S> {
    async fn fetch(&self) -> Result<(), FetchError> {
        let _guard = self.fetch_lock.lock().await;

        let entries = self.store.query(&self.query).await?;
        debug!("Fetched {} entries", entries.len());

        self.set_refresh_error(None);
        self.results.send_if_modified(|current| {
            if **current == entries {
                false
            } else {
                *current = Arc::new(entries);
                true
            }
        });
        Ok(())
    }

    /// Notification-driven refresh. Change notifications are advisory, so a
    /// failure here keeps the stale results and waits for the next trigger.
    async fn refresh(&self) {
        match self.fetch().await {
            Ok(()) => {}
            Err(err) => {
                warn!(
                    "Background refresh failed, keeping {} cached entries: {}",
                    self.results.borrow().len(),
                    err
                );
                self.set_refresh_error(Some(err));
            }
        }
    }

    fn set_refresh_error(&self, error: Option<FetchError>) {
        if let Ok(mut last) = self.last_refresh_error.lock() {
            *last = error;
        }
    }
}

fn spawn_listener<S: EntryStore>(
    shared: Weak<Shared<S>>,
    mut changes: broadcast::Receiver<StoreChange>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) => trace!("Store change {:?}, refreshing", change),
                Err(RecvError::Lagged(skipped)) => debug!("Missed {} store changes, refreshing", skipped),
                Err(RecvError::Closed) => break,
            }

            // One query answers every notification already queued
            loop {
                match changes.try_recv() {
                    Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                    Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                }
            }

            let Some(shared) = shared.upgrade() else {
                break;
            };
            shared.refresh().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::preview::PreviewEntry;
    use crate::storage::InMemoryEntryStore;
    use chrono::{TimeZone, Utc};

    fn entry(secs: i64) -> PreviewEntry {
        PreviewEntry::with_state(Utc.timestamp_opt(secs, 0).unwrap(), false)
    }

    #[tokio::test]
    async fn starts_empty_and_fills_on_fetch() {
        let store = InMemoryEntryStore::with_entries(vec![entry(1), entry(2)]);
        let live = LiveQuery::new(store, EntryQuery::newest_first());

        assert!(live.current_results().is_empty());
        live.fetch().await.unwrap();

        let results = live.current_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].created_at().timestamp(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_results() {
        let store = InMemoryEntryStore::with_entries(vec![entry(1)]);
        let live = LiveQuery::new(store.clone(), EntryQuery::new());
        live.fetch().await.unwrap();
        let before = live.current_results();

        store.fail_queries(true);
        assert!(live.fetch().await.is_err());

        assert_eq!(*live.current_results(), *before);
        // Explicit fetch failures go to the caller, not the background slot
        assert!(live.last_refresh_error().is_none());
    }

    #[tokio::test]
    async fn unchanged_results_do_not_wake_subscribers() {
        let store = InMemoryEntryStore::with_entries(vec![entry(1)]);
        let live = LiveQuery::new(store, EntryQuery::new());
        let mut results = live.subscribe();

        live.fetch().await.unwrap();
        assert!(results.has_changed().unwrap());
        results.borrow_and_update();

        live.fetch().await.unwrap();
        assert!(!results.has_changed().unwrap());
    }

    #[tokio::test]
    async fn dropping_releases_the_subscription() {
        let store = InMemoryEntryStore::<PreviewEntry>::new();
        let live = LiveQuery::new(store.clone(), EntryQuery::new());
        assert_eq!(store.subscriber_count(), 1);

        drop(live);
        for _ in 0..100 {
            if store.subscriber_count() == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(store.subscriber_count(), 0);
    }
}
