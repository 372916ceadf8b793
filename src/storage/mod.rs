//! Store abstraction and implementations.
//!
//! This module defines the [`EntryStore`] contract the live query layer is
//! written against, the change notification channel every store owns, and
//! two implementations:
//! - [`SqliteEntryStore`] - persistent (or in-memory) SQLite via SeaORM
//! - [`InMemoryEntryStore`] - plain memory, for tests and previews

pub mod db;
pub mod memory;

use async_trait::async_trait;
use log::trace;
use tokio::sync::broadcast;

use crate::entry::Entry;
use crate::error::StoreError;
use crate::query::EntryQuery;

pub use db::SqliteEntryStore;
pub use memory::InMemoryEntryStore;

/// Identity type of the entries held by store `S`.
pub type EntryId<S> = <<S as EntryStore>::Entry as Entry>::Id;

/// What a change notification reports.
///
/// Notifications are advisory: they may be duplicated, delayed or coalesced,
/// and a receiver should treat every variant as "re-run your query".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Inserted,
    Deleted,
    Updated,
    /// Content may have changed outside this handle, e.g. another process.
    External,
}

/// Broadcast channel for [`StoreChange`]s, shared by all clones of a store.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<StoreChange>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to every current subscriber.
    pub fn notify(&self, change: StoreChange) {
        if self.sender.send(change).is_err() {
            // No subscribers right now - nothing to refresh
            trace!("No subscribers for store change {:?}", change);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.sender.subscribe()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Storage backend holding one kind of entry.
///
/// Handles are cheap to clone; every clone shares the same underlying data
/// and the same change channel.
#[async_trait]
pub trait EntryStore: Clone + Send + Sync + 'static {
    type Entry: Entry;

    /// Write a new entry and notify subscribers.
    async fn insert(&self, entry: Self::Entry) -> Result<(), StoreError>;

    /// Remove an entry by identity. Unknown identities are a no-op.
    async fn delete(&self, id: &EntryId<Self>) -> Result<(), StoreError>;

    /// Update the enabled flag. Unknown identities are a no-op.
    async fn set_enabled(&self, id: &EntryId<Self>, enabled: bool) -> Result<(), StoreError>;

    /// Matching entries, ordered by the query's sort keys then insertion order.
    async fn query(&self, query: &EntryQuery) -> Result<Vec<Self::Entry>, StoreError>;

    /// Register for change notifications. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;

    /// Signal that the content may have changed behind this handle's back.
    fn notify_external_change(&self);
}
