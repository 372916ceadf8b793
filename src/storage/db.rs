use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, TransactionTrait};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use super::{ChangeNotifier, EntryStore, StoreChange};
use crate::config::StoreConfig;
use crate::constants::{CHANGE_CHANNEL_CAPACITY, SQLITE_MAX_CONNECTIONS};
use crate::entities::{entry, store_meta};
use crate::error::StoreError;
use crate::query::EntryQuery;
use crate::repositories::{EntryTable, MetaTable};

/// Pooled connections to an in-memory database each get their own empty
/// database, so the pool is pinned to one connection that is never recycled.
const IN_MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// SQLite-backed entry store.
///
/// Every write runs in a transaction that also bumps the `store_meta`
/// revision. When a watch interval is configured, a background task polls
/// that revision and broadcasts [`StoreChange::External`] whenever somebody
/// else (another process, or another independently opened handle) wrote to
/// the same database file.
#[derive(Clone)]
pub struct SqliteEntryStore {
    conn: DatabaseConnection,
    notifier: ChangeNotifier,
    seen_revision: Arc<AtomicI64>,
    _watcher: Option<Arc<WatcherGuard>>,
}

/// Stops the revision watcher when the last store handle goes away.
struct WatcherGuard(JoinHandle<()>);

impl Drop for WatcherGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl SqliteEntryStore {
    /// Open the store described by the configuration.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        if config.in_memory {
            return Self::open_in_memory().await;
        }

        let path = config
            .database_path()
            .ok_or_else(|| StoreError::Unavailable("could not determine data directory".to_string()))?;
        Self::open_path(&path, config.watch_interval()).await
    }

    /// Open (creating if needed) a database file.
    pub async fn open_path(path: &Path, watch_interval: Option<Duration>) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
        options
            .min_connections(1)
            .max_connections(SQLITE_MAX_CONNECTIONS)
            .sqlx_logging(false);

        let conn = Database::connect(options).await?;
        info!("Opened entry store at {}", path.display());
        Self::initialize(conn, watch_interval).await
    }

    /// Open a private in-memory database. Nothing is persisted and there is
    /// nobody else to watch for, so no watcher is started.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(IN_MEMORY_CONNECTION_LIFETIME)
            .max_lifetime(IN_MEMORY_CONNECTION_LIFETIME)
            .sqlx_logging(false);

        let conn = Database::connect(options).await?;
        info!("Opened in-memory entry store");
        Self::initialize(conn, None).await
    }

    async fn initialize(conn: DatabaseConnection, watch_interval: Option<Duration>) -> Result<Self, StoreError> {
        init_schema(&conn).await?;

        let notifier = ChangeNotifier::new(CHANGE_CHANNEL_CAPACITY);
        let seen_revision = Arc::new(AtomicI64::new(MetaTable::revision(&conn).await?));

        let watcher = watch_interval.map(|interval| {
            let handle = spawn_revision_watcher(conn.clone(), notifier.clone(), seen_revision.clone(), interval);
            Arc::new(WatcherGuard(handle))
        });

        Ok(Self {
            conn,
            notifier,
            seen_revision,
            _watcher: watcher,
        })
    }

    /// Look up a single entry.
    pub async fn get(&self, uuid: &Uuid) -> Result<Option<entry::Model>, StoreError> {
        Ok(EntryTable::get_by_id(&self.conn, uuid).await?)
    }

    /// Current value of the write revision counter.
    pub async fn revision(&self) -> Result<i64, StoreError> {
        Ok(MetaTable::revision(&self.conn).await?)
    }

    /// Number of live change subscriptions on this store.
    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }

    /// Record a revision produced by this handle so the watcher does not
    /// report it as external, then tell subscribers.
    fn committed(&self, revision: i64, change: StoreChange) {
        self.seen_revision.fetch_max(revision, Ordering::SeqCst);
        self.notifier.notify(change);
    }
}

#[async_trait]
impl EntryStore for SqliteEntryStore {
    type Entry = entry::Model;

    async fn insert(&self, entry: entry::Model) -> Result<(), StoreError> {
        let uuid = entry.uuid;
        let txn = self.conn.begin().await?;
        EntryTable::insert(&txn, entry).await?;
        let revision = MetaTable::bump(&txn).await?;
        txn.commit().await?;

        debug!("Inserted entry {} (revision {})", uuid, revision);
        self.committed(revision, StoreChange::Inserted);
        Ok(())
    }

    async fn delete(&self, uuid: &Uuid) -> Result<(), StoreError> {
        let txn = self.conn.begin().await?;
        if EntryTable::delete(&txn, uuid).await? == 0 {
            txn.rollback().await?;
            debug!("Delete of unknown entry {} ignored", uuid);
            return Ok(());
        }
        let revision = MetaTable::bump(&txn).await?;
        txn.commit().await?;

        debug!("Deleted entry {} (revision {})", uuid, revision);
        self.committed(revision, StoreChange::Deleted);
        Ok(())
    }

    async fn set_enabled(&self, uuid: &Uuid, enabled: bool) -> Result<(), StoreError> {
        let txn = self.conn.begin().await?;
        if EntryTable::set_enabled(&txn, uuid, enabled).await? == 0 {
            txn.rollback().await?;
            debug!("Update of unknown entry {} ignored", uuid);
            return Ok(());
        }
        let revision = MetaTable::bump(&txn).await?;
        txn.commit().await?;

        debug!("Set entry {} enabled={} (revision {})", uuid, enabled, revision);
        self.committed(revision, StoreChange::Updated);
        Ok(())
    }

    async fn query(&self, query: &EntryQuery) -> Result<Vec<entry::Model>, StoreError> {
        Ok(EntryTable::find(&self.conn, query).await?)
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.notifier.subscribe()
    }

    fn notify_external_change(&self) {
        self.notifier.notify(StoreChange::External);
    }
}

/// Create tables and indexes that do not exist yet.
async fn init_schema(conn: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);

    let mut entries = schema.create_table_from_entity(entry::Entity);
    entries.if_not_exists();
    conn.execute(backend.build(&entries)).await?;

    for mut index in schema.create_index_from_entity(entry::Entity) {
        index.if_not_exists();
        conn.execute(backend.build(&index)).await?;
    }

    let mut meta = schema.create_table_from_entity(store_meta::Entity);
    meta.if_not_exists();
    conn.execute(backend.build(&meta)).await?;

    MetaTable::ensure(conn).await
}

/// Poll the revision counter and report writes this process did not make.
fn spawn_revision_watcher(
    conn: DatabaseConnection,
    notifier: ChangeNotifier,
    seen_revision: Arc<AtomicI64>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match MetaTable::revision(&conn).await {
                Ok(revision) => {
                    let previous = seen_revision.fetch_max(revision, Ordering::SeqCst);
                    if revision > previous {
                        debug!("Store revision moved {} -> {} externally", previous, revision);
                        notifier.notify(StoreChange::External);
                    }
                }
                Err(e) => warn!("Failed to poll store revision: {}", e),
            }
        }
    })
}
