//! entry-repo - storage-agnostic entries with live queries
//!
//! This library lets a consumer (typically a UI layer) observe and mutate a
//! persisted collection of entries without depending on a concrete storage
//! engine. A live query keeps an in-memory copy of the stored entries and
//! refreshes it whenever the store reports a change, including changes made
//! by other processes.
//!
//! # Modules
//!
//! * [`entry`] - The data contract every stored entry satisfies
//! * [`query`] - Filter and sort specification
//! * [`storage`] - Store contract plus SQLite and in-memory stores
//! * [`live_query`] - Cached, self-refreshing query results
//! * [`repository`] - The consumer-facing repository surface
//! * [`preview`] - Fixed-list stand-ins for tests and previews
//! * [`config`] - Application configuration management
//! * [`logger`] - File logging setup
//!
//! # Example
//! ```rust,no_run
//! use entry_repo::repository::{EntryRepository, SqliteEntryRepository};
//! use entry_repo::storage::SqliteEntryStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = SqliteEntryStore::open_in_memory().await?;
//! let repository = SqliteEntryRepository::new(store);
//!
//! repository.fetch_models().await?;
//! let mut models = repository.subscribe();
//! repository.add_entry().await?;
//!
//! // The store's change notification refreshes the models shortly after
//! models.changed().await?;
//! assert_eq!(repository.models().len(), 1);
//! # Ok(())
//! # }
//! ```

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// The entry data contract
pub mod entry;

/// Store and fetch error types
pub mod error;

/// Cached, self-refreshing query results
pub mod live_query;

/// Logging setup
pub mod logger;

/// Fixed-list stand-ins for the repository contract
pub mod preview;

/// Query specification
pub mod query;

/// Table-level database operations
pub mod repositories;

/// Consumer-facing repository surface
pub mod repository;

/// Store contract and implementations
pub mod storage;

/// Utility functions for timestamp formatting
pub mod utils;

pub use entry::Entry;
pub use error::{FetchError, StoreError};
pub use live_query::LiveQuery;
pub use preview::{PreviewEntry, PreviewEntryRepository};
pub use query::{EntryField, EntryQuery, Predicate, SortDirection, SortKey};
pub use repository::{EntryRepository, SqliteEntryRepository, StoreEntryRepository};
pub use storage::{EntryStore, InMemoryEntryStore, SqliteEntryStore, StoreChange};
