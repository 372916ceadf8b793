//! Constants used throughout the crate
//!
//! This module centralizes file names, defaults and user-facing messages
//! so the library and the command-line consumer stay consistent.

// Application identity
pub const APP_NAME: &str = "entry-repo";
pub const CONFIG_FILE_NAME: &str = "entry-repo.toml";
pub const XDG_CONFIG_FILE_NAME: &str = "config.toml";
pub const DATABASE_FILE_NAME: &str = "entries.sqlite";
pub const LOG_FILE_NAME: &str = "entry-repo.log";

// Store
/// Capacity of the per-store change notification channel.
/// Slow observers that fall further behind get a coalesced `Lagged` wake-up.
pub const CHANGE_CHANNEL_CAPACITY: usize = 64;
/// Row key of the revision counter in `store_meta`
pub const STORE_META_KEY: &str = "entries";
/// Default poll interval of the external change watcher
pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 1_000;
/// Upper bound for the watcher poll interval (one hour)
pub const MAX_WATCH_INTERVAL_MS: u64 = 60 * 60 * 1_000;
/// Maximum pooled connections for file-backed databases
pub const SQLITE_MAX_CONNECTIONS: u32 = 4;

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

// Success Messages
pub const SUCCESS_ENTRY_ADDED: &str = "✅ Entry added";
pub const SUCCESS_ENTRY_DELETED: &str = "✅ Entry deleted";
pub const SUCCESS_ENTRY_UPDATED: &str = "✅ Entry updated";
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";

// Error Messages
pub const ERROR_FETCH_FAILED: &str = "❌ Failed to fetch entries";
pub const ERROR_ENTRY_NOT_FOUND: &str = "❌ No entry with id";
pub const ERROR_INVALID_ENTRY_ID: &str = "❌ Invalid entry id";

// UI Messages
pub const LIST_EMPTY: &str = "No entries yet. Run `entry-repo add` to create one.";
pub const WATCH_HINT: &str = "👀 Watching for changes, press Ctrl-C to stop";
