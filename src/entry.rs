//! The data contract every storable entry satisfies.

use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};

/// A stored record with a stable identity, an immutable creation timestamp
/// and a single mutable flag.
///
/// Equality is structural: two entries are equal when identity, timestamp
/// and flag all match. Identity and `created_at` never change once an entry
/// is constructed; `enabled` is the only field a consumer may write.
pub trait Entry: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Identity used for deletion, diffing and deduplication.
    type Id: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Builds a new, disabled entry with a fresh identity.
    fn new(created_at: DateTime<Utc>) -> Self;

    fn id(&self) -> Self::Id;

    fn created_at(&self) -> DateTime<Utc>;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);
}
