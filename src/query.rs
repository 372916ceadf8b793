//! Query specification shared by every store.
//!
//! An [`EntryQuery`] is an optional [`Predicate`] plus an ordered list of
//! [`SortKey`]s. SQL-backed stores translate it into a `SELECT`; in-memory
//! stores evaluate it directly with [`EntryQuery::apply`]. Either way, rows
//! that compare equal on every declared key keep their insertion order.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::entry::Entry;

/// Entry fields a query can filter or sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryField {
    CreatedAt,
    Enabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One `(field, direction)` pair. Earlier keys take priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: EntryField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(field: EntryField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: EntryField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    fn compare<E: Entry>(&self, a: &E, b: &E) -> Ordering {
        let ordering = match self.field {
            EntryField::CreatedAt => a.created_at().cmp(&b.created_at()),
            EntryField::Enabled => a.is_enabled().cmp(&b.is_enabled()),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Boolean filter over entry fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    IsEnabled(bool),
    /// `created_at < t`
    CreatedBefore(DateTime<Utc>),
    /// `created_at >= t`
    CreatedAtOrAfter(DateTime<Utc>),
    /// Every inner predicate holds (true when empty).
    All(Vec<Predicate>),
    /// At least one inner predicate holds (false when empty).
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn matches<E: Entry>(&self, entry: &E) -> bool {
        match self {
            Predicate::IsEnabled(enabled) => entry.is_enabled() == *enabled,
            Predicate::CreatedBefore(t) => entry.created_at() < *t,
            Predicate::CreatedAtOrAfter(t) => entry.created_at() >= *t,
            Predicate::All(inner) => inner.iter().all(|p| p.matches(entry)),
            Predicate::Any(inner) => inner.iter().any(|p| p.matches(entry)),
            Predicate::Not(inner) => !inner.matches(entry),
        }
    }
}

/// Filter and ordering for one live query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryQuery {
    predicate: Option<Predicate>,
    sort_keys: Vec<SortKey>,
}

impl EntryQuery {
    /// Matches everything, store order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches everything, most recently created first.
    pub fn newest_first() -> Self {
        Self::new().sort_by(SortKey::descending(EntryField::CreatedAt))
    }

    /// Sets the predicate, replacing any previous one.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Appends a sort key with lower priority than the existing ones.
    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort_keys.push(key);
        self
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    pub fn matches<E: Entry>(&self, entry: &E) -> bool {
        self.predicate.as_ref().map_or(true, |p| p.matches(entry))
    }

    /// Compares two entries on the declared keys only.
    pub fn compare<E: Entry>(&self, a: &E, b: &E) -> Ordering {
        self.sort_keys
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Filters and sorts entries given in store order.
    ///
    /// The sort is stable, so ties keep the order they came in.
    pub fn apply<E, I>(&self, entries: I) -> Vec<E>
    where
        E: Entry,
        I: IntoIterator<Item = E>,
    {
        let mut matching: Vec<E> = entries.into_iter().filter(|e| self.matches(e)).collect();
        matching.sort_by(|a, b| self.compare(a, b));
        matching
    }
}
