//! Table-level database operations.
//!
//! These structs encapsulate SeaORM queries following the Data Mapper
//! pattern: entities stay plain data models, the queries live here and take
//! any `ConnectionTrait` so they run equally on a connection or inside a
//! transaction.

pub mod entry;
pub mod meta;

pub use entry::EntryTable;
pub use meta::MetaTable;
