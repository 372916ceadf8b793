pub mod entry;
pub mod store_meta;

pub use entry::Entity as Entry;
pub use store_meta::Entity as StoreMeta;
