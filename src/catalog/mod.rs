//! Configuration-item catalog: row types, the store seam, and its backends.

#[cfg(feature = "postgrest")]
mod postgrest;
mod record;
mod store;

#[cfg(feature = "postgrest")]
pub use postgrest::PostgrestCatalog;
pub use record::{
    ConfigurationItem, ConfigurationItemInput, ConfigurationItemRecord, DEFAULT_YEAR, ItemForm,
};
pub use store::{CatalogStore, MemoryCatalog, list_items};
