//! Cache store domain models and traits

mod config;
mod entry;
mod key;
mod repository;

pub use config::CacheSettings;
pub(crate) use config::validate_capacity;
pub use entry::CacheEntry;
pub use key::{normalize_key, CacheKey};
pub use repository::CacheStore;
