//! Local persistence
//!
//! - kv: key-value record stores (file-backed and in-memory)
//! - favorites: the favorite-movie set kept in one of those stores

pub mod favorites;
pub mod kv;

pub use favorites::{FavoriteSet, FavoritesStore, FAVORITES_KEY};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore, PersistenceError};
