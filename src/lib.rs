//! CineDeck - movie catalog client
//!
//! Lists, searches, categorizes and bookmarks movies from a remote catalog.
//! The interesting part is keeping three sources of state consistent:
//! catalog responses, the locally persisted favorites, and transient
//! search/selection state.
//!
//! # Modules
//!
//! - `models` - Movie summaries, details, genres, home feeds
//! - `api` - Catalog trait and HTTP client
//! - `store` - Key-value persistence and the favorites set
//! - `sync` - Generation guard, section state, task inbox
//! - `controller` - Search, category, detail, favorites and home screens
//! - `presentation` - Navigation and theme collaborators
//! - `config`, `cli`, `commands` - Command-line front end

pub mod models;
pub mod api;
pub mod store;
pub mod sync;
pub mod controller;
pub mod presentation;
pub mod config;
pub mod cli;
pub mod commands;

// Re-export commonly used types
pub use models::{Category, MovieDetail, MovieList, MovieSummary};

pub use api::{Catalog, CatalogClient, NetworkError};
pub use controller::{
    CategoryController, DetailAggregator, FavoritesList, HomeFeed, SearchController,
    SearchPhase, ValidationError,
};
pub use store::{FavoritesStore, JsonFileStore, KeyValueStore, MemoryStore, PersistenceError};
