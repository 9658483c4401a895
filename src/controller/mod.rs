//! Screen controllers
//!
//! Each controller owns its view state, spawns its requests onto the runtime
//! and applies their results from `step`/`settle`, dropping any result whose
//! generation is no longer current.
//!
//! - search: debounced keyword search
//! - category: genre list, selection and discovery
//! - detail: detail + favorite flag + recommendations
//! - favorites: the favorites screen
//! - home: the four home feeds

pub mod category;
pub mod detail;
pub mod favorites;
pub mod home;
pub mod search;

pub use category::{CategoryController, ValidationError};
pub use detail::{DetailAggregator, DetailView, ToggleError};
pub use favorites::FavoritesList;
pub use home::HomeFeed;
pub use search::{SearchController, SearchPhase, SearchSession, DEFAULT_DEBOUNCE};
