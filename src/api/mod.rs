//! API clients for external services
//!
//! - Catalog: movie lists, search, genres, details and recommendations

pub mod catalog;

pub use catalog::{Catalog, CatalogClient, NetworkError, Params};
