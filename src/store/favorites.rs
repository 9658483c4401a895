//! Durable favorite-movie set
//!
//! One record, [`FAVORITES_KEY`], holding a JSON array of id strings in
//! insertion order. Every mutation is read-modify-write against the backing
//! store; nothing here makes that atomic across concurrent callers, so the
//! UI serializes toggles per movie.

use indexmap::IndexSet;

use super::kv::{KeyValueStore, PersistenceError};

/// Record key for the favorites array
pub const FAVORITES_KEY: &str = "favoriteMovies";

/// Ordered set of favorite ids
pub type FavoriteSet = IndexSet<String>;

pub struct FavoritesStore<S> {
    backend: S,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Read the persisted set. A missing record is an empty set.
    pub async fn load(&self) -> Result<FavoriteSet, PersistenceError> {
        let Some(raw) = self.backend.get(FAVORITES_KEY).await? else {
            return Ok(FavoriteSet::new());
        };

        let ids: Vec<String> =
            serde_json::from_str(&raw).map_err(|e| PersistenceError::Corrupt {
                key: FAVORITES_KEY.to_string(),
                reason: e.to_string(),
            })?;

        // Duplicates in an old record collapse to their first occurrence
        Ok(ids.into_iter().collect())
    }

    /// Ids in insertion order
    pub async fn list(&self) -> Result<Vec<String>, PersistenceError> {
        Ok(self.load().await?.into_iter().collect())
    }

    pub async fn contains(&self, id: &str) -> Result<bool, PersistenceError> {
        Ok(self.load().await?.contains(id))
    }

    /// Add `id`. Already present is a successful no-op.
    pub async fn add(&self, id: &str) -> Result<(), PersistenceError> {
        let mut set = self.load().await?;
        if !set.insert(id.to_string()) {
            return Ok(());
        }
        tracing::debug!(id, "adding favorite");
        self.save(&set).await
    }

    /// Remove `id`. Absent is a successful no-op.
    pub async fn remove(&self, id: &str) -> Result<(), PersistenceError> {
        let mut set = self.load().await?;
        if !set.shift_remove(id) {
            return Ok(());
        }
        tracing::debug!(id, "removing favorite");
        self.save(&set).await
    }

    async fn save(&self, set: &FavoriteSet) -> Result<(), PersistenceError> {
        let json =
            serde_json::to_string(set).map_err(|e| PersistenceError::Io(e.to_string()))?;
        self.backend.set(FAVORITES_KEY, &json).await
    }
}
