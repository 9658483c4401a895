//! Movie detail screen state
//!
//! Activation dispatches three independent loads: the detail record, the
//! favorite-membership check and the recommendations list. Each section
//! settles on its own, so a failed recommendations fetch never blanks the
//! detail. Toggling the favorite flag updates the view optimistically,
//! persists, and rolls back if persistence fails.
//!
//! Favorite writes in flight are tracked per movie on the aggregator rather
//! than on the view. Remounting a movie whose write has not resolved shows
//! the write's target and keeps the toggle disabled until it settles.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::api::{Catalog, NetworkError};
use crate::models::{favorite_id, MovieDetail, MovieSummary};
use crate::store::{FavoritesStore, KeyValueStore, PersistenceError};
use crate::sync::{GenerationCounter, Section, Tagged, TaskInbox};

/// Why a favorite toggle was refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToggleError {
    #[error("No movie is active")]
    NotActive,

    #[error("Favorite state is not known yet")]
    NotLoaded,

    /// A previous toggle has not resolved; the control stays disabled
    #[error("A favorite update is already in progress")]
    Busy,
}

/// Everything the detail screen renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub movie_id: u64,
    pub detail: Section<MovieDetail>,
    pub is_favorite: Section<bool>,
    pub recommendations: Section<Vec<MovieSummary>>,
    /// A toggle is being persisted
    pub favorite_pending: bool,
    /// Last persistence failure from a toggle
    pub favorite_error: Option<String>,
}

impl DetailView {
    fn loading(movie_id: u64) -> Self {
        Self {
            movie_id,
            detail: Section::Loading,
            is_favorite: Section::Loading,
            recommendations: Section::Loading,
            favorite_pending: false,
            favorite_error: None,
        }
    }

    /// Whether the favorite control should accept input
    pub fn can_toggle(&self) -> bool {
        !self.favorite_pending && self.is_favorite.ready().is_some()
    }
}

enum SectionLoad {
    Detail(Result<MovieDetail, NetworkError>),
    Favorite(Result<bool, PersistenceError>),
    Recommendations(Result<Vec<MovieSummary>, NetworkError>),
}

enum DetailMessage {
    /// Belongs to one activation
    Loaded(Tagged<SectionLoad>),
    /// Settles whichever view shows the movie, whatever its activation
    Toggled {
        movie_id: u64,
        previous: bool,
        result: Result<(), PersistenceError>,
    },
}

pub struct DetailAggregator<C, S> {
    catalog: Arc<C>,
    favorites: Arc<FavoritesStore<S>>,
    generation: GenerationCounter,
    view: Option<DetailView>,
    /// Target flag of each favorite write in flight, by movie id
    pending: HashMap<u64, bool>,
    inbox: TaskInbox<DetailMessage>,
}

impl<C, S> DetailAggregator<C, S>
where
    C: Catalog + 'static,
    S: KeyValueStore + 'static,
{
    pub fn new(catalog: Arc<C>, favorites: Arc<FavoritesStore<S>>) -> Self {
        Self {
            catalog,
            favorites,
            generation: GenerationCounter::new(),
            view: None,
            pending: HashMap::new(),
            inbox: TaskInbox::new(),
        }
    }

    pub fn view(&self) -> Option<&DetailView> {
        self.view.as_ref()
    }

    /// Screen mounted for `movie_id`
    pub fn activate(&mut self, movie_id: u64) {
        let generation = self.generation.advance();
        let mut view = DetailView::loading(movie_id);
        tracing::debug!(generation, movie_id, "activating detail");

        let catalog = Arc::clone(&self.catalog);
        self.inbox.spawn(async move {
            let result = catalog.movie_detail(movie_id).await;
            DetailMessage::Loaded(Tagged::new(generation, SectionLoad::Detail(result)))
        });

        // Reading the store now would race the pending write
        match self.pending.get(&movie_id) {
            Some(&target) => {
                tracing::debug!(movie_id, target, "favorite write still pending");
                view.is_favorite = Section::Ready(target);
                view.favorite_pending = true;
            }
            None => {
                let favorites = Arc::clone(&self.favorites);
                self.inbox.spawn(async move {
                    let result = favorites.contains(&favorite_id(movie_id)).await;
                    DetailMessage::Loaded(Tagged::new(generation, SectionLoad::Favorite(result)))
                });
            }
        }

        let catalog = Arc::clone(&self.catalog);
        self.inbox.spawn(async move {
            let result = catalog.recommendations(movie_id).await;
            DetailMessage::Loaded(Tagged::new(
                generation,
                SectionLoad::Recommendations(result),
            ))
        });

        self.view = Some(view);
    }

    /// Screen unmounted. Loads still in flight are dropped on arrival;
    /// favorite writes keep running.
    pub fn deactivate(&mut self) {
        self.generation.advance();
        self.view = None;
    }

    /// Flip the favorite flag. The view changes immediately; the store write
    /// resolves later and is rolled back in the view if it fails.
    /// Returns the new flag.
    pub fn toggle_favorite(&mut self) -> Result<bool, ToggleError> {
        let view = self.view.as_mut().ok_or(ToggleError::NotActive)?;
        if view.favorite_pending || self.pending.contains_key(&view.movie_id) {
            return Err(ToggleError::Busy);
        }
        let previous = *view.is_favorite.ready().ok_or(ToggleError::NotLoaded)?;

        let next = !previous;
        view.is_favorite = Section::Ready(next);
        view.favorite_pending = true;
        view.favorite_error = None;

        let movie_id = view.movie_id;
        self.pending.insert(movie_id, next);

        let favorites = Arc::clone(&self.favorites);
        self.inbox.spawn(async move {
            let id = favorite_id(movie_id);
            let result = if next {
                favorites.add(&id).await
            } else {
                favorites.remove(&id).await
            };
            DetailMessage::Toggled {
                movie_id,
                previous,
                result,
            }
        });

        Ok(next)
    }

    /// Apply one completed operation. Returns `false` when nothing is pending.
    pub async fn step(&mut self) -> bool {
        match self.inbox.recv().await {
            Some(msg) => {
                self.apply(msg);
                true
            }
            None => false,
        }
    }

    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    fn apply(&mut self, msg: DetailMessage) {
        match msg {
            DetailMessage::Loaded(load) => self.apply_load(load),
            DetailMessage::Toggled {
                movie_id,
                previous,
                result,
            } => self.finish_toggle(movie_id, previous, result),
        }
    }

    fn apply_load(&mut self, load: Tagged<SectionLoad>) {
        let generation = load.generation;
        let (Some(load), Some(view)) = (load.accept(&self.generation), self.view.as_mut()) else {
            tracing::debug!(generation, "dropping stale detail response");
            return;
        };

        match load {
            SectionLoad::Detail(result) => {
                if let Err(e) = &result {
                    tracing::warn!(movie_id = view.movie_id, error = %e, "detail fetch failed");
                }
                view.detail = Section::from_result(result);
            }
            SectionLoad::Favorite(result) => {
                if let Err(e) = &result {
                    tracing::warn!(movie_id = view.movie_id, error = %e, "favorite check failed");
                }
                view.is_favorite = Section::from_result(result);
            }
            SectionLoad::Recommendations(result) => {
                if let Err(e) = &result {
                    tracing::warn!(
                        movie_id = view.movie_id,
                        error = %e,
                        "recommendations fetch failed"
                    );
                }
                view.recommendations = Section::from_result(result);
            }
        }
    }

    fn finish_toggle(
        &mut self,
        movie_id: u64,
        previous: bool,
        result: Result<(), PersistenceError>,
    ) {
        self.pending.remove(&movie_id);
        if let Err(e) = &result {
            tracing::warn!(movie_id, error = %e, "favorite update failed");
        }

        let Some(view) = self.view.as_mut().filter(|v| v.movie_id == movie_id) else {
            tracing::debug!(movie_id, "favorite update settled off screen");
            return;
        };

        view.favorite_pending = false;
        match result {
            Ok(()) => view.is_favorite = Section::Ready(!previous),
            Err(e) => {
                view.is_favorite = Section::Ready(previous);
                view.favorite_error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Params;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct FixedCatalog;

    #[async_trait]
    impl Catalog for FixedCatalog {
        async fn fetch(&self, path: &str, _params: &Params<'_>) -> Result<Value, NetworkError> {
            if path.ends_with("/recommendations") {
                Ok(json!({"results": []}))
            } else {
                Ok(json!({"id": 550, "title": "Fight Club", "release_date": "1999-10-15"}))
            }
        }
    }

    fn aggregator() -> DetailAggregator<FixedCatalog, MemoryStore> {
        DetailAggregator::new(
            Arc::new(FixedCatalog),
            Arc::new(FavoritesStore::new(MemoryStore::new())),
        )
    }

    #[tokio::test]
    async fn test_toggle_requires_loaded_flag() {
        let mut detail = aggregator();
        assert_eq!(detail.toggle_favorite(), Err(ToggleError::NotActive));

        detail.activate(550);
        assert_eq!(detail.toggle_favorite(), Err(ToggleError::NotLoaded));

        detail.settle().await;
        assert_eq!(detail.toggle_favorite(), Ok(true));
        assert_eq!(detail.toggle_favorite(), Err(ToggleError::Busy));
        assert!(!detail.view().unwrap().can_toggle());

        detail.settle().await;
        assert!(detail.view().unwrap().can_toggle());
    }

    #[tokio::test]
    async fn test_deactivate_drops_in_flight() {
        let mut detail = aggregator();
        detail.activate(550);
        detail.deactivate();
        detail.settle().await;
        assert!(detail.view().is_none());
    }
}
