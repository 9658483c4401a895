//! Favorites screen
//!
//! Re-read on every focus: the stored ids are resolved to movies through the
//! detail endpoint, keeping insertion order. Ids that fail to resolve are
//! skipped; only a store failure fails the whole list.

use futures::future::join_all;
use std::sync::Arc;

use crate::api::Catalog;
use crate::models::MovieSummary;
use crate::store::{FavoritesStore, KeyValueStore, PersistenceError};
use crate::sync::{GenerationCounter, Section, Tagged, TaskInbox};

type Resolved = Result<Vec<MovieSummary>, PersistenceError>;

pub struct FavoritesList<C, S> {
    catalog: Arc<C>,
    favorites: Arc<FavoritesStore<S>>,
    generation: GenerationCounter,
    movies: Section<Vec<MovieSummary>>,
    inbox: TaskInbox<Tagged<Resolved>>,
}

impl<C, S> FavoritesList<C, S>
where
    C: Catalog + 'static,
    S: KeyValueStore + 'static,
{
    pub fn new(catalog: Arc<C>, favorites: Arc<FavoritesStore<S>>) -> Self {
        Self {
            catalog,
            favorites,
            generation: GenerationCounter::new(),
            movies: Section::Loading,
            inbox: TaskInbox::new(),
        }
    }

    pub fn movies(&self) -> &Section<Vec<MovieSummary>> {
        &self.movies
    }

    /// Screen focused
    pub fn refresh(&mut self) {
        let generation = self.generation.advance();
        self.movies = Section::Loading;

        let catalog = Arc::clone(&self.catalog);
        let favorites = Arc::clone(&self.favorites);
        self.inbox.spawn(async move {
            Tagged::new(generation, resolve(catalog, favorites).await)
        });
    }

    pub async fn step(&mut self) -> bool {
        let Some(tagged) = self.inbox.recv().await else {
            return false;
        };

        let generation = tagged.generation;
        match tagged.accept(&self.generation) {
            Some(result) => {
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "failed to read favorites");
                }
                self.movies = Section::from_result(result);
            }
            None => tracing::debug!(generation, "dropping stale favorites refresh"),
        }
        true
    }

    pub async fn settle(&mut self) {
        while self.step().await {}
    }
}

async fn resolve<C, S>(catalog: Arc<C>, favorites: Arc<FavoritesStore<S>>) -> Resolved
where
    C: Catalog,
    S: KeyValueStore,
{
    let ids = favorites.list().await?;

    let lookups = ids.iter().map(|id| {
        let catalog = Arc::clone(&catalog);
        async move {
            let Ok(movie_id) = id.parse::<u64>() else {
                tracing::warn!(id = %id, "skipping malformed favorite id");
                return None;
            };
            match catalog.movie_detail(movie_id).await {
                Ok(detail) => Some(detail.summary()),
                Err(e) => {
                    tracing::warn!(movie_id, error = %e, "skipping unresolved favorite");
                    None
                }
            }
        }
    });

    Ok(join_all(lookups).await.into_iter().flatten().collect())
}
