//! Home screen feeds
//!
//! Now playing, upcoming, top rated and popular load side by side; each
//! section settles or fails on its own.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::api::{Catalog, NetworkError};
use crate::models::{MovieList, MovieSummary};
use crate::presentation::{Navigator, Route};
use crate::sync::{GenerationCounter, Section, Tagged, TaskInbox};

type FeedResult = (MovieList, Result<Vec<MovieSummary>, NetworkError>);

pub struct HomeFeed<C> {
    catalog: Arc<C>,
    /// One counter per feed so reloading a feed leaves the others alone
    generations: IndexMap<MovieList, GenerationCounter>,
    sections: IndexMap<MovieList, Section<Vec<MovieSummary>>>,
    inbox: TaskInbox<Tagged<FeedResult>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl<C: Catalog + 'static> HomeFeed<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            generations: IndexMap::new(),
            sections: MovieList::ALL
                .iter()
                .map(|list| (*list, Section::Loading))
                .collect(),
            inbox: TaskInbox::new(),
            navigator: None,
        }
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn sections(&self) -> &IndexMap<MovieList, Section<Vec<MovieSummary>>> {
        &self.sections
    }

    pub fn section(&self, list: MovieList) -> &Section<Vec<MovieSummary>> {
        // Every list is inserted in `new`
        &self.sections[&list]
    }

    /// (Re)load the given feeds
    pub fn load(&mut self, lists: &[MovieList]) {
        for &list in lists {
            let generation = self.generations.entry(list).or_default().advance();
            self.sections.insert(list, Section::Loading);
            let catalog = Arc::clone(&self.catalog);
            self.inbox.spawn(async move {
                let result = catalog.movie_list(list).await;
                Tagged::new(generation, (list, result))
            });
        }
    }

    pub fn load_all(&mut self) {
        self.load(&MovieList::ALL);
    }

    /// Open the detail screen for an item of a loaded feed
    pub fn open(&self, list: MovieList, index: usize) -> Option<Route> {
        let movie = self.sections.get(&list)?.ready()?.get(index)?;
        let route = Route::MovieDetail { id: movie.id };
        if let Some(nav) = &self.navigator {
            nav.navigate(route.clone());
        }
        Some(route)
    }

    pub async fn step(&mut self) -> bool {
        let Some(tagged) = self.inbox.recv().await else {
            return false;
        };

        let generation = tagged.generation;
        let (list, _) = &tagged.value;
        let counter = self.generations.get(list).copied().unwrap_or_default();
        match tagged.accept(&counter) {
            Some((list, result)) => {
                if let Err(e) = &result {
                    tracing::warn!(list = %list, error = %e, "feed failed to load");
                }
                self.sections.insert(list, Section::from_result(result));
            }
            None => tracing::debug!(generation, "dropping stale feed response"),
        }
        true
    }

    pub async fn settle(&mut self) {
        while self.step().await {}
    }
}
