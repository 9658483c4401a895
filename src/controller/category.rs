//! Genre selection and discovery
//!
//! The genre list is fetched once and kept in memory. A single genre can be
//! selected at a time; confirming it issues one discovery query and asks the
//! host to show the category screen.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::api::{Catalog, NetworkError};
use crate::models::{Category, MovieSummary};
use crate::presentation::{Navigator, Route};
use crate::sync::{GenerationCounter, Section, Tagged, TaskInbox};

/// User-input problems; never involve the network
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationError {
    #[error("Please select a category before searching.")]
    NoCategorySelected,
}

enum CategoryMessage {
    Categories(Result<Vec<Category>, NetworkError>),
    Discovered(Tagged<Result<Vec<MovieSummary>, NetworkError>>),
}

pub struct CategoryController<C> {
    catalog: Arc<C>,
    categories: Option<Section<Vec<Category>>>,
    selected: Option<Category>,
    error: Option<ValidationError>,
    generation: GenerationCounter,
    movies: Option<Section<Vec<MovieSummary>>>,
    inbox: TaskInbox<CategoryMessage>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl<C: Catalog + 'static> CategoryController<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            categories: None,
            selected: None,
            error: None,
            generation: GenerationCounter::new(),
            movies: None,
            inbox: TaskInbox::new(),
            navigator: None,
        }
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Genre list state; `None` before [`CategoryController::load`]
    pub fn categories(&self) -> Option<&Section<Vec<Category>>> {
        self.categories.as_ref()
    }

    pub fn selected(&self) -> Option<&Category> {
        self.selected.as_ref()
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Discovery results for the last confirmed genre
    pub fn movies(&self) -> Option<&Section<Vec<MovieSummary>>> {
        self.movies.as_ref()
    }

    /// Fetch the genre list. Once loaded (or loading) this is a no-op;
    /// after a failure it fetches again.
    pub fn load(&mut self) {
        if matches!(
            self.categories,
            Some(Section::Loading) | Some(Section::Ready(_))
        ) {
            return;
        }

        self.categories = Some(Section::Loading);
        let catalog = Arc::clone(&self.catalog);
        self.inbox.spawn(async move {
            CategoryMessage::Categories(catalog.genres().await)
        });
    }

    /// Loaded genre matching `query` by id or case-insensitive name
    pub fn find(&self, query: &str) -> Option<&Category> {
        let categories = self.categories.as_ref()?.ready()?;
        let query = query.trim();
        match query.parse::<u64>() {
            Ok(id) => categories.iter().find(|c| c.id == id),
            Err(_) => categories
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(query)),
        }
    }

    /// Replace the selection and clear any validation error
    pub fn select(&mut self, category: Category) {
        self.selected = Some(category);
        self.error = None;
    }

    /// Run discovery for the selected genre. Returns the dispatch
    /// generation, or a validation error if nothing is selected.
    pub fn confirm_search(&mut self) -> Result<u64, ValidationError> {
        let Some(category) = self.selected.clone() else {
            self.error = Some(ValidationError::NoCategorySelected);
            return Err(ValidationError::NoCategorySelected);
        };

        let generation = self.generation.advance();
        self.movies = Some(Section::Loading);
        tracing::debug!(generation, genre = %category, "dispatching discovery");

        let catalog = Arc::clone(&self.catalog);
        let genre_id = category.id;
        self.inbox.spawn(async move {
            let result = catalog.discover(genre_id).await;
            CategoryMessage::Discovered(Tagged::new(generation, result))
        });

        if let Some(nav) = &self.navigator {
            nav.navigate(Route::MovieCategory {
                category_id: category.id,
                category_name: category.name,
            });
        }

        Ok(generation)
    }

    /// Apply one completed request. Returns `false` when nothing is pending.
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

    fn apply(&mut self, msg: CategoryMessage) {
        match msg {
            CategoryMessage::Categories(result) => {
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "failed to load categories");
                }
                self.categories = Some(Section::from_result(result));
            }
            CategoryMessage::Discovered(tagged) => {
                let generation = tagged.generation;
                let Some(result) = tagged.accept(&self.generation) else {
                    tracing::debug!(generation, "dropping stale discovery response");
                    return;
                };
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "discovery failed");
                }
                self.movies = Some(Section::from_result(result));
            }
        }
    }
}
