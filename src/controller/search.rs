//! Keyword search with debounce and stale-response suppression
//!
//! Keystrokes arm a single-shot debounce deadline; the deadline is cleared
//! and re-armed on every keystroke, so only the last keyword inside the
//! window reaches the catalog. Each dispatch advances the session
//! generation and a response is applied only if it carries the generation
//! that is current when it arrives.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::api::{Catalog, NetworkError};
use crate::models::MovieSummary;
use crate::presentation::{Navigator, Route};
use crate::sync::{GenerationCounter, Tagged, TaskInbox};

/// Delay between the last keystroke and the request it triggers
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Where the search session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    #[default]
    Idle,
    Debouncing,
    Fetching,
    Settled,
    Failed,
}

/// Keyword, the results on display and the dispatch generation
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    pub keyword: String,
    pub results: Vec<MovieSummary>,
    pub generation: GenerationCounter,
}

struct SearchResponse {
    keyword: String,
    result: Result<Vec<MovieSummary>, NetworkError>,
}

pub struct SearchController<C> {
    catalog: Arc<C>,
    debounce: Duration,
    session: SearchSession,
    phase: SearchPhase,
    error: Option<String>,
    /// Pending debounce deadline; cleared before a new one is armed
    timer: Option<Instant>,
    inbox: TaskInbox<Tagged<SearchResponse>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl<C: Catalog + 'static> SearchController<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            debounce: DEFAULT_DEBOUNCE,
            session: SearchSession::default(),
            phase: SearchPhase::Idle,
            error: None,
            timer: None,
            inbox: TaskInbox::new(),
            navigator: None,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn keyword(&self) -> &str {
        &self.session.keyword
    }

    pub fn results(&self) -> &[MovieSummary] {
        &self.session.results
    }

    pub fn generation(&self) -> u64 {
        self.session.generation.current()
    }

    /// Last failure message, cleared by the next dispatch
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Fetching
    }

    /// Whether the debounce deadline is armed
    pub fn timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Number of requests dispatched but not yet answered
    pub fn in_flight(&self) -> usize {
        self.inbox.in_flight()
    }

    /// Keyword input changed
    pub fn input(&mut self, text: impl Into<String>) {
        self.session.keyword = text.into();
        self.timer = None;

        if self.session.keyword.trim().is_empty() {
            self.clear();
            return;
        }

        self.timer = Some(Instant::now() + self.debounce);
        self.phase = SearchPhase::Debouncing;
    }

    /// Search now, skipping the debounce window
    pub fn submit(&mut self) {
        self.timer = None;

        if self.session.keyword.trim().is_empty() {
            self.clear();
            return;
        }

        self.dispatch();
    }

    /// Process the next event (elapsed deadline or arrived response).
    /// Returns `false` when nothing is pending.
    pub async fn step(&mut self) -> bool {
        if self.timer.is_none() && self.inbox.in_flight() == 0 {
            return false;
        }

        let deadline = self.timer;
        tokio::select! {
            Some(response) = self.inbox.recv() => self.apply(response),
            _ = sleep_until_armed(deadline) => {
                self.timer = None;
                self.dispatch();
            }
        }
        true
    }

    /// Run until no deadline is armed and no request is in flight
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Open the detail screen for the result at `index`
    pub fn open(&self, index: usize) -> Option<Route> {
        let movie = self.session.results.get(index)?;
        let route = Route::MovieDetail { id: movie.id };
        if let Some(nav) = &self.navigator {
            nav.navigate(route.clone());
        }
        Some(route)
    }

    fn clear(&mut self) {
        // In-flight responses belong to a keyword that is gone
        self.session.generation.advance();
        self.session.results.clear();
        self.error = None;
        self.phase = SearchPhase::Idle;
    }

    fn dispatch(&mut self) {
        let generation = self.session.generation.advance();
        let keyword = self.session.keyword.trim().to_string();
        self.phase = SearchPhase::Fetching;
        self.error = None;

        tracing::debug!(generation, keyword = %keyword, "dispatching search");

        let catalog = Arc::clone(&self.catalog);
        self.inbox.spawn(async move {
            let result = catalog.search(&keyword).await;
            Tagged::new(generation, SearchResponse { keyword, result })
        });
    }

    fn apply(&mut self, response: Tagged<SearchResponse>) {
        let generation = response.generation;
        let Some(response) = response.accept(&self.session.generation) else {
            tracing::debug!(
                generation,
                current = self.session.generation.current(),
                "dropping stale search response"
            );
            return;
        };

        match response.result {
            Ok(movies) => {
                self.session.results = movies;
                self.phase = if self.timer.is_some() {
                    SearchPhase::Debouncing
                } else {
                    SearchPhase::Settled
                };
            }
            Err(e) => {
                tracing::warn!(keyword = %response.keyword, error = %e, "search failed");
                self.session.results.clear();
                self.error = Some(e.to_string());
                self.phase = if self.timer.is_some() {
                    SearchPhase::Debouncing
                } else {
                    SearchPhase::Failed
                };
            }
        }
    }
}

async fn sleep_until_armed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
