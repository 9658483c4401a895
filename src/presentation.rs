//! Presentation collaborators
//!
//! The core never renders anything. It only needs to ask the host to show a
//! screen ([`Navigator`]) and to read or flip the dark-mode flag
//! ([`ThemeContext`]).

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

// =============================================================================
// Navigation
// =============================================================================

/// Screens the core can ask for
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    MovieDetail { id: u64 },
    MovieCategory { category_id: u64, category_name: String },
}

impl Route {
    /// Target screen name
    pub fn screen(&self) -> &'static str {
        match self {
            Route::MovieDetail { .. } => "MovieDetail",
            Route::MovieCategory { .. } => "MovieCategory",
        }
    }

    /// Parameter object handed to the screen
    pub fn params(&self) -> Value {
        match self {
            Route::MovieDetail { id } => json!({ "id": id }),
            Route::MovieCategory {
                category_id,
                category_name,
            } => json!({ "categoryId": category_id, "categoryName": category_name }),
        }
    }
}

/// Navigation dispatch capability provided by the host
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only remembers what it was asked to do
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes.lock().ok().and_then(|r| r.last().cloned())
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(screen = route.screen(), params = %route.params(), "navigate");
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Dark-mode flag passed explicitly to whoever needs it.
///
/// Readers call [`ThemeContext::subscribe`]; the only writer entry point is
/// [`ThemeContext::toggle`].
#[derive(Debug, Clone)]
pub struct ThemeContext {
    tx: Arc<watch::Sender<bool>>,
}

impl ThemeContext {
    pub fn new(dark: bool) -> Self {
        let (tx, _rx) = watch::channel(dark);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_dark(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Flip the flag and return the new value
    pub fn toggle(&self) -> bool {
        self.tx.send_modify(|dark| *dark = !*dark);
        self.is_dark()
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new(false)
    }
}
