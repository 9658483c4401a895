//! Shared fixtures for integration tests
//!
//! `ScriptedCatalog` answers `fetch` from a table of canned replies, each with
//! an optional delay, and records every call. Delays use tokio time so tests
//! running with `start_paused = true` control arrival order exactly.

#![allow(dead_code)]

use async_trait::async_trait;
use cinedeck::api::{Catalog, NetworkError, Params};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Call {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
struct Reply {
    delay: Duration,
    result: Result<Value, NetworkError>,
}

/// Catalog fake keyed by `path` or `path?k=v&...`
#[derive(Default)]
pub struct ScriptedCatalog {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, key: &str, body: Value) -> &Self {
        self.on_delayed(key, Duration::ZERO, body)
    }

    pub fn on_delayed(&self, key: &str, delay: Duration, body: Value) -> &Self {
        self.replies.lock().unwrap().insert(
            key.to_string(),
            Reply {
                delay,
                result: Ok(body),
            },
        );
        self
    }

    pub fn fail(&self, key: &str, err: NetworkError) -> &Self {
        self.fail_delayed(key, Duration::ZERO, err)
    }

    pub fn fail_delayed(&self, key: &str, delay: Duration, err: NetworkError) -> &Self {
        self.replies.lock().unwrap().insert(
            key.to_string(),
            Reply {
                delay,
                result: Err(err),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.path == path)
            .collect()
    }
}

#[async_trait]
impl Catalog for ScriptedCatalog {
    async fn fetch(&self, path: &str, params: &Params<'_>) -> Result<Value, NetworkError> {
        self.calls.lock().unwrap().push(Call {
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let full_key = if params.is_empty() {
            path.to_string()
        } else {
            let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            format!("{}?{}", path, query.join("&"))
        };

        let reply = {
            let replies = self.replies.lock().unwrap();
            let reply = replies
                .get(&full_key)
                .or_else(|| replies.get(path))
                .cloned();
            reply
        };

        match reply {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.result
            }
            None => Err(NetworkError::Http { status: 404 }),
        }
    }
}

// =============================================================================
// Response Fixtures
// =============================================================================

pub fn movie(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "poster_path": format!("/{}.jpg", id),
        "backdrop_path": null,
        "vote_average": 7.5
    })
}

pub fn results(movies: Vec<Value>) -> Value {
    json!({ "page": 1, "results": movies, "total_pages": 1 })
}

pub fn detail(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "poster_path": format!("/{}.jpg", id),
        "backdrop_path": format!("/{}-bd.jpg", id),
        "vote_average": 8.4,
        "overview": "An overview.",
        "original_language": "en",
        "release_date": "1999-10-15",
        "popularity": 61.4,
        "vote_count": 26280
    })
}

pub fn genres() -> Value {
    json!({ "genres": [
        {"id": 28, "name": "Action"},
        {"id": 35, "name": "Comedy"},
        {"id": 18, "name": "Drama"}
    ]})
}
