//! Stale-response suppression shared by the controllers
//!
//! Every controller that can have overlapping requests owns a
//! [`GenerationCounter`]. A request captures the generation current at
//! dispatch; its response is applied only if that generation is still
//! current when it arrives. In-flight requests are never hard-cancelled.

use serde::Serialize;
use std::future::Future;
use tokio::sync::mpsc;

/// Monotonic dispatch counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    /// Start a new generation and return it
    pub fn advance(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current == generation
    }
}

/// A value tagged with the generation it was dispatched under
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    pub generation: u64,
    pub value: T,
}

impl<T> Tagged<T> {
    pub fn new(generation: u64, value: T) -> Self {
        Self { generation, value }
    }

    /// Unwrap the value if `counter` still considers it current
    pub fn accept(self, counter: &GenerationCounter) -> Option<T> {
        counter.is_current(self.generation).then_some(self.value)
    }
}

/// Independent load state of one section of a view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Section<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Section::Loading
    }
}

impl<T> Section<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Section::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Section::Failed(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Section::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Settle from a result, keeping only the error message on failure
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Section::Ready(value),
            Err(e) => Section::Failed(e.to_string()),
        }
    }
}

/// Completion queue for a controller's background tasks.
///
/// Work is spawned onto the runtime and its output lands back here, to be
/// applied by the controller on its own event loop turn.
pub struct TaskInbox<M> {
    tx: mpsc::UnboundedSender<M>,
    rx: mpsc::UnboundedReceiver<M>,
    in_flight: usize,
}

impl<M: Send + 'static> TaskInbox<M> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Run `task` in the background; its output is delivered by [`TaskInbox::recv`]
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = M> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Next completed output, or `None` right away if nothing is in flight
    pub async fn recv(&mut self) -> Option<M> {
        if self.in_flight == 0 {
            return None;
        }
        let msg = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(msg)
    }
}

impl<M: Send + 'static> Default for TaskInbox<M> {
    fn default() -> Self {
        Self::new()
    }
}
