use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::Mutex;

use crate::models::{SearchQuery, UserDetail};
use crate::view::GENERIC_ERROR_MESSAGE;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u64);

/// Captured when a run starts. Completion only lands in the shared state if
/// the current query still matches `query`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunToken {
    pub id: RunId,
    pub query: String,
    pub started_at: SystemTime,
}

impl RunToken {
    pub fn elapsed_ms(&self) -> u64 {
        let elapsed = self.started_at.elapsed().unwrap_or_default();
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunOutcome {
    Cleared,
    Published { count: usize },
    Superseded,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    pub message: String,
    pub run: Option<RunId>,
    pub raised_at: SystemTime,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub results: Vec<UserDetail>,
    pub loading: bool,
    pub notification: Option<Notification>,
    pub last_completed_run: Option<RunId>,
}

#[derive(Default)]
struct SearchState {
    query: SearchQuery,
    results: Vec<UserDetail>,
    in_flight: usize,
    next_run_id: u64,
    notification: Option<Notification>,
    last_completed_run: Option<RunId>,
}

impl SearchState {
    fn is_current(&self, token: &RunToken) -> bool {
        self.query.trimmed() == token.query
    }

    fn end_run(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

/// Query, result list, loading flag and pending notification shared between
/// the presentation layer (reads) and the orchestrator (writes).
#[derive(Clone, Default)]
pub struct SharedSearchState {
    inner: Arc<Mutex<SearchState>>,
}

impl SharedSearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        let state = self.inner.lock().await;
        SearchSnapshot {
            query: state.query.text.clone(),
            results: state.results.clone(),
            loading: state.in_flight > 0,
            notification: state.notification.clone(),
            last_completed_run: state.last_completed_run,
        }
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.lock().await.in_flight > 0
    }

    /// Records the raw query text. Returns true when it is blank.
    pub async fn set_query(&self, text: impl Into<String>) -> bool {
        let mut state = self.inner.lock().await;
        state.query = SearchQuery::new(text);
        state.query.is_blank()
    }

    pub async fn clear_results(&self) {
        self.inner.lock().await.results.clear();
    }

    pub async fn begin_run(&self, query: &str) -> RunToken {
        let mut state = self.inner.lock().await;
        let id = RunId(state.next_run_id);
        state.next_run_id = state.next_run_id.saturating_add(1);
        state.in_flight = state.in_flight.saturating_add(1);
        RunToken {
            id,
            query: query.trim().to_string(),
            started_at: SystemTime::now(),
        }
    }

    /// Replaces the result list wholesale when the run is still current.
    pub async fn publish_results(&self, token: &RunToken, results: Vec<UserDetail>) -> RunOutcome {
        let mut state = self.inner.lock().await;
        let outcome = if state.is_current(token) {
            let count = results.len();
            state.results = results;
            state.last_completed_run = Some(token.id);
            RunOutcome::Published { count }
        } else {
            RunOutcome::Superseded
        };
        state.end_run();
        outcome
    }

    /// Leaves the result list untouched. Raises the generic notification only
    /// for a run that is still current and returns whether it did.
    pub async fn fail_run(&self, token: &RunToken) -> bool {
        let mut state = self.inner.lock().await;
        let surfaced = state.is_current(token);
        if surfaced {
            state.notification = Some(Notification {
                message: GENERIC_ERROR_MESSAGE.to_string(),
                run: Some(token.id),
                raised_at: SystemTime::now(),
            });
            state.last_completed_run = Some(token.id);
        }
        state.end_run();
        surfaced
    }

    pub async fn dismiss_notification(&self) -> Option<Notification> {
        self.inner.lock().await.notification.take()
    }
}
