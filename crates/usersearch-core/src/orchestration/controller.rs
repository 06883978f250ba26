use std::sync::Arc;
use std::time::Duration;

use crate::directory::DirectoryClient;
use crate::execution::HttpExecutor;
use crate::orchestration::{
    Notification, QueryDebouncer, SearchOrchestrator, SearchSnapshot, SharedSearchState,
};
use crate::settings::SearchSettings;

/// Entry point for the presentation layer: feed it every query edit and
/// render from `snapshot`.
#[derive(Clone)]
pub struct SearchController {
    state: SharedSearchState,
    orchestrator: Arc<SearchOrchestrator>,
    debouncer: Arc<QueryDebouncer>,
}

impl SearchController {
    pub fn new(orchestrator: SearchOrchestrator, quiet_period: Duration) -> Self {
        Self {
            state: SharedSearchState::new(),
            orchestrator: Arc::new(orchestrator),
            debouncer: Arc::new(QueryDebouncer::new(quiet_period)),
        }
    }

    pub fn from_settings(settings: &SearchSettings, executor: Arc<dyn HttpExecutor>) -> Self {
        let client = DirectoryClient::new(executor, settings.api_base_url.clone())
            .timeout(settings.request_timeout);
        let orchestrator = SearchOrchestrator::new(Arc::new(client))
            .sort(settings.sort)
            .page_size(settings.page_size);
        Self::new(orchestrator, settings.quiet_period)
    }

    pub fn state(&self) -> &SharedSearchState {
        &self.state
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator {
        &self.orchestrator
    }

    pub async fn on_query_changed(&self, text: impl Into<String>) {
        let text = text.into();
        if self.state.set_query(text.clone()).await {
            let cancelled = self.debouncer.cancel().await;
            self.state.clear_results().await;
            tracing::debug!(cancelled, "query cleared");
            return;
        }

        let quiet_ms = u64::try_from(self.debouncer.quiet_period().as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(quiet_ms, "search scheduled");
        let orchestrator = self.orchestrator.clone();
        let state = self.state.clone();
        self.debouncer
            .schedule(move || async move {
                // Failures are logged and surfaced through the state.
                let _ = orchestrator.run_search(&state, &text).await;
            })
            .await;
    }

    pub async fn has_pending_search(&self) -> bool {
        self.debouncer.has_pending().await
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        self.state.snapshot().await
    }

    pub async fn dismiss_notification(&self) -> Option<Notification> {
        self.state.dismiss_notification().await
    }
}
