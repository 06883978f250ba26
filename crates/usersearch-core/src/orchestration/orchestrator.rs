use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};

use crate::directory::DirectoryClient;
use crate::models::{
    CoreError, DirectoryOperation, SearchQuery, SearchUsersRequest, UserDetail, UserSortKey,
    UserSummary,
};
use crate::orchestration::{OrchestrationResult, RunOutcome, SharedSearchState};

pub const DEFAULT_PAGE_SIZE: u8 = 5;

/// Runs one search: the ranked search call, then one detail lookup per
/// result, joined all-or-nothing in search-rank order.
pub struct SearchOrchestrator {
    client: Arc<DirectoryClient>,
    sort: UserSortKey,
    page_size: u8,
}

impl SearchOrchestrator {
    pub fn new(client: Arc<DirectoryClient>) -> Self {
        Self {
            client,
            sort: UserSortKey::Followers,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn sort(mut self, sort: UserSortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn page_size(mut self, page_size: u8) -> Self {
        self.page_size = page_size;
        self
    }

    pub async fn run_search(
        &self,
        state: &SharedSearchState,
        query: &str,
    ) -> OrchestrationResult<RunOutcome> {
        let query = SearchQuery::new(query);
        if query.is_blank() {
            state.clear_results().await;
            return Ok(RunOutcome::Cleared);
        }
        let query = query.trimmed();

        let token = state.begin_run(query).await;
        tracing::debug!(run_id = token.id.0, query, "search run started");

        match self.fetch_results(query).await {
            Ok(results) => {
                let outcome = state.publish_results(&token, results).await;
                match outcome {
                    RunOutcome::Published { count } => {
                        tracing::info!(
                            run_id = token.id.0,
                            query,
                            count,
                            elapsed_ms = token.elapsed_ms(),
                            "search run published"
                        );
                    }
                    _ => {
                        tracing::debug!(
                            run_id = token.id.0,
                            query,
                            elapsed_ms = token.elapsed_ms(),
                            "discarding results of superseded search run"
                        );
                    }
                }
                Ok(outcome)
            }
            Err(error) => {
                let surfaced = state.fail_run(&token).await;
                tracing::error!(
                    run_id = token.id.0,
                    query,
                    operation = ?error.operation,
                    kind = ?error.kind,
                    status = ?error.status,
                    message = %error.message,
                    surfaced,
                    elapsed_ms = token.elapsed_ms(),
                    "search run failed"
                );
                Err(error)
            }
        }
    }

    /// The remote half of a run, without touching shared state.
    pub async fn fetch_results(&self, query: &str) -> OrchestrationResult<Vec<UserDetail>> {
        let request = SearchUsersRequest::new(query, self.sort, self.page_size);
        let client = self.client.clone();
        let summaries = tokio::task::spawn_blocking(move || client.search_users(&request))
            .await
            .map_err(|error| join_failure(DirectoryOperation::SearchUsers, error))??;

        if summaries.is_empty() {
            return Ok(Vec::new());
        }

        self.fetch_details(summaries).await
    }

    async fn fetch_details(
        &self,
        summaries: Vec<UserSummary>,
    ) -> OrchestrationResult<Vec<UserDetail>> {
        let mut slots: Vec<Option<UserDetail>> = summaries.iter().map(|_| None).collect();
        let mut lookups = JoinSet::new();

        for (index, summary) in summaries.into_iter().enumerate() {
            let client = self.client.clone();
            lookups.spawn_blocking(move || (index, client.user_details(&summary.login)));
        }

        while let Some(joined) = lookups.join_next().await {
            let (index, detail) =
                joined.map_err(|error| join_failure(DirectoryOperation::UserDetails, error))?;
            match detail {
                Ok(detail) => slots[index] = Some(detail),
                Err(error) => {
                    lookups.abort_all();
                    return Err(error);
                }
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    CoreError::internal(format!("detail lookup {index} produced no result"))
                        .operation(DirectoryOperation::UserDetails)
                })
            })
            .collect()
    }
}

fn join_failure(operation: DirectoryOperation, error: JoinError) -> CoreError {
    CoreError::internal(format!("directory call join failure: {error}")).operation(operation)
}
