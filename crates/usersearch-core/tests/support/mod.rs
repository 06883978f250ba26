#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use usersearch_core::directory::DirectoryClient;
use usersearch_core::execution::{ExecutionResult, HttpExecutor, HttpRequestSpec, HttpResponse};
use usersearch_core::models::{CoreError, CoreErrorKind, DirectoryOperation};
use usersearch_core::orchestration::{SearchController, SearchOrchestrator, SearchSnapshot};

pub const BASE_URL: &str = "https://directory.test";

#[derive(Clone)]
enum Reply {
    Response(HttpResponse),
    Transport(CoreErrorKind),
}

/// In-process stand-in for the hosted directory. Unknown searches and users
/// answer 404.
#[derive(Default)]
pub struct FakeDirectory {
    searches: HashMap<String, Reply>,
    users: HashMap<String, Reply>,
    search_delays: HashMap<String, Duration>,
    user_delays: HashMap<String, Duration>,
    calls: Mutex<Vec<HttpRequestSpec>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, query: &str, logins: &[&str]) -> Self {
        let items: Vec<String> = logins
            .iter()
            .enumerate()
            .map(|(index, login)| format!(r#"{{"login":"{login}","id":{}}}"#, index + 1))
            .collect();
        let body = format!(
            r#"{{"total_count":{},"incomplete_results":false,"items":[{}]}}"#,
            logins.len(),
            items.join(",")
        );
        self.searches.insert(
            query.to_string(),
            Reply::Response(HttpResponse::new(200, body)),
        );
        self
    }

    pub fn search_response(mut self, query: &str, status: u16, body: &str) -> Self {
        self.searches.insert(
            query.to_string(),
            Reply::Response(HttpResponse::new(status, body)),
        );
        self
    }

    pub fn search_transport_failure(mut self, query: &str, kind: CoreErrorKind) -> Self {
        self.searches.insert(query.to_string(), Reply::Transport(kind));
        self
    }

    pub fn search_delay(mut self, query: &str, delay: Duration) -> Self {
        self.search_delays.insert(query.to_string(), delay);
        self
    }

    pub fn user(mut self, login: &str, followers: u64) -> Self {
        let body = format!(
            r#"{{"login":"{login}","id":7,"avatar_url":"https://avatars.test/{login}.png","followers":{followers},"html_url":"https://github.com/{login}","name":null}}"#
        );
        self.users.insert(
            login.to_string(),
            Reply::Response(HttpResponse::new(200, body)),
        );
        self
    }

    pub fn user_response(mut self, login: &str, status: u16, body: &str) -> Self {
        self.users.insert(
            login.to_string(),
            Reply::Response(HttpResponse::new(status, body)),
        );
        self
    }

    pub fn user_transport_failure(mut self, login: &str, kind: CoreErrorKind) -> Self {
        self.users.insert(login.to_string(), Reply::Transport(kind));
        self
    }

    pub fn user_delay(mut self, login: &str, delay: Duration) -> Self {
        self.user_delays.insert(login.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<HttpRequestSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|call| call.operation == DirectoryOperation::SearchUsers)
            .filter_map(|call| call.query_value("q").map(str::to_string))
            .collect()
    }

    pub fn detail_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.operation == DirectoryOperation::UserDetails)
            .count()
    }

    fn reply(&self, operation: DirectoryOperation, reply: Option<&Reply>) -> ExecutionResult<HttpResponse> {
        match reply {
            Some(Reply::Response(response)) => Ok(response.clone()),
            Some(Reply::Transport(kind)) => {
                Err(CoreError::new(*kind, "connection reset by peer").operation(operation))
            }
            None => Ok(HttpResponse::new(404, r#"{"message":"Not Found"}"#)),
        }
    }
}

impl HttpExecutor for FakeDirectory {
    fn execute(&self, request: &HttpRequestSpec) -> ExecutionResult<HttpResponse> {
        self.calls.lock().unwrap().push(request.clone());

        match request.operation {
            DirectoryOperation::SearchUsers => {
                let query = request.query_value("q").unwrap_or_default();
                if let Some(delay) = self.search_delays.get(query) {
                    std::thread::sleep(*delay);
                }
                self.reply(request.operation, self.searches.get(query))
            }
            DirectoryOperation::UserDetails => {
                let login = request.url.rsplit('/').next().unwrap_or_default();
                if let Some(delay) = self.user_delays.get(login) {
                    std::thread::sleep(*delay);
                }
                self.reply(request.operation, self.users.get(login))
            }
        }
    }
}

pub fn client(fake: &Arc<FakeDirectory>) -> Arc<DirectoryClient> {
    let executor: Arc<dyn HttpExecutor> = fake.clone();
    Arc::new(DirectoryClient::new(executor, BASE_URL))
}

pub fn orchestrator(fake: &Arc<FakeDirectory>) -> SearchOrchestrator {
    SearchOrchestrator::new(client(fake))
}

pub fn controller(fake: &Arc<FakeDirectory>, quiet_period: Duration) -> SearchController {
    SearchController::new(orchestrator(fake), quiet_period)
}

pub async fn wait_for_snapshot(
    controller: &SearchController,
    timeout: Duration,
    predicate: impl Fn(&SearchSnapshot) -> bool,
) -> SearchSnapshot {
    let deadline = Instant::now() + timeout;
    loop {
        let snapshot = controller.snapshot().await;
        if predicate(&snapshot) || Instant::now() >= deadline {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
