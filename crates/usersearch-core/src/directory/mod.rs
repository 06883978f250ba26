use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::execution::{HttpExecutor, HttpRequestSpec, HttpResponse, execute_validated};
use crate::models::{
    CoreError, CoreErrorKind, DirectoryOperation, SearchUsersRequest, UserDetail, UserSummary,
};

pub type DirectoryResult<T> = Result<T, CoreError>;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ACCEPT_HEADER: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "2022-11-28";
const ERROR_BODY_LIMIT: usize = 200;

/// Client for the hosted user directory: a ranked search plus per-login
/// detail lookups. Calls are blocking; the orchestrator runs them on the
/// blocking pool.
pub struct DirectoryClient {
    executor: Arc<dyn HttpExecutor>,
    base_url: String,
    timeout: Duration,
}

impl DirectoryClient {
    pub fn new(executor: Arc<dyn HttpExecutor>, base_url: impl Into<String>) -> Self {
        Self {
            executor,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn search_users(&self, request: &SearchUsersRequest) -> DirectoryResult<Vec<UserSummary>> {
        let spec = search_users_request(&self.base_url, request, self.timeout);
        let response = execute_validated(self.executor.as_ref(), &spec)?;
        let body = ensure_success(DirectoryOperation::SearchUsers, &response)?;
        parse_search_users(body)
    }

    pub fn user_details(&self, login: &str) -> DirectoryResult<UserDetail> {
        let spec = user_details_request(&self.base_url, login, self.timeout)?;
        let response = execute_validated(self.executor.as_ref(), &spec)?;
        let body = ensure_success(DirectoryOperation::UserDetails, &response)?;
        parse_user_details(body)
    }
}

pub fn search_users_request(
    base_url: &str,
    request: &SearchUsersRequest,
    timeout: Duration,
) -> HttpRequestSpec {
    directory_request(
        DirectoryOperation::SearchUsers,
        format!("{}/search/users", base_url.trim_end_matches('/')),
        timeout,
    )
    .query_param("q", request.query.clone())
    .query_param("sort", request.sort.as_query_value())
    .query_param("per_page", request.per_page.to_string())
}

pub fn user_details_request(
    base_url: &str,
    login: &str,
    timeout: Duration,
) -> DirectoryResult<HttpRequestSpec> {
    validate_login(login)?;
    Ok(directory_request(
        DirectoryOperation::UserDetails,
        format!("{}/users/{login}", base_url.trim_end_matches('/')),
        timeout,
    ))
}

fn directory_request(
    operation: DirectoryOperation,
    url: String,
    timeout: Duration,
) -> HttpRequestSpec {
    HttpRequestSpec::get(operation, url)
        .header("Accept", ACCEPT_HEADER)
        .header("X-GitHub-Api-Version", API_VERSION_HEADER)
        .timeout(timeout)
}

fn validate_login(login: &str) -> DirectoryResult<()> {
    let valid = !login.is_empty()
        && !login.chars().all(|c| c == '.')
        && login
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '[' | ']'));
    if valid {
        Ok(())
    } else {
        Err(CoreError::invalid_input(format!("invalid directory login '{login}'"))
            .operation(DirectoryOperation::UserDetails))
    }
}

fn ensure_success(operation: DirectoryOperation, response: &HttpResponse) -> DirectoryResult<&str> {
    if response.is_success() {
        return Ok(response.body.as_str());
    }

    let excerpt: String = response.body.trim().chars().take(ERROR_BODY_LIMIT).collect();
    Err(CoreError::new(
        CoreErrorKind::Remote,
        format!("directory returned status {}: {excerpt}", response.status),
    )
    .operation(operation)
    .status(response.status))
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<u64>,
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailPayload {
    id: Option<u64>,
    login: String,
    avatar_url: String,
    followers: u64,
    html_url: String,
}

fn parse_search_users(body: &str) -> DirectoryResult<Vec<UserSummary>> {
    let envelope: SearchEnvelope = serde_json::from_str(body).map_err(|e| {
        parse_error(
            DirectoryOperation::SearchUsers,
            &format!("invalid search JSON: {e}"),
        )
    })?;

    let Some(items) = envelope.items else {
        return Err(parse_error(
            DirectoryOperation::SearchUsers,
            "search response has no 'items' array",
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(rank, item)| {
            let login = item
                .login
                .map(|login| login.trim().to_string())
                .filter(|login| !login.is_empty())
                .ok_or_else(|| {
                    parse_error(
                        DirectoryOperation::SearchUsers,
                        &format!("search item {rank} has no login"),
                    )
                })?;
            Ok(UserSummary { id: item.id, login })
        })
        .collect()
}

fn parse_user_details(body: &str) -> DirectoryResult<UserDetail> {
    let payload: DetailPayload = serde_json::from_str(body).map_err(|e| {
        parse_error(
            DirectoryOperation::UserDetails,
            &format!("invalid user JSON: {e}"),
        )
    })?;

    let login = payload.login.trim().to_string();
    if login.is_empty() {
        return Err(parse_error(
            DirectoryOperation::UserDetails,
            "user payload has an empty login",
        ));
    }

    Ok(UserDetail {
        id: payload.id,
        login,
        avatar_url: payload.avatar_url,
        followers: payload.followers,
        html_url: payload.html_url,
    })
}

fn parse_error(operation: DirectoryOperation, message: &str) -> CoreError {
    CoreError::new(CoreErrorKind::ParseFailure, message).operation(operation)
}
