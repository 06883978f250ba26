pub mod ureq_http;

pub use ureq_http::UreqHttpExecutor;

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use crate::models::{CoreError, DirectoryOperation};

pub type ExecutionResult<T> = Result<T, CoreError>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpRequestSpec {
    pub operation: DirectoryOperation,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
    pub requested_at: SystemTime,
}

impl HttpRequestSpec {
    pub fn get(operation: DirectoryOperation, url: impl Into<String>) -> Self {
        Self {
            operation,
            url: url.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            timeout: None,
            requested_at: SystemTime::now(),
        }
    }

    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn validate(&self) -> ExecutionResult<()> {
        if !(self.url.starts_with("https://") || self.url.starts_with("http://")) {
            return Err(invalid_input(
                self.operation,
                format!("request url must be absolute http(s): '{}'", self.url),
            ));
        }

        if self.query.iter().any(|(key, _)| key.is_empty()) {
            return Err(invalid_input(
                self.operation,
                "query parameter names must not be empty".to_string(),
            ));
        }

        if self.headers.iter().any(|(key, value)| {
            key.is_empty() || key.chars().any(char::is_control) || value.chars().any(char::is_control)
        }) {
            return Err(invalid_input(
                self.operation,
                "header names must be non-empty and headers must not contain control characters"
                    .to_string(),
            ));
        }

        if let Some(timeout) = self.timeout
            && timeout.is_zero()
        {
            return Err(invalid_input(
                self.operation,
                "timeout must be greater than zero when provided".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking transport for directory requests. Implementations report every
/// HTTP status as a response and reserve errors for transport failures.
pub trait HttpExecutor: Send + Sync {
    fn execute(&self, request: &HttpRequestSpec) -> ExecutionResult<HttpResponse>;
}

pub fn execute_validated(
    executor: &dyn HttpExecutor,
    request: &HttpRequestSpec,
) -> ExecutionResult<HttpResponse> {
    request.validate()?;
    executor.execute(request)
}

fn invalid_input(operation: DirectoryOperation, message: String) -> CoreError {
    CoreError::invalid_input(message).operation(operation)
}
