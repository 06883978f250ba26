use std::io::ErrorKind as IoErrorKind;

use crate::execution::{ExecutionResult, HttpExecutor, HttpRequestSpec, HttpResponse};
use crate::models::{CoreError, CoreErrorKind};

pub struct UreqHttpExecutor {
    agent: ureq::Agent,
}

impl UreqHttpExecutor {
    pub fn new(user_agent: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().user_agent(user_agent).build(),
        }
    }
}

impl HttpExecutor for UreqHttpExecutor {
    fn execute(&self, request: &HttpRequestSpec) -> ExecutionResult<HttpResponse> {
        let mut call = self.agent.get(&request.url);
        for (key, value) in &request.query {
            call = call.query(key, value);
        }
        for (key, value) in &request.headers {
            call = call.set(key, value);
        }
        if let Some(timeout) = request.timeout {
            call = call.timeout(timeout);
        }

        tracing::debug!(
            operation = ?request.operation,
            url = %request.url,
            "sending directory request"
        );

        match call.call() {
            Ok(response) => read_response(request, response),
            // ureq reports 4xx/5xx as errors; the directory client classifies them.
            Err(ureq::Error::Status(_, response)) => read_response(request, response),
            Err(ureq::Error::Transport(transport)) => {
                let kind = if is_timeout(&transport) {
                    CoreErrorKind::Timeout
                } else {
                    CoreErrorKind::Network
                };
                Err(CoreError::new(kind, format!("request transport failure: {transport}"))
                    .operation(request.operation))
            }
        }
    }
}

fn read_response(
    request: &HttpRequestSpec,
    response: ureq::Response,
) -> ExecutionResult<HttpResponse> {
    let status = response.status();
    let elapsed = request.requested_at.elapsed().unwrap_or_default();
    tracing::debug!(
        operation = ?request.operation,
        status,
        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        "directory response received"
    );
    let body = response.into_string().map_err(|error| {
        let kind = if error.kind() == IoErrorKind::TimedOut {
            CoreErrorKind::Timeout
        } else {
            CoreErrorKind::Network
        };
        CoreError::new(kind, format!("failed to read response body: {error}"))
            .operation(request.operation)
            .status(status)
    })?;

    Ok(HttpResponse { status, body })
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<std::io::Error>())
        .is_some_and(|error| {
            matches!(error.kind(), IoErrorKind::TimedOut | IoErrorKind::WouldBlock)
        })
}
