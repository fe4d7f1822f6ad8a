use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

const BODY_PREVIEW_CHARS: usize = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub attempts: usize,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3),
            read_timeout: Duration::from_secs(8),
            attempts: 3,
            retry_delay: Duration::from_millis(750),
        }
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {}", status_text(.status, .body))]
    Status { status: u16, body: String },
    #[error("request failed after {attempts} attempt(s): {detail}")]
    Exhausted { attempts: usize, detail: String },
    #[error("request failed: response decode failed: {0}")]
    Decode(String),
}

impl HttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Exhausted { .. } | Self::Decode(_) => None,
        }
    }
}

fn status_text(status: &u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP status {status}")
    } else {
        let truncated = body.chars().take(BODY_PREVIEW_CHARS).collect::<String>();
        format!("HTTP status {status} ({truncated})")
    }
}

fn should_retry_http_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..=599).contains(&status)
}

pub(crate) fn get_text_with_retries(
    url: &str,
    query: &[(String, String)],
    policy: &RetryPolicy,
) -> Result<String, HttpError> {
    let attempts = policy.attempts.max(1);
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(policy.connect_timeout)
        .timeout_read(policy.read_timeout)
        .timeout_write(policy.read_timeout)
        .build();

    for attempt in 1..=attempts {
        let mut request = agent.get(url).set("Accept", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }

        debug!(url, attempt, "sending request");
        match request.call() {
            Ok(response) => {
                return response
                    .into_string()
                    .map_err(|err| HttpError::Decode(err.to_string()));
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().ok().unwrap_or_default();

                if !should_retry_http_status(status) {
                    return Err(HttpError::Status { status, body });
                }
                if attempt < attempts {
                    warn!(url, status, attempt, "retryable status, backing off");
                    thread::sleep(policy.retry_delay);
                    continue;
                }
                return Err(HttpError::Exhausted {
                    attempts,
                    detail: status_text(&status, &body),
                });
            }
            Err(ureq::Error::Transport(err)) => {
                if attempt < attempts {
                    warn!(url, attempt, error = %err, "transport error, backing off");
                    thread::sleep(policy.retry_delay);
                    continue;
                }
                return Err(HttpError::Exhausted {
                    attempts,
                    detail: format!("transport error: {err}"),
                });
            }
        }
    }

    Err(HttpError::Exhausted {
        attempts,
        detail: "no attempt produced a response".to_string(),
    })
}
