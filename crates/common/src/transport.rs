//! Retrying HTTP transport shared by the token and cluster API calls
//!
//! Connection-level failures (refused connections, timeouts, connections torn
//! down mid-exchange) are retried with a short fixed delay, up to five
//! retries after the initial attempt. HTTP error statuses are not failures at
//! this layer: a 4xx/5xx response is returned to the caller unretried, since
//! a semantic rejection will not get better by asking again.

use std::time::Duration;

use tracing::warn;

/// One initial attempt plus five retries.
const MAX_ATTEMPTS: u32 = 6;

/// Fixed delay between attempts.
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Errors from the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Transient connection failures on every attempt up to the bound.
    #[error("connection failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        source: reqwest::Error,
    },

    /// A non-transient request failure (bad URL, TLS setup, body decode).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The request body cannot be buffered for replay.
    #[error("request body cannot be replayed for retry")]
    NotReplayable,
}

/// Pooled HTTP client with bounded retry on connection-level failures.
///
/// One `Transport` holds one `reqwest::Client`; the pool reuses connections
/// across the token exchange and the cluster API call of an operation.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    client: reqwest::Client,
}

impl Transport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }

    pub fn patch(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.patch(url)
    }

    /// Send a request, retrying transient connection failures.
    ///
    /// The builder is cloned per attempt; every request in this workspace
    /// carries a buffered body, so cloning cannot fail in practice.
    pub async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, TransportError> {
        let mut attempts = 0u32;
        loop {
            let attempt = request.try_clone().ok_or(TransportError::NotReplayable)?;
            attempts += 1;
            match attempt.send().await {
                Ok(response) => return Ok(response),
                Err(e) if is_transient(&e) && attempts < MAX_ATTEMPTS => {
                    warn!(attempts, error = %e, "transient connection failure, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) if is_transient(&e) => {
                    return Err(TransportError::Exhausted {
                        attempts,
                        source: e,
                    });
                }
                Err(e) => return Err(TransportError::Request(e)),
            }
        }
    }
}

/// Connection-level failures worth retrying. Anything that produced an HTTP
/// response, whatever its status, never reaches this classification.
fn is_transient(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}
