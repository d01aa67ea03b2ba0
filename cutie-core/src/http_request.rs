use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};

use crate::error::{CutieError, CutieResult};

/// Thin wrapper over the pinned HTTP client.
///
/// Idempotent `GET` requests are retried on transient failures (connect errors,
/// timeouts, 429 and 5xx). Everything else is sent exactly once so that
/// registrations and message posts are never duplicated.
#[derive(Clone)]
pub struct Request {
    client: reqwest::Client,
    max_retries: u32,
}

impl Request {
    /// Wraps `client`, which must come from [`crate::pinning::build_pinned_client`].
    pub(crate) const fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            max_retries: 3, // total attempts = 4
        }
    }

    #[cfg(test)]
    pub(crate) const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Creates a request builder with defaults applied.
    pub(crate) fn req(&self, method: Method, url: Url) -> RequestBuilder {
        #[cfg(not(test))]
        debug_assert_eq!(url.scheme(), "https");

        self.client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Sends a request built by [`Self::req`].
    pub(crate) async fn handle(&self, request_builder: RequestBuilder) -> CutieResult<Response> {
        let (client, request) = request_builder.build_split();
        let request = request.map_err(|e| CutieError::InvalidRequest {
            reason: format!("request build failed: {e}"),
        })?;

        if request.method() != Method::GET || self.max_retries == 0 {
            return client.execute(request).await.map_err(Into::into);
        }

        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_delay(Duration::from_secs(2))
            .with_max_times(self.max_retries as usize);

        let outcome = (|| async {
            let attempt = request.try_clone().ok_or(AttemptError::NotCloneable)?;
            execute(&client, attempt).await
        })
        .retry(backoff)
        .when(AttemptError::is_retryable)
        .notify(|err, after| log::debug!("Retrying {} in {after:?}: {err}", request.url()))
        .await;

        match outcome {
            Ok(response) | Err(AttemptError::Status(response)) => Ok(response),
            Err(AttemptError::Transport(error)) => Err(error.into()),
            Err(AttemptError::NotCloneable) => Err(CutieError::InvalidRequest {
                reason: "request cannot be retried because it is not cloneable".to_string(),
            }),
        }
    }
}

#[derive(Debug)]
enum AttemptError {
    /// A response whose status is worth retrying. Returned as-is once retries run out.
    Status(Response),
    Transport(reqwest::Error),
    NotCloneable,
}

impl AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Status(_) => true,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::NotCloneable => false,
        }
    }
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(response) => write!(f, "bad status code {}", response.status()),
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::NotCloneable => f.write_str("request not cloneable"),
        }
    }
}

fn is_transient(status: StatusCode) -> bool {
    status.as_u16() == 429 || status.is_server_error()
}

async fn execute(
    client: &reqwest::Client,
    request: reqwest::Request,
) -> Result<Response, AttemptError> {
    match client.execute(request).await {
        Ok(response) if is_transient(response.status()) => Err(AttemptError::Status(response)),
        Ok(response) => Ok(response),
        Err(e) => Err(AttemptError::Transport(e)),
    }
}
