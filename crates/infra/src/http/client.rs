use std::time::Duration;

use adsync_domain::constants::{DEFAULT_API_MAX_ATTEMPTS, DEFAULT_API_TIMEOUT_SECS};
use adsync_domain::{AdSyncError, Result};
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::errors::InfraError;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Shared reqwest transport for the resource client.
///
/// Every request gets the configured timeout. Only connection failures are
/// tried again; once the server has answered, the response is returned
/// whatever its status.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: ReqwestClient,
    timeout: Duration,
    connect_attempts: usize,
    retry_delay: Duration,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Transport with the default timeout and a single attempt.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub const fn max_attempts(&self) -> usize {
        self.connect_attempts
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.inner.request(method, url)
    }

    /// Send `builder`, reconnecting up to the configured attempt count.
    ///
    /// # Errors
    /// `Timeout` when the deadline passes, `Network` when the server cannot
    /// be reached, `Internal` for a request that cannot be built.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let mut attempt = 1;
        loop {
            let request = prepare(&builder)?;
            match self.dispatch(request, attempt).await {
                Err(err) if err.is_connect() && attempt < self.connect_attempts => {
                    tokio::time::sleep(self.retry_delay * u32::try_from(attempt).unwrap_or(1))
                        .await;
                    attempt += 1;
                }
                Err(err) => return Err(self.classify(err)),
                Ok(response) => return Ok(response),
            }
        }
    }

    async fn dispatch(
        &self,
        request: Request,
        attempt: usize,
    ) -> std::result::Result<Response, reqwest::Error> {
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let outcome = self.inner.execute(request).await;
        match &outcome {
            Ok(response) => {
                debug!(attempt, %method, %path, status = %response.status(), "http response");
            }
            Err(err) => warn!(attempt, %method, %path, error = %err, "http request failed"),
        }
        outcome
    }

    fn classify(&self, err: reqwest::Error) -> AdSyncError {
        if err.is_timeout() {
            AdSyncError::Timeout(self.timeout)
        } else {
            InfraError::from(err).into()
        }
    }
}

/// Each attempt sends its own copy; the bodies used here are buffered JSON.
fn prepare(builder: &RequestBuilder) -> Result<Request> {
    builder
        .try_clone()
        .ok_or_else(|| AdSyncError::Internal("streaming request bodies are not supported".into()))?
        .build()
        .map_err(|err| InfraError::from(err).into())
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    connect_attempts: usize,
    retry_delay: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            connect_attempts: DEFAULT_API_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts for a request whose connection could not be opened.
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.connect_attempts = attempts.max(1);
        self
    }

    /// Pause before the n-th reconnect is `n * delay`.
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// Whatever reqwest fails to build the client with.
    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        let inner = builder.build().map_err(InfraError::from)?;

        Ok(HttpClient {
            inner,
            timeout: self.timeout,
            connect_attempts: self.connect_attempts.max(1),
            retry_delay: self.retry_delay,
        })
    }
}
