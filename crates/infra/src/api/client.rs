//! Bearer-authenticated JSON client for the upstream Ads API
//!
//! Every call reads the session token first and fails with
//! `Unauthenticated` before building a request when there is none. Non-2xx
//! answers surface as `Upstream` with the raw body text; 2xx bodies that do
//! not parse surface as `MalformedResponse`.

use std::sync::Arc;
use std::time::Duration;

use adsync_domain::types::params::QueryPairs;
use adsync_domain::{AdSyncError, ApiConfig, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::auth::{AuthProvider, TokenSupplier};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "https://ads.example.com")
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
    /// Transport attempts for connection failures
    pub max_attempts: usize,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            max_attempts: config.max_attempts,
        }
    }
}

/// API client for the upstream Ads API
pub struct ApiClient {
    http_client: HttpClient,
    tokens: TokenSupplier,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns `Config` if the base URL is not an absolute http(s) URL, or
    /// whatever the transport fails to build with.
    pub fn new(config: ApiClientConfig, auth: Arc<dyn AuthProvider>) -> Result<Self> {
        let parsed = Url::parse(config.base_url.trim()).map_err(|e| {
            AdSyncError::Config(format!("Invalid API base URL {}: {e}", config.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AdSyncError::Config(format!(
                "API base URL must use http or https: {}",
                config.base_url
            )));
        }

        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_attempts)
            .user_agent(concat!("adsync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            tokens: TokenSupplier::new(auth),
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a GET request with URL-encoded query parameters
    ///
    /// # Errors
    ///
    /// `Unauthenticated` without a session token (nothing is sent),
    /// `Upstream` for non-2xx statuses, `MalformedResponse` for bodies that do
    /// not parse, `Network`/`Timeout` for transport failures.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &QueryPairs) -> Result<T> {
        let token = self.tokens.require_token().await?;
        let url = self.url(path, query);

        debug!(params = query.len(), "GET request");

        let request = self.authorized(Method::GET, &url, &token);
        self.execute(path, request).await
    }

    /// Execute a POST request with a JSON body
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.tokens.require_token().await?;
        let url = self.url(path, &QueryPairs::new());

        debug!("POST request");

        let request = self
            .authorized(Method::POST, &url, &token)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        self.execute(path, request).await
    }

    fn url(&self, path: &str, query: &QueryPairs) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        for (i, (name, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    fn authorized(&self, method: Method, url: &str, token: &str) -> RequestBuilder {
        self.http_client.request(method, url).header(AUTHORIZATION, format!("Bearer {token}"))
    }

    async fn execute<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T> {
        let response = self.http_client.send(request).await?;

        let status = response.status();
        let body = response.text().await.map_err(|e| AdSyncError::from(InfraError::from(e)))?;

        if !status.is_success() {
            warn!(path, status = status.as_u16(), "upstream returned an error status");
            return Err(AdSyncError::upstream(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(path, error = %e, "upstream body did not match the expected shape");
            AdSyncError::MalformedResponse(format!("{path}: {e}"))
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the base URL, keeping the other settings
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut config = self.config.take().unwrap_or_default();
        config.base_url = base_url.into();
        self.config = Some(config);
        self
    }

    /// Set the authentication provider
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if required fields are missing or client creation fails
    pub fn build(self) -> Result<ApiClient> {
        let config = self.config.unwrap_or_default();
        let auth =
            self.auth.ok_or_else(|| AdSyncError::Config("Auth provider not set".to_string()))?;

        ApiClient::new(config, auth)
    }
}
