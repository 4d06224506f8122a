//! HTTP client for authenticated BotPenguin API calls.
//!
//! This module provides the [`ApiClient`] for making authenticated calls to
//! the BotPenguin API, the [`OperationRequest`] value describing one outbound
//! call, and the [`RemoteApi`] trait that decouples request construction from
//! the transport so callers can be tested without a network.

mod discovery;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;

pub use discovery::{SelectOption, TemplateField};

/// Production BotPenguin API origin.
pub const DEFAULT_BASE_URL: &str = "https://api.botpenguin.com";

// ============================================================================
// Client Configuration
// ============================================================================

/// Configuration for BotPenguin API client behavior.
///
/// Controls the API origin, request timeout, and user agent.
///
/// # Examples
///
/// ```
/// use botpenguin_sdk::client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_base_url("https://staging-api.botpenguin.com");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// BotPenguin API base URL
    pub base_url: String,
    /// User agent string for API requests
    pub user_agent: String,
    /// Request timeout duration
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "botpenguin-sdk/0.1.0".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for client configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Builder for constructing `ClientConfig` instances.
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new configuration builder with defaults.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Operation Request
// ============================================================================

/// One outbound API call, fully described.
///
/// Built per work item by the dispatch layer, handed to a [`RemoteApi`]
/// implementation, and discarded once the call returns. Headers and query
/// parameters carry only what the specific operation needs; the transport
/// adds the headers shared by every call.
///
/// # Examples
///
/// ```
/// use botpenguin_sdk::client::OperationRequest;
/// use reqwest::Method;
/// use serde_json::json;
///
/// let request = OperationRequest::new(Method::POST, "/inbox/users/import")
///     .with_header("botId", "bot-1")
///     .with_query("access_token", "token")
///     .with_body(json!([{"profile": {}}]));
/// assert_eq!(request.path, "/inbox/users/import");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API base URL
    pub path: String,
    /// Operation-specific headers
    pub headers: Vec<(String, String)>,
    /// Operation-specific query parameters
    pub query: Vec<(String, String)>,
    /// JSON body, when the operation carries one
    pub body: Option<Value>,
}

impl OperationRequest {
    /// Create a request with no headers, query, or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Set the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a query parameter value by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Remote API Trait
// ============================================================================

/// Transport seam for BotPenguin API calls.
///
/// The dispatch and webhook layers build [`OperationRequest`] values and hand
/// them to this trait; [`ApiClient`] is the production implementation. Tests
/// substitute scripted implementations to exercise per-item failure handling
/// without a network.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Perform one API call and return the parsed JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures, timeouts, non-2xx
    /// responses, and unparseable bodies.
    async fn send(&self, request: OperationRequest) -> Result<Value, ApiError>;
}

// ============================================================================
// API Client
// ============================================================================

/// BotPenguin API client.
///
/// Wraps a reqwest client configured with the timeout and user agent from
/// [`ClientConfig`]. Every call sends the `Accept` and `authtype` headers the
/// API expects; authorization material is supplied per request by the caller.
///
/// # Examples
///
/// ```no_run
/// use botpenguin_sdk::client::{ApiClient, ClientConfig};
///
/// # fn example() -> Result<(), botpenguin_sdk::ApiError> {
/// let client = ApiClient::new(ClientConfig::default())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ApiError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url_for(&self, path: &str) -> String {
        // Normalize the path so callers can pass either form.
        let normalized_path = path.strip_prefix('/').unwrap_or(path);
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            normalized_path
        )
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn send(&self, request: OperationRequest) -> Result<Value, ApiError> {
        let url = self.url_for(&request.path);
        debug!(method = %request.method, url = %url, "Sending BotPenguin API request");

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .header("Accept", "*/*")
            .header("authtype", "Key");

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::HttpClientError(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            warn!(status = status.as_u16(), url = %url, "BotPenguin API rejected request");
            return Err(ApiError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await.map_err(ApiError::HttpClientError)?;
        if text.is_empty() {
            // Some endpoints acknowledge with an empty body.
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
