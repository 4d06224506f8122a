//! Error types for BotPenguin SDK operations.
//!
//! This module defines all error types used throughout the SDK, with proper
//! classification for retry logic and comprehensive context for debugging.

use thiserror::Error;

use crate::dispatch::OutputRecord;

/// Errors during BotPenguin API operations.
///
/// These errors represent failures when communicating with the BotPenguin API,
/// including HTTP errors, rejected requests, and parsing failures.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response from the BotPenguin API.
    #[error("BotPenguin API error: {status} - {message}")]
    Remote { status: u16, message: String },

    /// Request to the BotPenguin API timed out.
    #[error("Request timeout")]
    Timeout,

    /// HTTP client error (network, TLS, etc.).
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    /// Failed to parse a JSON response from the BotPenguin API.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Client-side configuration problem (bad base URL, client build failure).
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ApiError {
    /// Check if this error represents a transient condition that may succeed if retried.
    ///
    /// Transient conditions include:
    /// - Server errors (5xx)
    /// - Rate limiting (429)
    /// - Request timeouts
    /// - Network/transport errors
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Remote { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout => true,
            Self::HttpClientError(_) => true,
            Self::JsonError(_) => false,
            Self::Configuration { .. } => false,
        }
    }
}

/// A batch dispatch aborted at a specific work item.
///
/// Raised by [`Dispatcher::run`](crate::dispatch::Dispatcher::run) when the
/// error policy is [`Abort`](crate::dispatch::ErrorPolicy::Abort). The records
/// produced before the failing item are carried in `completed` so callers do
/// not lose partial output.
#[derive(Debug, Error)]
#[error("Operation failed for item {item_index}: {source}")]
pub struct DispatchError {
    /// Index of the work item whose remote call failed.
    pub item_index: usize,

    /// Output records produced before the failing item.
    pub completed: Vec<OutputRecord>,

    /// The underlying API failure.
    #[source]
    pub source: ApiError,
}

/// Errors during webhook subscription registration.
///
/// Only subscription creation surfaces errors; the existence check fails open
/// and teardown is always silent.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// The subscribe call was rejected or could not be delivered.
    #[error("Failed to subscribe {event} webhook: {source}")]
    SubscribeFailed {
        event: String,
        #[source]
        source: ApiError,
    },
}

/// Input validation errors.
///
/// These errors occur when validating identifiers or configuration data.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field has an invalid format.
    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
