//! Error types used throughout AdSync

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for AdSync
///
/// The first four variants are the failure kinds a read or mutation can end
/// in; the remaining ones cover transport, configuration and local state.
/// Errors are cloneable so a failed read can be stored on a cache entry and
/// handed to every reader that joined the same request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AdSyncError {
    /// No session token is available; never reaches the network.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Upstream answered with a non-2xx status.
    #[error("Upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Upstream body could not be parsed into the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Required parameters were missing; caught before any request is built.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A mutation of the same kind is still pending.
    #[error("Operation already in progress: {0}")]
    Busy(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used for logging and UI decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing session or rejected token (401/403)
    Authentication,
    /// Bad input or a 4xx other than auth
    Client,
    /// 5xx or unparseable upstream payloads
    Server,
    /// Connection failures and timeouts
    Network,
    /// Local configuration or state problems
    Config,
}

impl AdSyncError {
    /// Build an upstream error from a status code and raw body text.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream { status, body: body.into() }
    }

    /// Build a validation error for a missing required parameter.
    pub fn missing_param(name: &str) -> Self {
        Self::Validation(format!("{name} is required"))
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthenticated => ErrorCategory::Authentication,
            Self::Upstream { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            Self::MalformedResponse(_) => ErrorCategory::Server,
            Self::Validation(_) => ErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ErrorCategory::Network,
            Self::Config(_) | Self::Busy(_) | Self::Internal(_) => ErrorCategory::Config,
        }
    }

    /// Whether a manual retry of the same request can be expected to help.
    ///
    /// Nothing in AdSync retries on its own; this only informs callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::Network(_) | Self::Timeout(_) | Self::Busy(_) => true,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable label for structured logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Upstream { .. } => "upstream",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Validation(_) => "validation",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Config(_) => "config",
            Self::Busy(_) => "busy",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for AdSync operations
pub type Result<T> = std::result::Result<T, AdSyncError>;
