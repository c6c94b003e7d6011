//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use adsync_domain::AdSyncError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct InfraError(pub AdSyncError);

impl From<InfraError> for AdSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AdSyncError> for InfraError {
    fn from(value: AdSyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoAdSyncError {
    fn into_adsync(self) -> AdSyncError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AdSyncError */
/* -------------------------------------------------------------------------- */

impl IntoAdSyncError for HttpError {
    fn into_adsync(self) -> AdSyncError {
        if self.is_timeout() {
            return AdSyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return AdSyncError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return AdSyncError::MalformedResponse(self.to_string());
        }

        if self.is_builder() {
            return AdSyncError::Internal(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return AdSyncError::upstream(status.as_u16(), reason);
        }

        AdSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_adsync())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → AdSyncError */
/* -------------------------------------------------------------------------- */

impl IntoAdSyncError for JsonError {
    fn into_adsync(self) -> AdSyncError {
        use serde_json::error::Category;

        match self.classify() {
            Category::Io => AdSyncError::Network(format!("failed to read response body: {self}")),
            Category::Syntax | Category::Data | Category::Eof => {
                AdSyncError::MalformedResponse(self.to_string())
            }
        }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_adsync())
    }
}

/* -------------------------------------------------------------------------- */
/* toml / io → AdSyncError */
/* -------------------------------------------------------------------------- */

impl IntoAdSyncError for TomlError {
    fn into_adsync(self) -> AdSyncError {
        AdSyncError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_adsync())
    }
}

impl IntoAdSyncError for IoError {
    fn into_adsync(self) -> AdSyncError {
        AdSyncError::Config(format!("Failed to read config file: {self}"))
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_adsync())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
