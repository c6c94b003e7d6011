//! # AdSync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The Auth Provider boundary and fail-closed token supplier
//! - HTTP transport and the Google Ads resource client
//! - Configuration loading (environment and JSON/TOML files)
//! - Tracing initialisation
//! - `AdsContext`, the per-session container
//!
//! ## Architecture
//! - Implements traits defined in `adsync-core`
//! - Contains all "impure" code (network, environment, files)

pub mod api;
pub mod config;
pub mod context;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientConfig, AuthProvider, GoogleAdsCommands, Session, SessionStore,
    TokenSupplier,
};
pub use context::AdsContext;
pub use errors::InfraError;
pub use http::HttpClient;
pub use observability::init_tracing;
