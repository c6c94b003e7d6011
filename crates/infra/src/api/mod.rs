//! Upstream Ads API client
//!
//! - `auth`: Auth Provider boundary and the fail-closed token supplier
//! - `client`: bearer-authenticated JSON GET/POST over [`crate::http::HttpClient`]
//! - `commands`: one operation per upstream resource; implements
//!   [`adsync_core::AdsResourcePort`]

pub mod auth;
pub mod client;
pub mod commands;

pub use auth::{AuthProvider, Session, SessionStore, TokenSupplier};
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use commands::GoogleAdsCommands;
