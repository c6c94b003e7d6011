//! Session context - dependency injection container
//!
//! One `AdsContext` lives for one signed-in session. It owns the cache
//! coordinator, so nothing is cached outside an explicitly built context,
//! and `logout` tears the whole graph down.

use std::sync::Arc;

use adsync_core::{AdsResourcePort, CacheCoordinator, DashboardSession, SelectionState};
use adsync_domain::{Config, Result};
use tracing::info;

use crate::api::{ApiClient, ApiClientConfig, AuthProvider, GoogleAdsCommands};

/// Session context - holds the client, the cache and the dashboard session
pub struct AdsContext {
    pub config: Config,
    pub auth: Arc<dyn AuthProvider>,
    pub commands: Arc<GoogleAdsCommands>,
    /// Cache shared by every view of this session.
    pub cache: CacheCoordinator,
    pub dashboard: Arc<DashboardSession>,
}

impl AdsContext {
    /// Build transport, resource client, cache coordinator and dashboard
    /// session from `config`.
    ///
    /// Must be called inside a tokio runtime; the dashboard session polls on
    /// it.
    ///
    /// # Errors
    /// `Config` when the configuration does not validate or the base URL is
    /// unusable.
    pub fn new(config: Config, auth: Arc<dyn AuthProvider>) -> Result<Self> {
        config.validate()?;

        let client = ApiClient::new(ApiClientConfig::from(&config.api), Arc::clone(&auth))?;
        let commands = Arc::new(GoogleAdsCommands::new(Arc::new(client)));
        let port: Arc<dyn AdsResourcePort> = commands.clone();
        let cache = CacheCoordinator::new(port);
        let dashboard = Arc::new(DashboardSession::new(
            cache.clone(),
            SelectionState::with_local_today(config.selection.default_range_days),
            config.polling.interval(),
        ));

        info!(base_url = %config.api.base_url, "ads context ready");
        Ok(Self { config, auth, commands, cache, dashboard })
    }

    /// Stop polling, drop every cache entry and forget the session token.
    pub fn logout(&self) {
        self.dashboard.teardown();
        self.dashboard.clear_selection();
        self.cache.clear();
        self.auth.clear_session();
        info!("signed out; session state discarded");
    }
}

impl std::fmt::Debug for AdsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdsContext")
            .field("base_url", &self.config.api.base_url)
            .field("cached_entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}
