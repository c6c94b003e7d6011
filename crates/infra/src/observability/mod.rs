//! Tracing initialisation
//!
//! Installs a global `fmt` subscriber with an `EnvFilter`. `RUST_LOG` wins
//! over the configured default directive. Only the first call installs
//! anything.

use adsync_domain::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Returns `false` when a global subscriber was already set, by an earlier
/// call or by the host application.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init().is_ok()
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(true)).try_init().is_ok()
    };

    if installed {
        tracing::debug!(filter = %config.filter, json = config.json, "tracing initialised");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let config = LoggingConfig { filter: "not a valid [directive".into(), json: false };
        let _ = init_tracing(&config);
        assert!(!init_tracing(&LoggingConfig::default()));
    }
}
