//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Start background tasks (cache sweeper, metrics)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::AppConfig;
use crate::http::{AppState, HandlebarsRenderer, HttpServer, RenderError, RequestHandler};
use crate::lifecycle::{signals, Shutdown};
use crate::net::listener::{self, ListenerError};
use crate::observability::metrics;
use crate::security::headers::HeaderPolicy;
use crate::whois::{IpApiClient, LookupCache, LookupError, LookupService, WhoisResolver};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("whois client: {0}")]
    Whois(#[from] LookupError),

    #[error("renderer: {0}")]
    Render(#[from] RenderError),

    #[error("listener: {0}")]
    Listener(#[from] ListenerError),

    #[error("metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the shared state around an explicit lookup service.
pub fn build_state_with(
    config: &AppConfig,
    service: Arc<dyn LookupService>,
) -> Result<AppState, StartupError> {
    let cache = LookupCache::new(Duration::from_secs(config.cache.ttl_secs));
    let resolver = WhoisResolver::new(service, cache);
    let policy = HeaderPolicy::new(&config.headers.include, &config.headers.exclude);
    let renderer = HandlebarsRenderer::from_config(config.render.template_path.as_deref())?;

    tracing::info!(
        include = ?policy.include(),
        exclude = ?policy.exclude(),
        "Header policy configured"
    );

    Ok(AppState {
        handler: Arc::new(RequestHandler::new(resolver, policy)),
        renderer: Arc::new(renderer),
    })
}

/// Build the shared state with the configured HTTP whois provider.
pub fn build_state(config: &AppConfig) -> Result<AppState, StartupError> {
    let client = IpApiClient::new(&config.whois)?;
    build_state_with(config, Arc::new(client))
}

/// Run the service until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    let state = build_state(&config)?;

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let shutdown = Shutdown::new();
    signals::forward_signals(shutdown.clone());

    let cache = state.handler.resolver().cache();
    let purge_interval = Duration::from_secs(config.cache.purge_interval_secs);
    let sweeper = cache.spawn_sweeper(purge_interval, shutdown.subscribe());
    tracing::info!(
        ttl_secs = cache.ttl().as_secs(),
        purge_interval_secs = purge_interval.as_secs(),
        "Whois cache sweeper started"
    );

    let listener = listener::bind(&config.listener).await?;
    let server = HttpServer::new(state, Duration::from_secs(config.timeouts.request_secs));
    server.run(listener, shutdown.subscribe()).await?;

    // Ensure the sweeper sees the signal even if the server stopped on its own.
    shutdown.trigger();
    let _ = sweeper.await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whois::StubLookup;

    #[tokio::test]
    async fn test_bad_metrics_address_aborts_startup() {
        let mut config = AppConfig::default();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".to_string();

        let err = run(config).await.unwrap_err();
        assert!(matches!(err, StartupError::MetricsAddress(_)));
    }

    #[test]
    fn test_state_uses_configured_cache_ttl() {
        let mut config = AppConfig::default();
        config.cache.ttl_secs = 42;

        let state = build_state_with(&config, Arc::new(StubLookup::failing())).unwrap();
        assert_eq!(state.handler.resolver().cache().ttl(), Duration::from_secs(42));
    }
}
