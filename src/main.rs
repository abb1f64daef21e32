//! WhatsMyIP service binary.
//!
//! ```text
//!   client ──▶ listener ──▶ http::server ──▶ http::handler ──▶ render ──▶ client
//!                                               │
//!                          net::classify ◀──────┤
//!                  security::access_control ◀───┤
//!                                               ▼
//!                        whois::resolver ──▶ cache ──▶ ip-api provider
//! ```

use clap::Parser;

use whatsmyip::cli::Cli;
use whatsmyip::lifecycle::startup;
use whatsmyip::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("whatsmyip v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        whois_url = %config.whois.base_url,
        cache_ttl_secs = config.cache.ttl_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
