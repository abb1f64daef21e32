//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Validate URLs and addresses before any subsystem uses them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid port: {0}")]
    InvalidPort(u16),

    #[error("listener host must not be empty")]
    EmptyHost,

    #[error("invalid whois base URL '{url}': {reason}")]
    InvalidWhoisUrl { url: String, reason: String },

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),
}

/// Check the configuration, collecting every problem.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::InvalidPort(config.listener.port));
    }
    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    if let Err(reason) = check_whois_url(&config.whois.base_url) {
        errors.push(ValidationError::InvalidWhoisUrl {
            url: config.whois.base_url.clone(),
            reason,
        });
    }

    let durations = [
        ("whois.timeout_secs", config.whois.timeout_secs),
        ("cache.ttl_secs", config.cache.ttl_secs),
        ("cache.purge_interval_secs", config.cache.purge_interval_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (name, value) in durations {
        if value == 0 {
            errors.push(ValidationError::ZeroDuration(name));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_whois_url(raw: &str) -> Result<(), String> {
    let url = url::Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot be a base".to_string());
    }
    Ok(())
}
