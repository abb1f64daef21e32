//! Command-line interface.
//!
//! Flags override values from the optional config file, which override the
//! built-in defaults.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{read_config, validate_config, AppConfig, ConfigError};
use crate::security::headers::parse_header_list;

#[derive(Debug, Parser)]
#[command(name = "whatsmyip")]
#[command(
    about = "WhatsMyIP - A simple service to display client IP and HTTP headers",
    long_about = None,
    version
)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// IP address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Comma separated header names to include
    #[arg(long)]
    pub include: Option<String>,

    /// Comma separated header names to exclude
    #[arg(long)]
    pub exclude: Option<String>,

    /// Base URL of the whois provider
    #[arg(long)]
    pub whois_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Expose Prometheus metrics
    #[arg(long)]
    pub metrics: bool,
}

impl Cli {
    /// Resolve the effective, validated configuration.
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => AppConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.listener.host = host;
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(include) = self.include {
            config.headers.include = parse_header_list(&include);
        }
        if let Some(exclude) = self.exclude {
            config.headers.exclude = parse_header_list(&exclude);
        }
        if let Some(url) = self.whois_url {
            config.whois.base_url = url;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if self.metrics {
            config.observability.metrics_enabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("whatsmyip").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config.listener.bind_address(), "0.0.0.0:8080");
        assert!(config.headers.include.is_empty());
    }

    #[test]
    fn test_flags_override() {
        let config = parse(&[
            "--host",
            "127.0.0.1",
            "--port",
            "9090",
            "--include",
            "X-Real-IP, User-Agent",
            "--exclude",
            "cookie,",
            "--whois-url",
            "https://whois.example/json",
            "--metrics",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.listener.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.headers.include, vec!["X-Real-IP", "User-Agent"]);
        assert_eq!(config.headers.exclude, vec!["cookie"]);
        assert_eq!(config.whois.base_url, "https://whois.example/json");
        assert!(config.observability.metrics_enabled);
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[listener]\nport = 0\nhost = \"10.0.0.1\"\n").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = parse(&["--config", &path, "--port", "8000"]).into_config().unwrap();
        assert_eq!(config.listener.bind_address(), "10.0.0.1:8000");
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["whatsmyip", "--port", "70000"]).is_err());
        assert!(Cli::try_parse_from(["whatsmyip", "--port", "http"]).is_err());

        let err = parse(&["--port", "0"]).into_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
