//! Whois provider clients.
//!
//! # Responsibilities
//! - Define the lookup capability the resolver depends on
//! - Query the HTTP provider with a hard timeout
//! - Provide a deterministic stand-in for tests
//!
//! # Design Decisions
//! - One attempt per call; retries happen on the next request
//! - The address is percent-encoded as a single path segment

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::WhoisConfig;
use crate::whois::types::{LookupError, LookupResult, OwnershipInfo};

/// A source of whois records.
#[async_trait]
pub trait LookupService: Send + Sync {
    /// Resolve a public address. Called only after the cache missed.
    async fn lookup(&self, address: &str) -> LookupResult<OwnershipInfo>;
}

/// HTTP provider speaking the ip-api.com JSON format.
#[derive(Clone)]
pub struct IpApiClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl IpApiClient {
    /// Create a client for the configured provider.
    pub fn new(config: &WhoisConfig) -> LookupResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| LookupError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(LookupError::InvalidUrl(config.base_url.clone()));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The request URL for an address: `<base>/<address>`.
    pub fn lookup_url(&self, address: &str) -> LookupResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(address);
        Ok(url)
    }

    fn map_error(&self, err: reqwest::Error) -> LookupError {
        if err.is_timeout() {
            LookupError::Timeout(self.timeout.as_secs())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl LookupService for IpApiClient {
    async fn lookup(&self, address: &str) -> LookupResult<OwnershipInfo> {
        let url = self.lookup_url(address)?;
        tracing::debug!(ip = %address, url = %url, "Fetching whois info");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        let info: OwnershipInfo = serde_json::from_slice(&body)?;
        Ok(info)
    }
}

/// Deterministic lookup source for tests and offline runs.
///
/// Answers every call with the same record, or fails every call, and counts
/// how often it was asked.
#[derive(Clone)]
pub struct StubLookup {
    answer: Option<OwnershipInfo>,
    calls: Arc<AtomicUsize>,
}

impl StubLookup {
    /// Always answer with `info`.
    pub fn answering(info: OwnershipInfo) -> Self {
        Self {
            answer: Some(info),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always fail as if the provider timed out.
    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LookupService for StubLookup {
    async fn lookup(&self, _address: &str) -> LookupResult<OwnershipInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Some(info) => Ok(info.clone()),
            None => Err(LookupError::Timeout(5)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> IpApiClient {
        IpApiClient::new(&WhoisConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_lookup_url_appends_segment() {
        let c = client("http://ip-api.com/json");
        assert_eq!(
            c.lookup_url("8.8.8.8").unwrap().as_str(),
            "http://ip-api.com/json/8.8.8.8"
        );

        let trailing = client("http://ip-api.com/json/");
        assert_eq!(
            trailing.lookup_url("8.8.8.8").unwrap().as_str(),
            "http://ip-api.com/json/8.8.8.8"
        );
    }

    #[test]
    fn test_lookup_url_escapes_raw_header_values() {
        let c = client("http://ip-api.com/json");
        let url = c.lookup_url("1.2.3.4, ../admin").unwrap();
        assert_eq!(url.path(), "/json/1.2.3.4,%20..%2Fadmin");
        assert_eq!(url.host_str(), Some("ip-api.com"));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = IpApiClient::new(&WhoisConfig {
            base_url: "mailto:someone".to_string(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(LookupError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_stub_counts_calls() {
        let stub = StubLookup::answering(OwnershipInfo {
            country: "TestCountry".to_string(),
            ..OwnershipInfo::default()
        });
        assert_eq!(stub.lookup("8.8.8.8").await.unwrap().country, "TestCountry");
        assert_eq!(stub.calls(), 1);

        let failing = StubLookup::failing();
        assert!(matches!(
            failing.lookup("8.8.8.8").await,
            Err(LookupError::Timeout(5))
        ));
        assert_eq!(failing.calls(), 1);
    }
}
