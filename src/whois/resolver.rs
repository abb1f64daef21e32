//! Whois resolution pipeline.
//!
//! # Responsibilities
//! - Short-circuit private addresses with a synthetic record
//! - Serve repeated public addresses from the cache
//! - Fetch and cache records for new public addresses
//!
//! # Design Decisions
//! - Failures are returned, never cached
//! - Concurrent misses for one address may each reach the provider

use std::sync::Arc;

use crate::net::classify;
use crate::observability::metrics;
use crate::whois::cache::LookupCache;
use crate::whois::client::LookupService;
use crate::whois::types::{LookupResult, OwnershipInfo};

/// Resolves client addresses to shared, read-only whois records.
#[derive(Clone)]
pub struct WhoisResolver {
    service: Arc<dyn LookupService>,
    cache: LookupCache,
    private: Arc<OwnershipInfo>,
}

impl WhoisResolver {
    pub fn new(service: Arc<dyn LookupService>, cache: LookupCache) -> Self {
        Self {
            service,
            cache,
            private: Arc::new(OwnershipInfo::private_address()),
        }
    }

    /// Resolve a client address.
    pub async fn lookup(&self, address: &str) -> LookupResult<Arc<OwnershipInfo>> {
        if classify::is_private(address) {
            metrics::record_whois_lookup("private");
            return Ok(self.private.clone());
        }

        if let Some(info) = self.cache.get(address) {
            tracing::debug!(ip = %address, "Cache hit for whois info");
            metrics::record_whois_lookup("cache_hit");
            return Ok(info);
        }

        let info = match self.service.lookup(address).await {
            Ok(info) => Arc::new(info),
            Err(e) => {
                metrics::record_whois_lookup("error");
                return Err(e);
            }
        };

        self.cache.set(address, info.clone());
        tracing::debug!(ip = %address, status = %info.status, "Cached whois info");
        metrics::record_whois_lookup("fetched");

        Ok(info)
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }
}
