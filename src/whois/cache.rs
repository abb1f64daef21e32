//! Expiring whois record cache.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use crate::observability::metrics;
use crate::whois::types::OwnershipInfo;

/// A cached record with its expiry deadline.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<OwnershipInfo>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// A thread-safe, time-expiring map of address → whois record.
///
/// Expiry is checked on every read; a background sweeper additionally
/// removes stale entries so memory stays bounded without reads.
#[derive(Clone)]
pub struct LookupCache {
    inner: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl LookupCache {
    /// Create a new empty cache with the default entry lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Get a live record. Expired entries are removed and reported absent.
    pub fn get(&self, key: &str) -> Option<Arc<OwnershipInfo>> {
        let now = Instant::now();
        match self.inner.get(key) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }

        // Re-check under the write lock so a fresh concurrent `set` survives.
        self.inner.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    /// Store a record with the default lifetime.
    pub fn set(&self, key: impl Into<String>, value: Arc<OwnershipInfo>) {
        self.set_with_ttl(key, value, self.ttl);
    }

    /// Store a record with an explicit lifetime.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: Arc<OwnershipInfo>, ttl: Duration) {
        self.inner.insert(
            key.into(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        metrics::record_cache_size(self.inner.len());
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.inner.len());
        metrics::record_cache_size(self.inner.len());
        removed
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Default entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Spawn the periodic sweep task. It exits on the shutdown signal.
    pub fn spawn_sweeper(
        &self,
        interval: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = cache.purge_expired();
                        if removed > 0 {
                            tracing::debug!(removed, remaining = cache.len(), "Purged expired whois entries");
                        }
                    }
                    _ = shutdown.recv() => {
                        tracing::debug!("Cache sweeper received shutdown signal, exiting loop");
                        break;
                    }
                }
            }
        })
    }
}
