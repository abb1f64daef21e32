//! Request classification and assembly.
//!
//! # Responsibilities
//! - Resolve the client address and classify it
//! - Gate headers and whois data behind the authentication signal
//! - Assemble the record handed to the renderer
//!
//! # Design Decisions
//! - A whois failure degrades the page, it never fails the request
//! - No state is mutated here except through the whois cache

use axum::http::HeaderMap;
use serde::Serialize;
use std::sync::Arc;

use crate::net::classify;
use crate::security::access_control;
use crate::security::headers::{header_groups, HeaderEntry, HeaderPolicy};
use crate::whois::{OwnershipInfo, WhoisResolver};

/// Everything the page shows for one request.
#[derive(Debug, Clone, Serialize)]
pub struct PresentationRecord {
    pub client_ip: String,
    pub authenticated: bool,
    /// Empty unless authenticated.
    pub headers: Vec<HeaderEntry>,
    /// Absent unless authenticated and resolved.
    pub whois: Option<Arc<OwnershipInfo>>,
}

/// Composes classification, access control, whois and header filtering.
pub struct RequestHandler {
    resolver: WhoisResolver,
    policy: HeaderPolicy,
}

impl RequestHandler {
    pub fn new(resolver: WhoisResolver, policy: HeaderPolicy) -> Self {
        Self { resolver, policy }
    }

    /// Build the record for a request from its peer address and headers.
    pub async fn handle(&self, peer: &str, headers: &HeaderMap) -> PresentationRecord {
        let client_ip = access_control::client_ip(peer, headers);
        let is_private = classify::is_private(&client_ip);
        let authenticated = access_control::is_authenticated(is_private, headers);

        if !authenticated {
            tracing::warn!(
                client_ip = %client_ip,
                "Unauthenticated access from non-private IP: missing Remote-User header"
            );
            return PresentationRecord {
                client_ip,
                authenticated,
                headers: Vec::new(),
                whois: None,
            };
        }

        let whois = match self.resolver.lookup(&client_ip).await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::error!(client_ip = %client_ip, error = %e, "Error getting whois info");
                None
            }
        };

        PresentationRecord {
            client_ip,
            authenticated,
            headers: self.policy.filter(header_groups(headers)),
            whois,
        }
    }

    pub fn resolver(&self) -> &WhoisResolver {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whois::{LookupCache, StubLookup};
    use axum::http::HeaderValue;
    use std::time::Duration;

    fn stub() -> StubLookup {
        StubLookup::answering(OwnershipInfo {
            status: "success".to_string(),
            country: "TestCountry".to_string(),
            ..OwnershipInfo::default()
        })
    }

    fn handler(stub: &StubLookup, policy: HeaderPolicy) -> RequestHandler {
        let resolver = WhoisResolver::new(
            Arc::new(stub.clone()),
            LookupCache::new(Duration::from_secs(3600)),
        );
        RequestHandler::new(resolver, policy)
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[tokio::test]
    async fn test_private_peer_sees_everything() {
        let stub = stub();
        let h = handler(&stub, HeaderPolicy::default());

        let record = h.handle("192.168.1.5:40000", &headers(&[("x-test", "v1")])).await;
        assert_eq!(record.client_ip, "192.168.1.5");
        assert!(record.authenticated);
        assert_eq!(record.headers, vec![HeaderEntry::new("X-Test", "v1")]);
        assert_eq!(record.whois.unwrap().message, "Private IP address");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_public_forwarded_without_user_is_reduced() {
        let stub = stub();
        let h = handler(&stub, HeaderPolicy::default());

        let record = h
            .handle("10.0.0.2:5555", &headers(&[("x-forwarded-for", "8.8.8.8")]))
            .await;
        assert_eq!(record.client_ip, "8.8.8.8");
        assert!(!record.authenticated);
        assert!(record.headers.is_empty());
        assert!(record.whois.is_none());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_public_with_remote_user_resolves() {
        let stub = stub();
        let h = handler(&stub, HeaderPolicy::default());

        let record = h
            .handle(
                "10.0.0.2:5555",
                &headers(&[("x-forwarded-for", "8.8.8.8"), ("remote-user", "alice")]),
            )
            .await;
        assert!(record.authenticated);
        assert_eq!(record.whois.unwrap().country, "TestCountry");
        let names: Vec<_> = record.headers.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Remote-User", "X-Forwarded-For"]);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades() {
        let stub = StubLookup::failing();
        let h = handler(&stub, HeaderPolicy::default());

        let record = h
            .handle(
                "10.0.0.2:5555",
                &headers(&[("x-forwarded-for", "9.9.9.9"), ("remote-user", "bob")]),
            )
            .await;
        assert!(record.authenticated);
        assert!(record.whois.is_none());
        assert!(!record.headers.is_empty());
        assert!(h.resolver().cache().get("9.9.9.9").is_none());
    }

    #[tokio::test]
    async fn test_public_peer_without_headers() {
        let stub = stub();
        let h = handler(&stub, HeaderPolicy::default());

        let record = h.handle("203.0.113.9:1234", &headers(&[("x-test", "v1")])).await;
        assert_eq!(record.client_ip, "203.0.113.9");
        assert!(!record.authenticated);
        assert!(record.headers.is_empty());
        assert!(record.whois.is_none());
    }

    #[tokio::test]
    async fn test_obs_text_forwarded_for_is_not_dropped() {
        let stub = stub();
        let h = handler(&stub, HeaderPolicy::default());

        let mut map = HeaderMap::new();
        map.insert("x-forwarded-for", HeaderValue::from_bytes(b"8.8.8.8\xe9").unwrap());

        let record = h.handle("10.0.0.2:1", &map).await;
        assert_eq!(record.client_ip, "8.8.8.8\u{fffd}");
        assert!(!record.authenticated);
        assert!(record.headers.is_empty());
        assert!(record.whois.is_none());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_ascii_remote_user_unlocks_page() {
        let stub = stub();
        let h = handler(&stub, HeaderPolicy::default());

        let mut map = headers(&[("x-forwarded-for", "8.8.8.8")]);
        map.insert("remote-user", HeaderValue::from_bytes("josé".as_bytes()).unwrap());

        let record = h.handle("10.0.0.2:1", &map).await;
        assert!(record.authenticated);
        assert_eq!(record.whois.unwrap().country, "TestCountry");
        assert!(record
            .headers
            .contains(&HeaderEntry::new("Remote-User", "josé")));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_policy_applied() {
        let stub = stub();
        let h = handler(&stub, HeaderPolicy::new(Vec::<String>::new(), ["cookie"]));

        let record = h
            .handle(
                "127.0.0.1:1",
                &headers(&[("cookie", "secret"), ("accept", "*/*")]),
            )
            .await;
        assert_eq!(record.headers, vec![HeaderEntry::new("Accept", "*/*")]);
    }
}
