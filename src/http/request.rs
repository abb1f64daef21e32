//! Inbound request metadata.
//!
//! # Responsibilities
//! - Capture the peer address and request line
//! - Capture the fields that go into the access log

use axum::http::{header, request::Parts, HeaderMap};
use std::net::SocketAddr;

/// Request line and client details for the access log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    /// `ip:port` of the connection.
    pub peer: String,
    pub method: String,
    pub uri: String,
    pub version: String,
    pub referer: String,
    pub user_agent: String,
}

impl RequestMeta {
    pub fn from_parts(parts: &Parts, peer: SocketAddr) -> Self {
        Self {
            peer: peer.to_string(),
            method: parts.method.to_string(),
            uri: parts.uri.to_string(),
            version: format!("{:?}", parts.version),
            referer: header_or_dash(&parts.headers, header::REFERER),
            user_agent: header_or_dash(&parts.headers, header::USER_AGENT),
        }
    }
}

fn header_or_dash(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("-")
        .to_string()
}
