//! Client identity and disclosure gating.
//!
//! # Responsibilities
//! - Derive the client address from the peer address and X-Forwarded-For
//! - Decide whether a request may see headers and whois data
//!
//! # Design Decisions
//! - X-Forwarded-For is taken verbatim: no list splitting, no validation
//! - Remote-User is a trusted-proxy signal; only its presence matters

use axum::http::HeaderMap;
use std::borrow::Cow;
use std::net::SocketAddr;

/// Header that overrides the peer address.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Header set by an authenticating front proxy.
pub const REMOTE_USER: &str = "remote-user";

/// Resolve the client address for a request.
///
/// `peer` is the connection's remote address, with or without a port. A
/// non-empty `X-Forwarded-For` replaces it unconditionally.
pub fn client_ip(peer: &str, headers: &HeaderMap) -> String {
    match header_str(headers, X_FORWARDED_FOR) {
        Some(forwarded) => forwarded.into_owned(),
        None => strip_port(peer).to_string(),
    }
}

/// The value of the `Remote-User` header, if present and non-empty.
///
/// Non-UTF-8 bytes are replaced, so the value is for logging only.
pub fn remote_user(headers: &HeaderMap) -> Option<Cow<'_, str>> {
    header_str(headers, REMOTE_USER)
}

/// Private clients are trusted; public ones need a `Remote-User`.
pub fn is_authenticated(is_private: bool, headers: &HeaderMap) -> bool {
    is_private || remote_user(headers).is_some()
}

/// Strip a trailing `:port` from `host:port` or `[v6]:port`.
///
/// Anything that is not in one of those shapes is returned unchanged.
pub fn strip_port(addr: &str) -> &str {
    if addr.parse::<SocketAddr>().is_ok() {
        if let Some((host, _)) = addr.rsplit_once(':') {
            return host
                .strip_prefix('[')
                .and_then(|h| h.strip_suffix(']'))
                .unwrap_or(host);
        }
    }

    match addr.rsplit_once(':') {
        Some((host, port))
            if !host.contains(':') && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) =>
        {
            host
        }
        _ => addr,
    }
}

/// First value of a header, if it has any bytes at all.
///
/// Obs-text bytes count as content and are decoded lossily.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<Cow<'a, str>> {
    headers
        .get(name)
        .filter(|value| !value.as_bytes().is_empty())
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
}
