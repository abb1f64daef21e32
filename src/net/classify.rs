//! Private address classification.
//!
//! # Responsibilities
//! - Decide whether a client address is internal (private, loopback, link-local)
//! - Accept raw strings straight from request metadata
//!
//! # Design Decisions
//! - Unparseable input is public, never an error
//! - IPv4-mapped IPv6 literals are classified by their IPv4 part
//! - Pure functions, safe to call from any task

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Returns true if `address` is a literal in a well-known private range.
pub fn is_private(address: &str) -> bool {
    match address.parse::<IpAddr>() {
        Ok(ip) => is_private_ip(ip),
        Err(_) => false,
    }
}

/// Returns true if `ip` belongs to a well-known private range.
pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_private_v4(v4),
            None => is_private_v6(v6),
        },
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    match a {
        10 | 127 => true,
        172 => (16..=31).contains(&b),
        192 => b == 168,
        169 => b == 254,
        _ => ip.is_unspecified(),
    }
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        // fe80::/10
        || (first & 0xffc0) == 0xfe80
        // fc00::/7
        || (first & 0xfe00) == 0xfc00
}
