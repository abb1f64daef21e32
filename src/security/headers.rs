//! Request header disclosure policy.
//!
//! # Responsibilities
//! - Normalize configured include/exclude header lists
//! - Select which request headers are echoed back
//! - Produce a deterministic, name-sorted list of entries
//!
//! # Design Decisions
//! - Exclude wins over include
//! - Names compared lower-cased, emitted in their original case
//! - Stable sort keeps repeated values in arrival order

use axum::http::HeaderMap;
use serde::Serialize;
use std::collections::HashSet;

/// A single header name/value pair, one per value of a repeated header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Include/exclude sets of lower-case header names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderPolicy {
    include: HashSet<String>,
    exclude: HashSet<String>,
}

impl HeaderPolicy {
    /// Build a policy from raw name lists.
    ///
    /// Entries are trimmed and lower-cased; empty entries are dropped.
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            include: normalize_names(include),
            exclude: normalize_names(exclude),
        }
    }

    /// Returns true if a header with this name may be disclosed.
    pub fn allows(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        if !self.include.is_empty() && !self.include.contains(&lower) {
            return false;
        }
        !self.exclude.contains(&lower)
    }

    /// Filter a header multimap and sort the result by name.
    pub fn filter<I, N, V>(&self, headers: I) -> Vec<HeaderEntry>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: IntoIterator<Item = String>,
    {
        let mut entries = Vec::new();
        for (name, values) in headers {
            let name = name.into();
            if !self.allows(&name) {
                continue;
            }
            entries.extend(values.into_iter().map(|value| HeaderEntry {
                name: name.clone(),
                value,
            }));
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    pub fn include(&self) -> &HashSet<String> {
        &self.include
    }

    pub fn exclude(&self) -> &HashSet<String> {
        &self.exclude
    }
}

fn normalize_names<I, S>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Split a comma-separated header list ("Cookie, X-Real-IP").
pub fn parse_header_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Group an inbound header map by name, in first-seen order.
///
/// The HTTP stack lower-cases names, so they are restored to canonical
/// display case (`x-forwarded-for` → `X-Forwarded-For`).
pub fn header_groups(headers: &HeaderMap) -> Vec<(String, Vec<String>)> {
    headers
        .keys()
        .map(|name| {
            let values = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect();
            (canonical_name(name.as_str()), values)
        })
        .collect()
}

/// Canonical MIME header form: first letter and letters after '-' upper-cased.
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper = c == '-';
    }
    out
}
