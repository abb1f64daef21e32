//! Whois enrichment subsystem.
//!
//! # Data Flow
//! ```text
//! client address
//!     → resolver.rs (private? → synthetic record)
//!     → cache.rs (live entry? → shared record)
//!     → client.rs (one upstream GET, fixed timeout)
//!     → cache.rs (store on success only)
//!     → Arc<OwnershipInfo> to the request handler
//! ```
//!
//! # Design Decisions
//! - Records are immutable once created and shared through `Arc`
//! - The provider is a trait object so tests can swap in a stub
//! - A failed lookup never poisons the cache

pub mod cache;
pub mod client;
pub mod resolver;
pub mod types;

pub use cache::LookupCache;
pub use client::{IpApiClient, LookupService, StubLookup};
pub use resolver::WhoisResolver;
pub use types::{LookupError, LookupResult, OwnershipInfo};
