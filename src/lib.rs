//! WhatsMyIP: echo a client's network identity for debugging proxy chains.
//!
//! Private clients, and public clients vouched for by a front proxy through
//! `Remote-User`, additionally see their request headers and whois data.

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod security;
pub mod whois;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
