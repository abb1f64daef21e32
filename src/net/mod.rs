//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Configured host/port
//!     → listener.rs (bind TCP listener)
//!     → Hand off to HTTP layer
//!
//! Client address (peer or X-Forwarded-For)
//!     → classify.rs (private vs public)
//!     → access control + whois short-circuit
//! ```

pub mod classify;
pub mod listener;

pub use classify::{is_private, is_private_ip};
pub use listener::ListenerError;
