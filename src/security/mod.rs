//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → access_control.rs (client IP, Remote-User gate)
//!     → headers.rs (include/exclude policy, sorted disclosure)
//! ```
//!
//! # Design Decisions
//! - Fail closed: public clients without Remote-User see only their IP
//! - The Remote-User header is trusted only because a front proxy sets it

pub mod access_control;
pub mod headers;

pub use headers::{HeaderEntry, HeaderPolicy};
