//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (TOML, optional) → loader.rs (parse & deserialize)
//!     → command-line flags (crate::cli overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → handed by value/Arc to each subsystem at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{read_config, ConfigError};
pub use schema::{
    AppConfig, CacheConfig, HeaderPolicyConfig, ListenerConfig, ObservabilityConfig,
    RenderConfig, TimeoutConfig, WhoisConfig,
};
pub use validation::{validate_config, ValidationError};
