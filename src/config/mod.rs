//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CONFIG_PATH / --config
//!     → loader.rs (resolve path, parse TOML, apply ENV / HTTP_SERVER_ADDR)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → read once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields except `storage_path` have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config_path, ConfigError};
pub use schema::{AppConfig, HttpServerConfig, LimitsConfig, LogFormat, ObservabilityConfig, TimeoutConfig};
