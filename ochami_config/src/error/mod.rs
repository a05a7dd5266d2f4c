//! Error types produced by the configuration engine.

mod constructors;
mod conversions;
mod types;

pub use types::ConfigError;

/// Result alias used throughout the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;
