//! Extensions for mapping errors to `ConfigResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| ConfigError::…(e))`
//! patterns when converting serializer errors into the crate's
//! `ConfigResult<T>` alias, and when attaching the file being processed to a
//! failure.
//!
//! - Use [`ConfigResultExt::into_config`] for error types that implement
//!   `Into<ConfigError>` (for example `serde_json::Error`).
//! - Use [`FileContextExt::in_file`] to name the configuration file a
//!   failure belongs to.
//!
//! # Examples
//!
//! ```
//! use ochami_config::{ConfigResult, ConfigResultExt};
//!
//! fn serialise() -> ConfigResult<serde_json::Value> {
//!     serde_json::to_value(42).into_config()
//! }
//! # assert!(serialise().is_ok());
//! ```

use std::path::Path;

use crate::{ConfigError, ConfigResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<ConfigError>`
/// into a `ConfigResult<T>`.
pub trait ConfigResultExt<T, E> {
    /// Convert `Result<T, E>` into `ConfigResult<T>` using `Into<ConfigError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into [`ConfigError`].
    fn into_config(self) -> ConfigResult<T>;
}

impl<T, E> ConfigResultExt<T, E> for Result<T, E>
where
    E: Into<ConfigError>,
{
    fn into_config(self) -> ConfigResult<T> {
        self.map_err(Into::into)
    }
}

/// Extension attaching a configuration file path to failures.
pub trait FileContextExt<T> {
    /// Wrap any error in [`ConfigError::Source`] naming `path`.
    ///
    /// # Errors
    ///
    /// Returns the original error, wrapped, when the input is `Err`.
    fn in_file(self, path: &Path) -> ConfigResult<T>;
}

impl<T> FileContextExt<T> for ConfigResult<T> {
    fn in_file(self, path: &Path) -> ConfigResult<T> {
        self.map_err(|err| err.in_file(path))
    }
}

/// Convert serializer failures into [`ConfigError::Serialise`].
pub(crate) trait SerialiseExt<T> {
    fn into_serialise(self) -> ConfigResult<T>;
}

impl<T, E> SerialiseExt<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn into_serialise(self) -> ConfigResult<T> {
        self.map_err(|err| ConfigError::Serialise {
            message: err.to_string(),
        })
    }
}
