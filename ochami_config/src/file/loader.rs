//! Loading configuration sources from disk.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use super::source::{SourceOrigin, SourceRecord};
use crate::model::Config;
use crate::result_ext::FileContextExt;
use crate::{ConfigError, ConfigResult};

/// Load the configuration file at `path` as a layer of kind `origin`.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// - [`ConfigError::Read`] when the file exists but cannot be read.
/// - [`ConfigError::Source`] wrapping the parse or validation failure, with
///   `path` attached. Text that is not valid UTF-8 is a parse failure.
pub fn load_source(path: &Path, origin: SourceOrigin) -> ConfigResult<Option<SourceRecord>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), %origin, "configuration file not found");
            return Ok(None);
        }
        Err(err) if err.kind() == io::ErrorKind::InvalidData => {
            let parse = ConfigError::Parse {
                line: None,
                column: None,
                message: "file is not valid UTF-8".to_owned(),
            };
            return Err(parse.in_file(path));
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    debug!(path = %path.display(), %origin, bytes = text.len(), "read configuration file");
    SourceRecord::from_text(origin, path, &text)
        .in_file(path)
        .map(Some)
}

/// Read and validate the single configuration file at `path`.
///
/// No other layer is consulted.
///
/// # Errors
///
/// - [`ConfigError::NoConfigPath`] when `path` is empty.
/// - [`ConfigError::SourceNotFound`] when the file does not exist.
/// - Any error of [`load_source`].
pub fn read_config(path: &Path) -> ConfigResult<Config> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::NoConfigPath);
    }
    load_source(path, SourceOrigin::ExplicitFile)?
        .map(|record| record.typed)
        .ok_or_else(|| ConfigError::SourceNotFound {
            path: path.to_path_buf(),
        })
}
