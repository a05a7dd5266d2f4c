//! Persisting configuration files.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::model::Config;
use crate::tree::to_yaml;
use crate::{ConfigError, ConfigResult};

#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;
#[cfg(unix)]
const NEW_DIR_MODE: u32 = 0o755;

/// Serialise `config` as YAML and overwrite the file at `path`.
///
/// An existing file keeps its permission bits; a new file is created with
/// mode `0o644` on Unix.
///
/// # Errors
///
/// - [`ConfigError::NoConfigPath`] when `path` is empty.
/// - [`ConfigError::Serialise`] when the configuration cannot be emitted.
/// - [`ConfigError::Write`] when the file cannot be written.
pub fn write_config(path: &Path, config: &Config) -> ConfigResult<()> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::NoConfigPath);
    }
    debug!(path = %path.display(), "writing configuration file");
    let text = to_yaml(config)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(NEW_FILE_MODE);
    }
    options
        .open(path)
        .and_then(|mut file| {
            file.write_all(text.as_bytes())?;
            file.flush()
        })
        .map_err(|source| write_error(path, source))?;
    info!(path = %path.display(), "wrote configuration file");
    Ok(())
}

/// Create an empty configuration file at `path` unless one exists.
///
/// Missing parent directories are created (mode `0o755` on Unix). Returns
/// whether the file was created.
///
/// # Errors
///
/// - [`ConfigError::NoConfigPath`] when `path` is empty.
/// - [`ConfigError::Write`] when a directory or the file cannot be created.
pub fn create_if_missing(path: &Path) -> ConfigResult<bool> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::NoConfigPath);
    }
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(NEW_DIR_MODE);
        }
        builder
            .create(parent)
            .map_err(|source| write_error(parent, source))?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(NEW_FILE_MODE);
    }
    match options.open(path) {
        Ok(_) => {
            info!(path = %path.display(), "created configuration file");
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(source) => Err(write_error(path, source)),
    }
}

fn write_error(path: &Path, source: io::Error) -> ConfigError {
    ConfigError::Write {
        path: path.to_path_buf(),
        source,
    }
}
