//! Search paths for the system and user configuration files.

use std::env;
use std::path::PathBuf;

use dirs::home_dir;

/// Location of the system-wide configuration file.
pub const SYSTEM_CONFIG_FILE: &str = "/etc/ochami/config.yaml";

const APP_DIR: &str = "ochami";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Files consulted by the cascade, lowest precedence first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigPaths {
    /// System-wide configuration file.
    pub system: PathBuf,
    /// Per-user configuration file; `None` when no home directory is known.
    pub user: Option<PathBuf>,
}

impl ConfigPaths {
    /// Paths with explicit locations, mainly for tests and embedding.
    #[must_use]
    pub fn new(system: impl Into<PathBuf>, user: Option<PathBuf>) -> Self {
        Self {
            system: system.into(),
            user,
        }
    }

    /// The standard locations for the current user.
    ///
    /// The user file lives in `$XDG_CONFIG_HOME/ochami/config.yaml`, falling
    /// back to `~/.config/ochami/config.yaml`.
    #[must_use]
    pub fn discover() -> Self {
        Self::new(SYSTEM_CONFIG_FILE, user_config_file())
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

/// Per-user configuration file for the current environment.
///
/// A relative or empty `XDG_CONFIG_HOME` is ignored.
#[must_use]
pub fn user_config_file() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|dir| dir.is_absolute())
        .or_else(|| home_dir().map(|home| home.join(".config")))?;
    Some(base.join(APP_DIR).join(CONFIG_FILE_NAME))
}
