//! Temporary directory laid out with system and user configuration files.
//!
//! # Examples
//!
//! ```
//! use test_helpers::layers::ConfigLayers;
//!
//! let layers = ConfigLayers::new()?;
//! layers.write_system("log:\n  level: info\n")?;
//! assert!(layers.system_path().is_file());
//! assert!(!layers.user_path().exists());
//! # Ok::<_, anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Owns a temporary root holding `etc/ochami/config.yaml` and
/// `home/.config/ochami/config.yaml`. Files are only created when written.
#[derive(Debug)]
pub struct ConfigLayers {
    root: TempDir,
    system: PathBuf,
    user: PathBuf,
}

impl ConfigLayers {
    /// Create an empty layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let root = TempDir::new().context("create config root")?;
        let system = root.path().join("etc/ochami/config.yaml");
        let user = root.path().join("home/.config/ochami/config.yaml");
        Ok(Self { root, system, user })
    }

    /// Root of the layout.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Home directory inside the layout.
    #[must_use]
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// Location of the system file.
    #[must_use]
    pub fn system_path(&self) -> &Path {
        &self.system
    }

    /// Location of the user file.
    #[must_use]
    pub fn user_path(&self) -> &Path {
        &self.user
    }

    /// Write the system file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parents cannot be written.
    pub fn write_system(&self, contents: &str) -> Result<()> {
        write_file(&self.system, contents)
    }

    /// Write the user file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parents cannot be written.
    pub fn write_user(&self, contents: &str) -> Result<()> {
        write_file(&self.user, contents)
    }

    /// Write `contents` to `relative` under the root and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parents cannot be written.
    pub fn write_file(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.root.path().join(relative);
        write_file(&path, contents)?;
        Ok(path)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}
