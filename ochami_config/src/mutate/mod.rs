//! Reading and editing single configuration files.
//!
//! [`ConfigFile`] wraps one file on disk. Each call reads the file fresh,
//! without consulting any other layer, applies one operation from [`ops`]
//! and, for edits, writes the result back.

pub mod ops;
mod render;

use std::path::{Path, PathBuf};

pub use render::{OutputFormat, render_value};

use crate::ConfigResult;
use crate::file::{create_if_missing, read_config, write_config};
use crate::model::Config;
use crate::result_ext::FileContextExt;
use crate::tree::Tree;

/// A configuration file edited in place.
///
/// # Examples
///
/// ```no_run
/// use ochami_config::{ConfigFile, OutputFormat, parse_scalar};
///
/// let file = ConfigFile::new("/home/user/.config/ochami/config.yaml");
/// file.create_if_missing()?;
/// file.upsert_cluster("demo", "cluster.uri", parse_scalar("https://demo.test"), true)?;
/// let uri = file.get_cluster_string("demo", "cluster.uri", OutputFormat::Yaml)?;
/// assert_eq!(uri, "https://demo.test");
/// # Ok::<_, ochami_config::ConfigError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Handle for the file at `path`. Nothing is read until an operation runs.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the file.
    ///
    /// # Errors
    ///
    /// As [`read_config`].
    pub fn read(&self) -> ConfigResult<Config> {
        read_config(&self.path)
    }

    /// Create the file, and its directories, when it does not exist.
    ///
    /// # Errors
    ///
    /// As [`create_if_missing`].
    pub fn create_if_missing(&self) -> ConfigResult<bool> {
        create_if_missing(&self.path)
    }

    fn inspect<T>(&self, query: impl FnOnce(&Config) -> ConfigResult<T>) -> ConfigResult<T> {
        let config = self.read()?;
        query(&config).in_file(&self.path)
    }

    fn modify(&self, edit: impl FnOnce(&mut Config) -> ConfigResult<()>) -> ConfigResult<()> {
        let mut config = self.read()?;
        edit(&mut config).in_file(&self.path)?;
        write_config(&self.path, &config)
    }

    /// Global value at `key`; see [`ops::get`].
    ///
    /// # Errors
    ///
    /// Read errors and those of [`ops::get`], with the file attached.
    pub fn get(&self, key: &str) -> ConfigResult<Option<Tree>> {
        self.inspect(|config| ops::get(config, key))
    }

    /// Global value at `key` rendered with [`render_value`].
    ///
    /// # Errors
    ///
    /// As [`Self::get`] and [`render_value`].
    pub fn get_string(&self, key: &str, format: OutputFormat) -> ConfigResult<String> {
        render_value(self.get(key)?.as_ref(), format)
    }

    /// Set the global `key`; see [`ops::set`].
    ///
    /// # Errors
    ///
    /// Read and write errors and those of [`ops::set`].
    pub fn set(&self, key: &str, value: Tree) -> ConfigResult<()> {
        self.modify(|config| ops::set(config, key, value))
    }

    /// Remove the global `key`; see [`ops::unset`].
    ///
    /// # Errors
    ///
    /// Read and write errors and those of [`ops::unset`].
    pub fn unset(&self, key: &str) -> ConfigResult<()> {
        self.modify(|config| ops::unset(config, key))
    }

    /// Value at `key` of `cluster`; see [`ops::get_cluster`].
    ///
    /// # Errors
    ///
    /// Read errors and those of [`ops::get_cluster`].
    pub fn get_cluster(&self, cluster: &str, key: &str) -> ConfigResult<Option<Tree>> {
        self.inspect(|config| ops::get_cluster(config, cluster, key))
    }

    /// Value at `key` of `cluster` rendered with [`render_value`].
    ///
    /// # Errors
    ///
    /// As [`Self::get_cluster`] and [`render_value`].
    pub fn get_cluster_string(
        &self,
        cluster: &str,
        key: &str,
        format: OutputFormat,
    ) -> ConfigResult<String> {
        render_value(self.get_cluster(cluster, key)?.as_ref(), format)
    }

    /// Set `key` of `cluster`, adding it if needed; see [`ops::set_cluster`].
    ///
    /// # Errors
    ///
    /// Read and write errors and those of [`ops::set_cluster`].
    pub fn set_cluster(&self, cluster: &str, key: &str, value: Tree) -> ConfigResult<()> {
        self.modify(|config| ops::set_cluster(config, cluster, key, value))
    }

    /// Set `key` of `cluster`, optionally making it the default; see
    /// [`ops::upsert_cluster`].
    ///
    /// # Errors
    ///
    /// Read and write errors and those of [`ops::upsert_cluster`].
    pub fn upsert_cluster(
        &self,
        cluster: &str,
        key: &str,
        value: Tree,
        make_default: bool,
    ) -> ConfigResult<()> {
        self.modify(|config| ops::upsert_cluster(config, cluster, key, value, make_default))
    }

    /// Remove `key` from `cluster`; see [`ops::unset_cluster`].
    ///
    /// # Errors
    ///
    /// Read and write errors and those of [`ops::unset_cluster`].
    pub fn unset_cluster(&self, cluster: &str, key: &str) -> ConfigResult<()> {
        self.modify(|config| ops::unset_cluster(config, cluster, key))
    }

    /// Remove `cluster`; see [`ops::delete_cluster`].
    ///
    /// # Errors
    ///
    /// Read and write errors and those of [`ops::delete_cluster`].
    pub fn delete_cluster(&self, cluster: &str) -> ConfigResult<()> {
        self.modify(|config| ops::delete_cluster(config, cluster))
    }

    /// Point `default-cluster` at `cluster`; see [`ops::set_default_cluster`].
    ///
    /// # Errors
    ///
    /// Read and write errors and those of [`ops::set_default_cluster`].
    pub fn set_default_cluster(&self, cluster: &str) -> ConfigResult<()> {
        self.modify(|config| ops::set_default_cluster(config, cluster))
    }
}

#[cfg(test)]
mod tests;
