//! The configuration handle produced by the cascade.

use std::path::{Path, PathBuf};

use crate::endpoint::ServiceName;
use crate::file::SourceOrigin;
use crate::model::{ClusterEntry, Config};
use crate::mutate::ops;
use crate::tree::{Tree, to_tree};
use crate::{ConfigError, ConfigResult};

/// Authoritative configuration for one invocation of the client.
///
/// Holds the validated configuration, its tree form and the layers that
/// contributed to it. The handle is passed explicitly to whatever needs it;
/// nothing is stored globally.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    config: Config,
    tree: Tree,
    origins: Vec<SourceOrigin>,
    files: Vec<PathBuf>,
}

impl ResolvedConfig {
    pub(super) fn new(
        config: Config,
        origins: Vec<SourceOrigin>,
        files: Vec<PathBuf>,
    ) -> ConfigResult<Self> {
        Ok(Self {
            tree: to_tree(&config)?,
            config,
            origins,
            files,
        })
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The configuration as a tree, with defaults such as `enable-auth`
    /// filled in.
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Layers that contributed, lowest precedence first.
    #[must_use]
    pub fn origins(&self) -> &[SourceOrigin] {
        &self.origins
    }

    /// Files that contributed, lowest precedence first.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    /// Consume the handle, returning the configuration.
    #[must_use]
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Value at dotted `key`; see [`ops::get`].
    ///
    /// # Errors
    ///
    /// As [`ops::get`].
    pub fn get(&self, key: &str) -> ConfigResult<Option<Tree>> {
        ops::get(&self.config, key)
    }

    /// Look up a cluster by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ClusterNotFound`] when no entry has that name.
    pub fn cluster(&self, name: &str) -> ConfigResult<&ClusterEntry> {
        self.config.cluster(name)
    }

    /// The cluster named `explicit`, or else the `default-cluster`.
    ///
    /// An empty `explicit` name counts as absent.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoClusterSelected`] when neither name is available.
    /// - [`ConfigError::ClusterNotFound`] when the selected name is unknown.
    pub fn select_cluster(&self, explicit: Option<&str>) -> ConfigResult<&ClusterEntry> {
        let name = explicit
            .filter(|name| !name.is_empty())
            .or(self.config.default_cluster.as_deref())
            .ok_or(ConfigError::NoClusterSelected)?;
        self.cluster(name)
    }

    /// Base URI of `service` on the selected cluster.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::select_cluster`] or
    /// [`crate::endpoint::resolve_service_uri`].
    pub fn service_uri(&self, cluster: Option<&str>, service: ServiceName) -> ConfigResult<String> {
        let entry = self.select_cluster(cluster)?;
        crate::endpoint::resolve_service_uri(&entry.cluster, service)
    }
}
