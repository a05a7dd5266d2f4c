//! Layered resolution of the client configuration.
//!
//! Layers are applied lowest precedence first: built-in defaults, the
//! system file, then the user file. Absent files are skipped; any other
//! problem with a file aborts resolution and names the file. An explicitly
//! supplied file replaces the cascade entirely.

mod paths;
mod resolved;

use std::iter;
use std::path::Path;

use tracing::{debug, info};

pub use paths::{ConfigPaths, SYSTEM_CONFIG_FILE, user_config_file};
pub use resolved::ResolvedConfig;

use crate::file::{SourceOrigin, SourceRecord, load_source};
use crate::merge::{CLUSTER_MERGE_KEY, merge};
use crate::model::Config;
use crate::result_ext::FileContextExt;
use crate::schema::materialise;
use crate::tree::{Tree, TreeMap};
use crate::{ConfigError, ConfigResult};

/// Loads, merges and validates the configuration layers.
///
/// # Examples
///
/// ```no_run
/// use ochami_config::{CascadeResolver, ConfigPaths};
///
/// let resolved = CascadeResolver::new(ConfigPaths::discover()).resolve()?;
/// println!("log level: {:?}", resolved.config().log.level);
/// # Ok::<_, ochami_config::ConfigError>(())
/// ```
#[derive(Clone, Debug)]
pub struct CascadeResolver {
    paths: ConfigPaths,
    defaults: Config,
}

impl CascadeResolver {
    /// Resolver over `paths` using [`Config::builtin_defaults`].
    #[must_use]
    pub fn new(paths: ConfigPaths) -> Self {
        Self {
            paths,
            defaults: Config::builtin_defaults(),
        }
    }

    /// Replace the lowest-precedence layer.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Config) -> Self {
        self.defaults = defaults;
        self
    }

    /// Files consulted by this resolver.
    #[must_use]
    pub const fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// Load every available layer, defaults first.
    ///
    /// # Errors
    ///
    /// Returns the first failure other than a missing file, with the file
    /// attached.
    pub fn load_sources(&self) -> ConfigResult<Vec<SourceRecord>> {
        let mut records = vec![SourceRecord::from_defaults(self.defaults.clone())?];
        let files = iter::once((SourceOrigin::SystemFile, self.paths.system.as_path())).chain(
            self.paths
                .user
                .as_deref()
                .map(|path| (SourceOrigin::UserFile, path)),
        );
        for (origin, path) in files {
            match load_source(path, origin)? {
                Some(record) => records.push(record),
                None => debug!(path = %path.display(), %origin, "skipping configuration layer"),
            }
        }
        Ok(records)
    }

    /// Merge layers given lowest precedence first into one tree.
    ///
    /// Each layer becomes the destination for everything below it, so a
    /// higher layer keeps its values and lower layers only fill gaps.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MergeTypeMismatch`], attached to the higher
    /// layer's file, when two layers disagree on the shape of a key.
    pub fn merge_sources(records: Vec<SourceRecord>) -> ConfigResult<Tree> {
        let mut merged = Tree::Object(TreeMap::new());
        for record in records {
            debug!(origin = %record.origin, path = ?record.path, "merging configuration layer");
            let mut higher = record.tree;
            let outcome = merge(merged, &mut higher, CLUSTER_MERGE_KEY);
            match record.path.as_deref() {
                Some(path) => outcome.in_file(path)?,
                None => outcome?,
            }
            merged = higher;
        }
        Ok(merged)
    }

    /// Load, merge and validate the cascade.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::load_sources`], [`Self::merge_sources`] or
    /// [`materialise`].
    pub fn resolve(&self) -> ConfigResult<ResolvedConfig> {
        let records = self.load_sources()?;
        let origins = records.iter().map(|record| record.origin).collect();
        let files = records
            .iter()
            .filter_map(|record| record.path.clone())
            .collect();
        let tree = Self::merge_sources(records)?;
        let config = materialise(tree)?;
        info!(
            clusters = config.clusters.len(),
            default_cluster = ?config.default_cluster,
            "configuration resolved"
        );
        ResolvedConfig::new(config, origins, files)
    }

    /// Use the file at `path` alone, bypassing defaults and the cascade.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoConfigPath`] when `path` is empty.
    /// - [`ConfigError::SourceNotFound`] when the file does not exist.
    /// - Any error of [`load_source`].
    pub fn resolve_explicit(path: &Path) -> ConfigResult<ResolvedConfig> {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::NoConfigPath);
        }
        let record = load_source(path, SourceOrigin::ExplicitFile)?.ok_or_else(|| {
            ConfigError::SourceNotFound {
                path: path.to_path_buf(),
            }
        })?;
        info!(path = %path.display(), "using explicit configuration file");
        ResolvedConfig::new(record.typed, vec![record.origin], vec![path.to_path_buf()])
    }
}

/// Resolve the configuration for one invocation.
///
/// An `explicit` file is used on its own; otherwise the cascade over `paths`
/// is resolved.
///
/// # Errors
///
/// As [`CascadeResolver::resolve_explicit`] or [`CascadeResolver::resolve`].
pub fn load_config(explicit: Option<&Path>, paths: ConfigPaths) -> ConfigResult<ResolvedConfig> {
    match explicit {
        Some(path) => CascadeResolver::resolve_explicit(path),
        None => CascadeResolver::new(paths).resolve(),
    }
}
