//! Pure configuration edits.
//!
//! Every edit converts the typed configuration into a tree, applies a
//! dotted-path change and converts back with full validation. The input is
//! only replaced when the whole edit succeeds.

use tracing::info;

use crate::model::{ClusterEntry, Config};
use crate::schema::{ensure_unique_cluster_names, materialise, materialise_cluster};
use crate::tree::{Tree, TreeKind, path, to_tree};
use crate::{ConfigError, ConfigResult};

/// Key holding a cluster's name inside its entry.
pub const NAME_KEY: &str = "name";

const CLUSTERS_KEY: &str = "clusters";

/// Value of the global `key`; an empty key returns the whole configuration.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidKey`] for keys below `clusters`; use
/// [`get_cluster`] to read a single cluster.
///
/// # Examples
///
/// ```
/// use ochami_config::{Config, mutate::ops};
///
/// let level = ops::get(&Config::builtin_defaults(), "log.level")?;
/// assert_eq!(level, Some(serde_json::json!("warning")));
/// # Ok::<_, ochami_config::ConfigError>(())
/// ```
pub fn get(config: &Config, key: &str) -> ConfigResult<Option<Tree>> {
    if key.starts_with(CLUSTERS_KEY) && key.len() > CLUSTERS_KEY.len() {
        return Err(ConfigError::invalid_key(
            key,
            "individual clusters cannot be read with the global getter",
        ));
    }
    let tree = to_tree(config)?;
    Ok(path::get(&tree, key).cloned())
}

/// Set the global `key` to `value`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidKey`] for unusable keys and any
/// materialisation error the edited configuration raises.
pub fn set(config: &mut Config, key: &str, value: Tree) -> ConfigResult<()> {
    let mut tree = to_tree(config)?;
    path::set(&mut tree, key, value)?;
    *config = materialise(tree)?;
    Ok(())
}

/// Remove the global `key`. Removing an absent key is not an error.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidKey`] for malformed keys.
pub fn unset(config: &mut Config, key: &str) -> ConfigResult<()> {
    let mut tree = to_tree(config)?;
    path::delete(&mut tree, key)?;
    *config = materialise(tree)?;
    Ok(())
}

/// Value of `key` inside the entry of `cluster`; an empty key returns the
/// whole entry.
///
/// # Errors
///
/// Returns [`ConfigError::ClusterNotFound`] when the cluster does not exist.
pub fn get_cluster(config: &Config, cluster: &str, key: &str) -> ConfigResult<Option<Tree>> {
    let tree = to_tree(config.cluster(cluster)?)?;
    Ok(path::get(&tree, key).cloned())
}

/// Set `key` of an existing or new cluster; see [`upsert_cluster`].
///
/// # Errors
///
/// As [`upsert_cluster`].
pub fn set_cluster(config: &mut Config, cluster: &str, key: &str, value: Tree) -> ConfigResult<()> {
    upsert_cluster(config, cluster, key, value, false)
}

/// Set `key` of `cluster`, adding the cluster if it does not exist.
///
/// Setting [`NAME_KEY`] renames the cluster. With `make_default`,
/// `default-cluster` is pointed at the cluster (under its new name when
/// renaming). Renaming the current default cluster updates
/// `default-cluster` even without `make_default`.
///
/// # Errors
///
/// - [`ConfigError::CannotRenameToExisting`] when the new name is taken.
/// - [`ConfigError::InvalidValue`] when a new name is not a string.
/// - [`ConfigError::InvalidKey`] and materialisation errors for bad edits.
///
/// # Examples
///
/// ```
/// use ochami_config::{Config, mutate::ops};
/// use serde_json::json;
///
/// let mut config = Config::default();
/// ops::upsert_cluster(&mut config, "foo", "cluster.uri", json!("https://foo.test"), true)?;
/// ops::upsert_cluster(&mut config, "foo", "name", json!("bar"), false)?;
/// assert_eq!(config.default_cluster.as_deref(), Some("bar"));
/// assert_eq!(config.clusters[0].name, "bar");
/// # Ok::<_, ochami_config::ConfigError>(())
/// ```
pub fn upsert_cluster(
    config: &mut Config,
    cluster: &str,
    key: &str,
    value: Tree,
    make_default: bool,
) -> ConfigResult<()> {
    let renaming = key == NAME_KEY;
    if renaming {
        let Tree::String(new_name) = &value else {
            return Err(ConfigError::InvalidValue {
                key: NAME_KEY.to_owned(),
                value: format!("a {}", TreeKind::of(&value)),
                expected: "a string".to_owned(),
            });
        };
        if config.cluster_index(new_name).is_some() {
            return Err(ConfigError::CannotRenameToExisting {
                name: new_name.clone(),
            });
        }
    }

    let mut updated = config.clone();
    let entry = match updated.cluster_index(cluster) {
        Some(index) => updated.clusters.get_mut(index),
        None => {
            info!(cluster, "adding cluster");
            updated.clusters.push(ClusterEntry::new(cluster));
            updated.clusters.last_mut()
        }
    }
    .ok_or_else(|| ConfigError::cluster_not_found(cluster))?;

    let mut tree = to_tree(&*entry)?;
    path::set(&mut tree, key, value)?;
    *entry = materialise_cluster(tree)?;
    let name = entry.name.clone();

    if make_default || (renaming && updated.is_default_cluster(cluster)) {
        info!(cluster = %name, "setting default cluster");
        updated.default_cluster = Some(name);
    }
    ensure_unique_cluster_names(&updated.clusters)?;
    *config = updated;
    Ok(())
}

/// Remove `key` from the entry of `cluster`.
///
/// # Errors
///
/// - [`ConfigError::CannotUnsetName`] when `key` is [`NAME_KEY`].
/// - [`ConfigError::ClusterNotFound`] when the cluster does not exist.
/// - [`ConfigError::InvalidKey`] for malformed keys.
pub fn unset_cluster(config: &mut Config, cluster: &str, key: &str) -> ConfigResult<()> {
    if key == NAME_KEY {
        return Err(ConfigError::CannotUnsetName);
    }
    let index = config
        .cluster_index(cluster)
        .ok_or_else(|| ConfigError::cluster_not_found(cluster))?;
    let entry = config
        .clusters
        .get_mut(index)
        .ok_or_else(|| ConfigError::cluster_not_found(cluster))?;
    let mut tree = to_tree(&*entry)?;
    path::delete(&mut tree, key)?;
    *entry = materialise_cluster(tree)?;
    Ok(())
}

/// Remove the entry of `cluster`, clearing `default-cluster` if it named it.
///
/// # Errors
///
/// Returns [`ConfigError::ClusterNotFound`] when the cluster does not exist.
pub fn delete_cluster(config: &mut Config, cluster: &str) -> ConfigResult<()> {
    let index = config
        .cluster_index(cluster)
        .ok_or_else(|| ConfigError::cluster_not_found(cluster))?;
    config.clusters.remove(index);
    info!(cluster, "deleted cluster");
    if config.is_default_cluster(cluster) {
        config.default_cluster = None;
        info!(cluster, "cleared default cluster");
    }
    Ok(())
}

/// Point `default-cluster` at an existing cluster.
///
/// # Errors
///
/// Returns [`ConfigError::ClusterNotFound`] when the cluster does not exist.
pub fn set_default_cluster(config: &mut Config, cluster: &str) -> ConfigResult<()> {
    config.cluster(cluster)?;
    config.default_cluster = Some(cluster.to_owned());
    info!(cluster, "setting default cluster");
    Ok(())
}
