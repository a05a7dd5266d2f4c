//! Presence-keyed normalisation applied before typed conversion.
//!
//! A bare `key:` means "unset", so nulls are pruned. `enable-auth` is the
//! exception: an explicit empty value is refused, and a cluster that omits
//! it entirely is given `enable-auth: true`. Only presence decides; an
//! explicit `false` is kept.

use super::join_location;
use crate::tree::{Tree, TreeMap, prune_nulls};
use crate::{ConfigError, ConfigResult};

const ENABLE_AUTH: &str = "enable-auth";

/// Normalise a complete configuration tree in place.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] when a cluster's `enable-auth` is
/// present but null or empty.
pub fn normalise_config(tree: &mut Tree) -> ConfigResult<()> {
    if let Some(Tree::Array(entries)) = tree.get_mut("clusters") {
        for (index, entry) in entries.iter_mut().enumerate() {
            normalise_entry(entry, &format!("clusters[{index}]"))?;
        }
    }
    prune_nulls(tree);
    Ok(())
}

/// Normalise a single cluster entry tree (`{name, cluster}`) in place.
///
/// # Errors
///
/// As [`normalise_config`].
pub fn normalise_cluster(entry: &mut Tree) -> ConfigResult<()> {
    normalise_entry(entry, "")
}

fn normalise_entry(entry: &mut Tree, location: &str) -> ConfigResult<()> {
    reject_empty_enable_auth(entry, location)?;
    prune_nulls(entry);
    if let Tree::Object(fields) = entry {
        let cluster = fields
            .entry("cluster")
            .or_insert_with(|| Tree::Object(TreeMap::new()));
        if let Tree::Object(settings) = cluster {
            settings.entry(ENABLE_AUTH).or_insert(Tree::Bool(true));
        }
    }
    Ok(())
}

fn reject_empty_enable_auth(entry: &Tree, location: &str) -> ConfigResult<()> {
    let settings = entry.get("cluster");
    let Some(value) = settings.and_then(|cluster| cluster.get(ENABLE_AUTH)) else {
        return Ok(());
    };
    let description = match value {
        Tree::Null => "null",
        Tree::String(text) if text.trim().is_empty() => "an empty string",
        _ => return Ok(()),
    };
    Err(ConfigError::InvalidValue {
        key: join_location(&join_location(location, "cluster"), ENABLE_AUTH),
        value: description.to_owned(),
        expected: "true or false".to_owned(),
    })
}
