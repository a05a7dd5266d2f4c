//! Deep merge of configuration trees.
//!
//! `src` is merged into `dst` in place and the destination always wins a
//! conflict: maps merge recursively, lists form an identity-aware union and
//! scalars already present in `dst` are kept. Callers that want a layer to
//! take precedence make that layer the destination.

use crate::tree::{Tree, TreeKind, TreeMap};
use crate::{ConfigError, ConfigResult};

/// Identity key used to match cluster entries across layers.
pub const CLUSTER_MERGE_KEY: &str = "name";

/// Merge `src` into `dst`, keeping `dst`'s values on conflict.
///
/// When `dst` is not a map or list the call only checks that both sides are
/// scalars.
///
/// # Errors
///
/// Returns [`ConfigError::MergeTypeMismatch`] when the same key holds a map
/// on one side and a list or scalar on the other (or a list and a scalar).
/// `dst` may have been partially updated and must be discarded.
///
/// # Examples
///
/// ```
/// use ochami_config::merge::{CLUSTER_MERGE_KEY, merge};
/// use serde_json::json;
///
/// let lower = json!({"log": {"level": "warning", "format": "rfc3339"}});
/// let mut higher = json!({"log": {"level": "debug"}});
/// merge(lower, &mut higher, CLUSTER_MERGE_KEY)?;
/// assert_eq!(higher, json!({"log": {"level": "debug", "format": "rfc3339"}}));
/// # Ok::<_, ochami_config::ConfigError>(())
/// ```
pub fn merge(src: Tree, dst: &mut Tree, merge_key: &str) -> ConfigResult<()> {
    merge_at(src, dst, merge_key, "")
}

/// Merge the entries of `src` into `dst` with the rules of [`merge`].
///
/// # Errors
///
/// As [`merge`].
pub fn merge_maps(src: TreeMap, dst: &mut TreeMap, merge_key: &str) -> ConfigResult<()> {
    merge_maps_at(src, dst, merge_key, "")
}

/// Union `src` into `dst`.
///
/// Map elements whose `merge_key` value matches an element of `dst` are
/// deep-merged into it. Any other element is appended unless an equal
/// element is already present, so merging a list into itself changes
/// nothing.
///
/// # Errors
///
/// As [`merge`], for conflicts inside matched elements.
///
/// # Examples
///
/// ```
/// use ochami_config::merge::merge_lists;
/// use serde_json::json;
///
/// let src = vec![json!({"name": "a", "x": 1}), json!("tag")];
/// let mut dst = vec![json!({"name": "a", "y": 2}), json!("tag")];
/// merge_lists(src, &mut dst, "name")?;
/// assert_eq!(dst, vec![json!({"name": "a", "y": 2, "x": 1}), json!("tag")]);
/// # Ok::<_, ochami_config::ConfigError>(())
/// ```
pub fn merge_lists(src: Vec<Tree>, dst: &mut Vec<Tree>, merge_key: &str) -> ConfigResult<()> {
    merge_lists_at(src, dst, merge_key, "")
}

fn merge_at(src: Tree, dst: &mut Tree, merge_key: &str, path: &str) -> ConfigResult<()> {
    match (src, dst) {
        (Tree::Object(src_map), Tree::Object(dst_map)) => {
            merge_maps_at(src_map, dst_map, merge_key, path)
        }
        (Tree::Array(src_items), Tree::Array(dst_items)) => {
            merge_lists_at(src_items, dst_items, merge_key, path)
        }
        (src_value, dst_value) => {
            let src_kind = TreeKind::of(&src_value);
            let dst_kind = TreeKind::of(dst_value);
            if src_kind.is_scalar() && dst_kind.is_scalar() {
                return Ok(());
            }
            Err(ConfigError::MergeTypeMismatch {
                key: if path.is_empty() { "<root>" } else { path }.to_owned(),
                src: src_kind,
                dst: dst_kind,
            })
        }
    }
}

fn merge_maps_at(src: TreeMap, dst: &mut TreeMap, merge_key: &str, path: &str) -> ConfigResult<()> {
    for (key, value) in src {
        let child_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };
        match dst.get_mut(&key) {
            Some(existing) => merge_at(value, existing, merge_key, &child_path)?,
            None => {
                dst.insert(key, value);
            }
        }
    }
    Ok(())
}

fn merge_lists_at(
    src: Vec<Tree>,
    dst: &mut Vec<Tree>,
    merge_key: &str,
    path: &str,
) -> ConfigResult<()> {
    for item in src {
        if let Some(id) = identity(&item, merge_key).cloned() {
            let matched = dst
                .iter_mut()
                .find(|candidate| identity(candidate, merge_key) == Some(&id));
            if let Some(existing) = matched {
                let element_path = format!("{path}[{}]", display_identity(&id));
                merge_at(item, existing, merge_key, &element_path)?;
                continue;
            }
        }
        if !dst.contains(&item) {
            dst.push(item);
        }
    }
    Ok(())
}

fn identity<'a>(item: &'a Tree, merge_key: &str) -> Option<&'a Tree> {
    item.as_object()?.get(merge_key)
}

fn display_identity(id: &Tree) -> String {
    id.as_str().map_or_else(|| id.to_string(), str::to_owned)
}
