//! Dotted key paths over configuration trees.
//!
//! Keys address nested maps with `.` as the delimiter (`log.level`,
//! `cluster.bss.uri`). Lists are leaves: a path never indexes into a list.

use super::{Tree, TreeKind, TreeMap};
use crate::{ConfigError, ConfigResult};

/// Separator between key segments.
pub const DELIMITER: char = '.';

fn segments(key: &str) -> ConfigResult<Vec<&str>> {
    if key.is_empty() {
        return Err(ConfigError::invalid_key(key, "key is empty"));
    }
    let parts: Vec<&str> = key.split(DELIMITER).collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(ConfigError::invalid_key(key, "key contains an empty segment"));
    }
    Ok(parts)
}

/// Look up `key` in `tree`. An empty key returns the whole tree.
///
/// # Examples
///
/// ```
/// use ochami_config::tree::path;
/// use serde_json::json;
///
/// let tree = json!({"log": {"level": "info"}});
/// assert_eq!(path::get(&tree, "log.level"), Some(&json!("info")));
/// assert_eq!(path::get(&tree, "log.format"), None);
/// ```
#[must_use]
pub fn get<'a>(tree: &'a Tree, key: &str) -> Option<&'a Tree> {
    if key.is_empty() {
        return Some(tree);
    }
    key.split(DELIMITER)
        .try_fold(tree, |node, segment| node.as_object()?.get(segment))
}

/// Set `key` to `value`, creating intermediate maps as needed.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidKey`] when the key is empty, contains an
/// empty segment, or would have to descend through a value that is not a
/// map.
pub fn set(tree: &mut Tree, key: &str, value: Tree) -> ConfigResult<()> {
    let parts = segments(key)?;
    let Some((last, parents)) = parts.split_last() else {
        return Err(ConfigError::invalid_key(key, "key is empty"));
    };
    if tree.is_null() {
        *tree = Tree::Object(TreeMap::new());
    }

    let mut walked = Vec::with_capacity(parents.len());
    let mut current = tree;
    for segment in parents {
        let kind = TreeKind::of(current);
        let Some(map) = current.as_object_mut() else {
            return Err(not_a_map(key, &walked, kind));
        };
        walked.push(*segment);
        let child = map
            .entry((*segment).to_owned())
            .or_insert_with(|| Tree::Object(TreeMap::new()));
        if !child.is_object() {
            return Err(not_a_map(key, &walked, TreeKind::of(child)));
        }
        current = child;
    }

    let kind = TreeKind::of(current);
    let Some(map) = current.as_object_mut() else {
        return Err(not_a_map(key, &walked, kind));
    };
    map.insert((*last).to_owned(), value);
    Ok(())
}

/// Remove `key` from `tree`, pruning maps left empty by the removal.
///
/// Returns whether anything was removed; deleting an absent key is a no-op.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidKey`] when the key is empty or contains an
/// empty segment.
pub fn delete(tree: &mut Tree, key: &str) -> ConfigResult<bool> {
    let parts = segments(key)?;
    let Some(map) = tree.as_object_mut() else {
        return Ok(false);
    };
    Ok(delete_in(map, &parts))
}

fn delete_in(map: &mut TreeMap, parts: &[&str]) -> bool {
    match parts {
        [] => false,
        [last] => map.remove(*last).is_some(),
        [first, rest @ ..] => {
            let Some(Tree::Object(child)) = map.get_mut(*first) else {
                return false;
            };
            let removed = delete_in(child, rest);
            if removed && child.is_empty() {
                map.remove(*first);
            }
            removed
        }
    }
}

fn not_a_map(key: &str, walked: &[&str], kind: TreeKind) -> ConfigError {
    let at = if walked.is_empty() {
        "the root".to_owned()
    } else {
        format!("'{}'", walked.join("."))
    };
    ConfigError::invalid_key(key, format!("{at} holds a {kind} and cannot contain keys"))
}
