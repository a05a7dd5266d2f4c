//! Untyped configuration trees.
//!
//! Every configuration source is represented as a [`Tree`] before and after
//! merging. Trees are plain [`serde_json::Value`] blobs: scalars (null, bool,
//! number, string), ordered lists and string-keyed maps. Keeping sources
//! untyped lets the merge engine combine partial files without knowing the
//! full schema; strict conversion into typed structs happens later in
//! [`crate::schema::materialise`].

pub mod path;

use std::fmt;

use serde::Serialize;

use crate::result_ext::SerialiseExt;
use crate::{ConfigError, ConfigResult, ConfigResultExt};

/// Generic recursive configuration value.
pub type Tree = serde_json::Value;

/// String-keyed map node of a [`Tree`].
pub type TreeMap = serde_json::Map<String, Tree>;

/// Structural classification of a [`Tree`] node used in diagnostics.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TreeKind {
    /// Explicit null (`key:` with no value).
    Null,
    /// Boolean scalar.
    Bool,
    /// Numeric scalar.
    Number,
    /// String scalar.
    String,
    /// Ordered list.
    List,
    /// String-keyed map.
    Map,
}

impl TreeKind {
    /// Classify `value`.
    #[must_use]
    pub const fn of(value: &Tree) -> Self {
        match value {
            Tree::Null => Self::Null,
            Tree::Bool(_) => Self::Bool,
            Tree::Number(_) => Self::Number,
            Tree::String(_) => Self::String,
            Tree::Array(_) => Self::List,
            Tree::Object(_) => Self::Map,
        }
    }

    /// Returns `true` for every kind that is neither a list nor a map.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        !matches!(self, Self::List | Self::Map)
    }

    /// Human-readable name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a tree from a typed value using its serde field names.
///
/// # Errors
///
/// Returns [`ConfigError::Serialise`] when the value cannot be represented
/// as a tree (for example a map with non-string keys).
///
/// # Examples
///
/// ```
/// use ochami_config::{Config, tree::to_tree};
///
/// let tree = to_tree(&Config::builtin_defaults())?;
/// assert_eq!(tree["log"]["level"], "warning");
/// # Ok::<_, ochami_config::ConfigError>(())
/// ```
pub fn to_tree<T: Serialize + ?Sized>(value: &T) -> ConfigResult<Tree> {
    serde_json::to_value(value).into_serialise()
}

/// Parse YAML text into a tree whose root is a map.
///
/// Empty and comment-only documents produce an empty map so that a freshly
/// created configuration file behaves like one with no settings.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when the text is not valid YAML or the
/// document root is not a map.
pub fn parse_yaml(text: &str) -> ConfigResult<Tree> {
    if is_blank_document(text) {
        return Ok(Tree::Object(TreeMap::new()));
    }
    let tree: Tree = serde_yaml::from_str(text).into_config()?;
    match tree {
        Tree::Object(_) => Ok(tree),
        Tree::Null => Ok(Tree::Object(TreeMap::new())),
        other => Err(ConfigError::Parse {
            line: None,
            column: None,
            message: format!(
                "expected a map at the document root, found a {}",
                TreeKind::of(&other)
            ),
        }),
    }
}

/// Serialise a value as YAML text.
///
/// # Errors
///
/// Returns [`ConfigError::Serialise`] if the YAML emitter rejects the value.
pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> ConfigResult<String> {
    serde_yaml::to_string(value).into_serialise()
}

/// Remove null-valued map entries, recursing through maps and lists.
///
/// A bare `key:` in a file means "not set"; pruning keeps such keys from
/// shadowing values supplied by other layers.
pub fn prune_nulls(tree: &mut Tree) {
    match tree {
        Tree::Object(map) => {
            map.retain(|_, value| !value.is_null());
            map.values_mut().for_each(prune_nulls);
        }
        Tree::Array(items) => items.iter_mut().for_each(prune_nulls),
        _ => {}
    }
}

fn is_blank_document(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}
