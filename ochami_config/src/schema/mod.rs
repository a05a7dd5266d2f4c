//! Strict conversion from configuration trees into typed values.
//!
//! Trees are accepted from any source without assumptions about their
//! shape. [`materialise`] is the single gate through which a tree becomes a
//! [`Config`]: it rejects keys the schema does not know, normalises values
//! whose defaults depend on presence, converts into the typed model and
//! validates cross-field constraints.

mod normalise;

use std::collections::HashSet;

pub use normalise::{normalise_cluster, normalise_config};

use serde::Deserialize;

use crate::model::{ClusterEntry, Config, EXPECTED_DURATION, Timeout};
use crate::tree::Tree;
use crate::{ConfigError, ConfigResult, ConfigResultExt};

/// Shape of the keys a configuration tree may contain.
#[derive(Debug)]
pub enum SchemaNode {
    /// A scalar value of the given kind.
    Leaf(LeafKind),
    /// A map with a fixed set of keys.
    Map(&'static [(&'static str, SchemaNode)]),
    /// A list whose elements share one shape.
    List(&'static SchemaNode),
}

impl SchemaNode {
    /// Schema of `key` when `self` is a map that declares it.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(fields) => fields
                .iter()
                .find_map(|(name, node)| (*name == key).then_some(node)),
            Self::Leaf(_) | Self::List(_) => None,
        }
    }
}

/// Kind of scalar a leaf accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LeafKind {
    /// `true` or `false`.
    Bool,
    /// Any string.
    String,
    /// Duration text or a whole number of seconds.
    Duration,
}

impl LeafKind {
    /// Description of the accepted values used in error messages.
    #[must_use]
    pub const fn expected(self) -> &'static str {
        match self {
            Self::Bool => "true or false",
            Self::String => "a string",
            Self::Duration => EXPECTED_DURATION,
        }
    }

    /// Returns `true` when `value` is acceptable for this kind.
    #[must_use]
    pub fn accepts(self, value: &Tree) -> bool {
        match self {
            Self::Bool => value.is_boolean(),
            Self::String => value.is_string(),
            Self::Duration => Timeout::deserialize(value).is_ok(),
        }
    }
}

const STRING: SchemaNode = SchemaNode::Leaf(LeafKind::String);

const LOG_SCHEMA: SchemaNode = SchemaNode::Map(&[("format", STRING), ("level", STRING)]);

const URI_ONLY_SCHEMA: SchemaNode = SchemaNode::Map(&[("uri", STRING)]);

const CLUSTER_SETTINGS_SCHEMA: SchemaNode = SchemaNode::Map(&[
    ("uri", STRING),
    ("enable-auth", SchemaNode::Leaf(LeafKind::Bool)),
    (
        "boot-service",
        SchemaNode::Map(&[("uri", STRING), ("api-version", STRING)]),
    ),
    ("bss", URI_ONLY_SCHEMA),
    ("cloud-init", URI_ONLY_SCHEMA),
    ("pcs", URI_ONLY_SCHEMA),
    ("smd", URI_ONLY_SCHEMA),
]);

/// Keys of a single entry of the `clusters` list.
pub const CLUSTER_SCHEMA: SchemaNode =
    SchemaNode::Map(&[("name", STRING), ("cluster", CLUSTER_SETTINGS_SCHEMA)]);

/// Keys of a complete configuration file.
pub const CONFIG_SCHEMA: SchemaNode = SchemaNode::Map(&[
    ("log", LOG_SCHEMA),
    ("timeout", SchemaNode::Leaf(LeafKind::Duration)),
    ("default-cluster", STRING),
    ("clusters", SchemaNode::List(&CLUSTER_SCHEMA)),
]);

/// Reject any key in `tree` that `schema` does not declare.
///
/// Values whose kind disagrees with the schema are left to
/// [`check_value_kinds`].
///
/// # Errors
///
/// Returns [`ConfigError::UnknownKey`] naming the first unknown key and its
/// full location, for example `clusters[0].cluster.bogus`.
pub fn check_known_keys(tree: &Tree, schema: &SchemaNode) -> ConfigResult<()> {
    check_at(tree, schema, "")
}

fn check_at(tree: &Tree, schema: &SchemaNode, location: &str) -> ConfigResult<()> {
    match (schema, tree) {
        (SchemaNode::Map(_), Tree::Object(map)) => {
            for (key, child) in map {
                let here = join_location(location, key);
                let Some(node) = schema.child(key) else {
                    return Err(ConfigError::UnknownKey {
                        key: key.clone(),
                        location: here,
                    });
                };
                check_at(child, node, &here)?;
            }
            Ok(())
        }
        (SchemaNode::List(item), Tree::Array(items)) => {
            for (index, child) in items.iter().enumerate() {
                check_at(child, item, &format!("{location}[{index}]"))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

pub(crate) fn join_location(location: &str, key: &str) -> String {
    if location.is_empty() {
        key.to_owned()
    } else {
        format!("{location}.{key}")
    }
}

/// Reject values whose kind disagrees with `schema`.
///
/// Nulls are skipped; keys the schema does not declare are left to
/// [`check_known_keys`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming the full location of the
/// first offending value, for example `clusters[0].cluster.enable-auth`.
pub fn check_value_kinds(tree: &Tree, schema: &SchemaNode) -> ConfigResult<()> {
    kinds_at(tree, schema, "")
}

fn kinds_at(tree: &Tree, schema: &SchemaNode, location: &str) -> ConfigResult<()> {
    match (schema, tree) {
        (_, Tree::Null) => Ok(()),
        (SchemaNode::Leaf(kind), value) if kind.accepts(value) => Ok(()),
        (SchemaNode::Leaf(kind), value) => Err(invalid_value(location, value, kind.expected())),
        (SchemaNode::Map(_), Tree::Object(map)) => {
            for (key, child) in map {
                if let Some(node) = schema.child(key) {
                    kinds_at(child, node, &join_location(location, key))?;
                }
            }
            Ok(())
        }
        (SchemaNode::List(item), Tree::Array(items)) => {
            for (index, child) in items.iter().enumerate() {
                kinds_at(child, item, &format!("{location}[{index}]"))?;
            }
            Ok(())
        }
        (SchemaNode::Map(_), value) => Err(invalid_value(location, value, "a map")),
        (SchemaNode::List(_), value) => Err(invalid_value(location, value, "a list")),
    }
}

fn invalid_value(location: &str, value: &Tree, expected: &str) -> ConfigError {
    let described = match value {
        Tree::String(text) => format!("'{text}'"),
        Tree::Array(_) => "a list".to_owned(),
        Tree::Object(_) => "a map".to_owned(),
        scalar => scalar.to_string(),
    };
    ConfigError::InvalidValue {
        key: if location.is_empty() { "<root>" } else { location }.to_owned(),
        value: described,
        expected: expected.to_owned(),
    }
}

/// Convert a configuration tree into a validated [`Config`].
///
/// # Errors
///
/// - [`ConfigError::UnknownKey`] for keys outside the schema.
/// - [`ConfigError::InvalidValue`] when a value has the wrong kind or
///   `enable-auth` is present but empty.
/// - [`ConfigError::InvalidConfig`] when a required key such as a cluster
///   `name` is missing.
/// - [`ConfigError::DuplicateClusterName`] when two clusters share a name.
///
/// # Examples
///
/// ```
/// use ochami_config::schema::materialise;
/// use serde_json::json;
///
/// let config = materialise(json!({
///     "clusters": [{"name": "foo", "cluster": {"uri": "https://foo.example.com"}}]
/// }))?;
/// assert!(config.clusters[0].cluster.enable_auth);
/// # Ok::<_, ochami_config::ConfigError>(())
/// ```
pub fn materialise(mut tree: Tree) -> ConfigResult<Config> {
    check_known_keys(&tree, &CONFIG_SCHEMA)?;
    normalise_config(&mut tree)?;
    check_value_kinds(&tree, &CONFIG_SCHEMA)?;
    let config: Config = serde_json::from_value(tree).into_config()?;
    ensure_unique_cluster_names(&config.clusters)?;
    Ok(config)
}

/// Convert a single cluster entry tree into a [`ClusterEntry`].
///
/// # Errors
///
/// As [`materialise`], minus the duplicate-name check.
pub fn materialise_cluster(mut tree: Tree) -> ConfigResult<ClusterEntry> {
    check_known_keys(&tree, &CLUSTER_SCHEMA)?;
    normalise_cluster(&mut tree)?;
    check_value_kinds(&tree, &CLUSTER_SCHEMA)?;
    serde_json::from_value(tree).into_config()
}

/// Ensure no two cluster entries share a name.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateClusterName`] for the first repeated name.
pub fn ensure_unique_cluster_names(clusters: &[ClusterEntry]) -> ConfigResult<()> {
    let mut seen = HashSet::with_capacity(clusters.len());
    let repeated = clusters
        .iter()
        .find(|entry| !seen.insert(entry.name.as_str()));
    match repeated {
        Some(entry) => Err(ConfigError::DuplicateClusterName {
            name: entry.name.clone(),
        }),
        None => Ok(()),
    }
}
