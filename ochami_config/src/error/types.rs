//! Primary error enum for configuration loading, merging and mutation.

use std::path::PathBuf;

use thiserror::Error;

use crate::tree::TreeKind;

/// Errors that can occur while resolving or editing configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A configuration file that had to exist was not found.
    #[error("configuration file '{}' not found", .path.display())]
    SourceNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// An operation that targets a single file was given an empty path.
    #[error("no configuration file path passed")]
    NoConfigPath,

    /// Reading a configuration file failed for a reason other than absence.
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Writing a configuration file (or creating it) failed.
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        /// Path that could not be written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not well-formed.
    #[error("{}", parse_message(.line, .column, .message))]
    Parse {
        /// One-based line of the failure, when the parser reports one.
        line: Option<usize>,
        /// One-based column of the failure, when the parser reports one.
        column: Option<usize>,
        /// Parser diagnostic.
        message: String,
    },

    /// A key is present in the configuration but absent from the schema.
    #[error("unknown configuration key '{key}' at '{location}'")]
    UnknownKey {
        /// Offending key name.
        key: String,
        /// Full path of the key inside the configuration tree.
        location: String,
    },

    /// A key carries a value that cannot be accepted.
    #[error("invalid value for key '{key}': got {value} but expected {expected}")]
    InvalidValue {
        /// Key holding the value.
        key: String,
        /// Description of the received value.
        value: String,
        /// Description of what would have been accepted.
        expected: String,
    },

    /// The tree matches the schema's keys but not its value types.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Typed conversion diagnostic.
        message: String,
    },

    /// A dotted key path cannot be used for the requested operation.
    #[error("invalid key '{key}': {reason}")]
    InvalidKey {
        /// Key as supplied by the caller.
        key: String,
        /// Why the key was refused.
        reason: String,
    },

    /// Two layers hold structurally different values at the same key.
    #[error("type mismatch for key '{key}': {src} (src) vs {dst} (dst)")]
    MergeTypeMismatch {
        /// Dotted path of the conflicting key.
        key: String,
        /// Kind of the incoming value.
        src: TreeKind,
        /// Kind of the value already in the destination.
        dst: TreeKind,
    },

    /// Two cluster entries share a name.
    #[error("duplicate cluster name '{name}'")]
    DuplicateClusterName {
        /// Name used more than once.
        name: String,
    },

    /// A cluster lookup found no entry with the requested name.
    #[error("cluster '{name}' not found")]
    ClusterNotFound {
        /// Requested cluster name.
        name: String,
    },

    /// Neither an explicit cluster nor `default-cluster` was available.
    #[error("no cluster specified and no default-cluster configured")]
    NoClusterSelected,

    /// The cluster base URI is not an absolute URI.
    #[error("invalid cluster URI '{uri}': {reason}")]
    InvalidClusterUri {
        /// URI as configured.
        uri: String,
        /// Why the URI was refused.
        reason: String,
    },

    /// A per-service URI is neither absolute nor a usable relative path.
    #[error("invalid service URI for {service}: {reason}")]
    InvalidServiceUri {
        /// Service whose override was refused.
        service: String,
        /// Why the override was refused.
        reason: String,
    },

    /// Neither the cluster URI nor the service override is configured.
    #[error("base URI for {service} not found (neither cluster.uri nor {service}.uri specified)")]
    MissingUri {
        /// Service being resolved.
        service: String,
    },

    /// The service name is not one the client knows about.
    #[error("unknown service: {service}")]
    UnknownService {
        /// Name as supplied by the caller.
        service: String,
    },

    /// Renaming a cluster to a name that is already taken.
    #[error("cluster with name '{name}' already exists")]
    CannotRenameToExisting {
        /// Name that is already in use.
        name: String,
    },

    /// Attempting to delete the `name` key of a cluster.
    #[error("cannot unset name of cluster")]
    CannotUnsetName,

    /// Requested output format is not supported.
    #[error("unknown format: {format}")]
    UnknownFormat {
        /// Format as supplied by the caller.
        format: String,
    },

    /// Serialising configuration or values failed.
    #[error("failed to serialise configuration: {message}")]
    Serialise {
        /// Serializer diagnostic.
        message: String,
    },

    /// Failure raised while handling a specific configuration file.
    #[error("configuration file error in '{}': {source}", .path.display())]
    Source {
        /// File being processed when the failure occurred.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: Box<Self>,
    },
}

fn parse_message(line: &Option<usize>, column: &Option<usize>, message: &str) -> String {
    match (*line, *column) {
        (Some(row), Some(col)) => format!("parse error at line {row}, column {col}: {message}"),
        (Some(row), None) => format!("parse error at line {row}: {message}"),
        _ => format!("parse error: {message}"),
    }
}
