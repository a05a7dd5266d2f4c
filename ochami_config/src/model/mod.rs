//! Typed configuration model.
//!
//! These structs are the strict, validated view of a configuration tree.
//! Field names follow the kebab-case keys used in configuration files; empty
//! optional values are omitted when serialising so that a written file only
//! contains what was set.

mod duration;

use serde::{Deserialize, Serialize};

pub(crate) use duration::EXPECTED_DURATION;
pub use duration::Timeout;

use crate::{ConfigError, ConfigResult};

/// Default value of `log.format`.
pub const DEFAULT_LOG_FORMAT: &str = "rfc3339";
/// Default value of `log.level`.
pub const DEFAULT_LOG_LEVEL: &str = "warning";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Complete client configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Logging settings.
    #[serde(default, skip_serializing_if = "LogConfig::is_empty")]
    pub log: LogConfig,
    /// Request timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Timeout>,
    /// Name of the cluster used when none is given explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_cluster: Option<String>,
    /// Configured clusters, identified by name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<ClusterEntry>,
}

impl Config {
    /// The lowest-precedence configuration layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use ochami_config::Config;
    ///
    /// let defaults = Config::builtin_defaults();
    /// assert_eq!(defaults.log.level.as_deref(), Some("warning"));
    /// assert!(defaults.clusters.is_empty());
    /// ```
    #[must_use]
    pub fn builtin_defaults() -> Self {
        Self {
            log: LogConfig {
                format: Some(DEFAULT_LOG_FORMAT.to_owned()),
                level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            },
            timeout: Some(Timeout::from_secs(DEFAULT_TIMEOUT_SECS)),
            default_cluster: None,
            clusters: Vec::new(),
        }
    }

    /// Position of the cluster called `name`, if any.
    #[must_use]
    pub fn cluster_index(&self, name: &str) -> Option<usize> {
        self.clusters.iter().position(|entry| entry.name == name)
    }

    /// Look up a cluster by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ClusterNotFound`] when no entry has that name.
    pub fn cluster(&self, name: &str) -> ConfigResult<&ClusterEntry> {
        self.clusters
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| ConfigError::cluster_not_found(name))
    }

    /// Returns `true` when `default-cluster` names `name`.
    #[must_use]
    pub fn is_default_cluster(&self, name: &str) -> bool {
        self.default_cluster.as_deref() == Some(name)
    }
}

/// Logging settings consumed by the client's logger.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Log line format (`rfc3339`, `json`, `basic`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Minimum level that is emitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl LogConfig {
    /// Returns `true` when neither field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.format.is_none() && self.level.is_none()
    }
}

/// A named cluster.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClusterEntry {
    /// Unique cluster name.
    pub name: String,
    /// Connection settings for the cluster.
    #[serde(default)]
    pub cluster: ClusterConfig,
}

impl ClusterEntry {
    /// Entry called `name` with default connection settings.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cluster: ClusterConfig::default(),
        }
    }
}

/// Connection settings of one cluster.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ClusterConfig {
    /// Absolute base URI shared by every service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Whether requests carry an access token.
    #[serde(default = "enable_auth_default")]
    pub enable_auth: bool,
    /// Boot service endpoint.
    #[serde(default, skip_serializing_if = "BootServiceEndpoint::is_empty")]
    pub boot_service: BootServiceEndpoint,
    /// Boot Script Service endpoint.
    #[serde(default, skip_serializing_if = "ServiceEndpoint::is_empty")]
    pub bss: ServiceEndpoint,
    /// cloud-init server endpoint.
    #[serde(default, skip_serializing_if = "ServiceEndpoint::is_empty")]
    pub cloud_init: ServiceEndpoint,
    /// Power Control Service endpoint.
    #[serde(default, skip_serializing_if = "ServiceEndpoint::is_empty")]
    pub pcs: ServiceEndpoint,
    /// State Management Database endpoint.
    #[serde(default, skip_serializing_if = "ServiceEndpoint::is_empty")]
    pub smd: ServiceEndpoint,
}

const fn enable_auth_default() -> bool {
    true
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            uri: None,
            enable_auth: enable_auth_default(),
            boot_service: BootServiceEndpoint::default(),
            bss: ServiceEndpoint::default(),
            cloud_init: ServiceEndpoint::default(),
            pcs: ServiceEndpoint::default(),
            smd: ServiceEndpoint::default(),
        }
    }
}

impl ClusterConfig {
    /// The cluster URI, treating an empty string as unset.
    #[must_use]
    pub fn configured_uri(&self) -> Option<&str> {
        non_empty(self.uri.as_deref())
    }

    /// Copy of `self` with every non-empty URI from `overrides` applied.
    ///
    /// Only URIs are taken from `overrides`; authentication and API version
    /// settings stay as configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use ochami_config::ClusterConfig;
    ///
    /// let mut configured = ClusterConfig::default();
    /// configured.uri = Some("https://a.example.com".to_owned());
    /// configured.smd.uri = Some("/hsm/v2".to_owned());
    ///
    /// let mut flags = ClusterConfig::default();
    /// flags.uri = Some("https://b.example.com".to_owned());
    ///
    /// let merged = configured.with_uri_overrides(&flags);
    /// assert_eq!(merged.uri.as_deref(), Some("https://b.example.com"));
    /// assert_eq!(merged.smd.uri.as_deref(), Some("/hsm/v2"));
    /// ```
    #[must_use]
    pub fn with_uri_overrides(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        overlay(&mut merged.uri, overrides.uri.as_deref());
        overlay(
            &mut merged.boot_service.uri,
            overrides.boot_service.uri.as_deref(),
        );
        overlay(&mut merged.bss.uri, overrides.bss.uri.as_deref());
        overlay(
            &mut merged.cloud_init.uri,
            overrides.cloud_init.uri.as_deref(),
        );
        overlay(&mut merged.pcs.uri, overrides.pcs.uri.as_deref());
        overlay(&mut merged.smd.uri, overrides.smd.uri.as_deref());
        merged
    }
}

fn overlay(target: &mut Option<String>, value: Option<&str>) {
    if let Some(uri) = non_empty(value) {
        *target = Some(uri.to_owned());
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Endpoint settings of the boot service.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct BootServiceEndpoint {
    /// Absolute URI or path relative to the cluster URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// API version requested from the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl BootServiceEndpoint {
    /// Returns `true` when nothing is configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.uri.is_none() && self.api_version.is_none()
    }

    /// The URI, treating an empty string as unset.
    #[must_use]
    pub fn configured_uri(&self) -> Option<&str> {
        non_empty(self.uri.as_deref())
    }
}

/// Endpoint settings of a service that only carries a URI.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServiceEndpoint {
    /// Absolute URI or path relative to the cluster URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl ServiceEndpoint {
    /// Returns `true` when nothing is configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.uri.is_none()
    }

    /// The URI, treating an empty string as unset.
    #[must_use]
    pub fn configured_uri(&self) -> Option<&str> {
        non_empty(self.uri.as_deref())
    }
}

#[cfg(test)]
mod tests;
