//! Base URI resolution for the services of a cluster.
//!
//! Every service is reached through its own base URI. A service either
//! names an absolute URI of its own, gives a path relative to the cluster
//! URI, or falls back to its well-known default path under the cluster URI.

mod path;

use std::fmt;
use std::str::FromStr;

use url::{ParseError, Url};

use crate::model::ClusterConfig;
use crate::{ConfigError, ConfigResult};

/// Services the client talks to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ServiceName {
    /// Boot service.
    BootService,
    /// Boot Script Service.
    Bss,
    /// cloud-init server.
    CloudInit,
    /// Power Control Service.
    Pcs,
    /// State Management Database.
    Smd,
}

impl ServiceName {
    /// Every known service.
    pub const ALL: [Self; 5] = [
        Self::BootService,
        Self::Bss,
        Self::CloudInit,
        Self::Pcs,
        Self::Smd,
    ];

    /// Name used in configuration keys and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BootService => "boot-service",
            Self::Bss => "bss",
            Self::CloudInit => "cloud-init",
            Self::Pcs => "pcs",
            Self::Smd => "smd",
        }
    }

    /// Path appended to the cluster URI when no override is configured.
    #[must_use]
    pub const fn default_base_path(self) -> &'static str {
        match self {
            Self::BootService => "/boot",
            Self::Bss => "/boot/v1",
            Self::CloudInit => "/cloud-init",
            Self::Pcs => "/",
            Self::Smd => "/hsm/v2",
        }
    }

    fn configured_uri(self, cluster: &ClusterConfig) -> Option<&str> {
        match self {
            Self::BootService => cluster.boot_service.configured_uri(),
            Self::Bss => cluster.bss.configured_uri(),
            Self::CloudInit => cluster.cloud_init.configured_uri(),
            Self::Pcs => cluster.pcs.configured_uri(),
            Self::Smd => cluster.smd.configured_uri(),
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownService {
                service: s.to_owned(),
            })
    }
}

impl ClusterConfig {
    /// Base URI of `service` on this cluster; see [`resolve_service_uri`].
    ///
    /// # Errors
    ///
    /// As [`resolve_service_uri`].
    pub fn service_uri(&self, service: ServiceName) -> ConfigResult<String> {
        resolve_service_uri(self, service)
    }
}

/// Resolve the base URI of `service` on `cluster`.
///
/// 1. A set cluster URI must be absolute (`scheme://host[:port][/path]`).
/// 2. An absolute service URI is returned exactly as written.
/// 3. A relative service URI has its path joined onto the cluster URI.
/// 4. Without a service URI, the default path is joined onto the cluster URI.
///
/// Joining cleans `.`/`..` segments and duplicate slashes and keeps a
/// trailing slash present on the joined path.
///
/// # Errors
///
/// - [`ConfigError::InvalidClusterUri`] when the cluster URI is not absolute.
/// - [`ConfigError::MissingUri`] when neither URI is configured.
/// - [`ConfigError::InvalidServiceUri`] when the service URI is unusable, or
///   relative without a cluster URI to resolve against.
///
/// # Examples
///
/// ```
/// use ochami_config::{ClusterConfig, ServiceName, resolve_service_uri};
///
/// let mut cluster = ClusterConfig::default();
/// cluster.uri = Some("https://demo.example.com/api".to_owned());
/// assert_eq!(
///     resolve_service_uri(&cluster, ServiceName::Bss)?,
///     "https://demo.example.com/api/boot/v1"
/// );
///
/// cluster.smd.uri = Some("https://smd.example.com:27779".to_owned());
/// assert_eq!(
///     resolve_service_uri(&cluster, ServiceName::Smd)?,
///     "https://smd.example.com:27779"
/// );
/// # Ok::<_, ochami_config::ConfigError>(())
/// ```
pub fn resolve_service_uri(cluster: &ClusterConfig, service: ServiceName) -> ConfigResult<String> {
    let base = cluster_base(cluster)?;
    resolve_against(base.as_ref(), cluster, service)
}

/// Resolve the base URI of the service called `service`.
///
/// # Errors
///
/// As [`resolve_service_uri`], plus [`ConfigError::UnknownService`] for a
/// name that is not one of [`ServiceName::ALL`]. The cluster URI is
/// validated first.
pub fn resolve(cluster: &ClusterConfig, service: &str) -> ConfigResult<String> {
    let base = cluster_base(cluster)?;
    let name = service.parse()?;
    resolve_against(base.as_ref(), cluster, name)
}

fn cluster_base(cluster: &ClusterConfig) -> ConfigResult<Option<Url>> {
    let Some(uri) = cluster.configured_uri() else {
        return Ok(None);
    };
    let invalid = |reason: String| ConfigError::InvalidClusterUri {
        uri: uri.to_owned(),
        reason,
    };
    let parsed = Url::parse(uri).map_err(|err| invalid(err.to_string()))?;
    if parsed.cannot_be_a_base() || parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid(
            "unknown URI format (must be \"proto://host[:port][/path]\")".to_owned(),
        ));
    }
    Ok(Some(parsed))
}

fn resolve_against(
    base: Option<&Url>,
    cluster: &ClusterConfig,
    service: ServiceName,
) -> ConfigResult<String> {
    let override_uri = service.configured_uri(cluster);
    let relative = match (override_uri, base) {
        (None, None) => {
            return Err(ConfigError::MissingUri {
                service: service.to_string(),
            });
        }
        (Some(uri), _) => match Url::parse(uri) {
            Ok(absolute) if absolute.cannot_be_a_base() => {
                return Err(ConfigError::invalid_service_uri(
                    service.as_str(),
                    "unknown URI format (must be \"/path\" or \"proto://host[:port][/path]\")",
                ));
            }
            Ok(_) => return Ok(uri.to_owned()),
            Err(ParseError::RelativeUrlWithoutBase) if uri.starts_with("//") => {
                return Err(ConfigError::invalid_service_uri(
                    service.as_str(),
                    format!("{service}.uri names a host but no scheme"),
                ));
            }
            Err(ParseError::RelativeUrlWithoutBase) => relative_path(uri).ok_or_else(|| {
                ConfigError::invalid_service_uri(
                    service.as_str(),
                    format!("{service}.uri is neither an absolute URI nor has a path component"),
                )
            })?,
            Err(err) => {
                return Err(ConfigError::invalid_service_uri(service.as_str(), err.to_string()));
            }
        },
        (None, Some(_)) => service.default_base_path(),
    };

    let Some(cluster_uri) = base else {
        return Err(ConfigError::invalid_service_uri(
            service.as_str(),
            format!("{service}.uri is a relative path but cluster.uri not set"),
        ));
    };
    let mut joined = cluster_uri.clone();
    joined.set_path(&path::join(cluster_uri.path(), relative));
    Ok(joined.to_string())
}

fn relative_path(uri: &str) -> Option<&str> {
    let end = uri.find(['?', '#']).unwrap_or(uri.len());
    uri.get(..end).filter(|path| !path.is_empty())
}
