//! Constructors and inspection helpers for `ConfigError`.

use std::path::Path;

use super::ConfigError;

impl ConfigError {
    /// Attach `path` to this error unless it already names a file.
    ///
    /// Errors that carry their own path (`SourceNotFound`, `Read`, `Write`
    /// and `Source`) are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ochami_config::ConfigError;
    /// use std::path::Path;
    ///
    /// let err = ConfigError::CannotUnsetName.in_file(Path::new("/tmp/c.yaml"));
    /// assert!(matches!(err, ConfigError::Source { .. }));
    /// assert!(matches!(err.root(), ConfigError::CannotUnsetName));
    /// ```
    #[must_use]
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Self::SourceNotFound { .. }
            | Self::Read { .. }
            | Self::Write { .. }
            | Self::Source { .. } => self,
            other => Self::Source {
                path: path.to_path_buf(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, skipping `Source` wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Self::Source { source, .. } = current {
            current = source;
        }
        current
    }

    /// Construct an [`ConfigError::InvalidKey`].
    #[must_use]
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Construct an [`ConfigError::InvalidServiceUri`].
    #[must_use]
    pub fn invalid_service_uri(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidServiceUri {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Construct a [`ConfigError::ClusterNotFound`].
    #[must_use]
    pub fn cluster_not_found(name: impl Into<String>) -> Self {
        Self::ClusterNotFound { name: name.into() }
    }

    /// Returns `true` when the error (or its root) reports a missing file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::SourceNotFound { .. })
    }
}
