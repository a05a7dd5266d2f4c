//! Records describing one loaded configuration layer.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::ConfigResult;
use crate::model::Config;
use crate::schema::materialise;
use crate::tree::{Tree, parse_yaml, prune_nulls, to_tree};

/// Where a configuration layer came from, lowest precedence first.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SourceOrigin {
    /// Values compiled into the client.
    Default,
    /// The system-wide configuration file.
    SystemFile,
    /// The per-user configuration file.
    UserFile,
    /// A file named explicitly by the caller.
    ExplicitFile,
}

impl SourceOrigin {
    /// Short label used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::SystemFile => "system",
            Self::UserFile => "user",
            Self::ExplicitFile => "explicit",
        }
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration layer as loaded, before merging.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceRecord {
    /// Layer the values belong to.
    pub origin: SourceOrigin,
    /// File the values were read from; `None` for built-in defaults.
    pub path: Option<PathBuf>,
    /// Raw tree with null entries pruned. Absent keys stay absent so that
    /// lower layers can fill them during merging.
    pub tree: Tree,
    /// Strictly validated view of this layer alone.
    pub typed: Config,
}

impl SourceRecord {
    /// Record for the built-in defaults layer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Serialise`] if `defaults` cannot be
    /// represented as a tree.
    pub fn from_defaults(defaults: Config) -> ConfigResult<Self> {
        Ok(Self {
            origin: SourceOrigin::Default,
            path: None,
            tree: to_tree(&defaults)?,
            typed: defaults,
        })
    }

    /// Record for YAML `text` read from `path`.
    ///
    /// # Errors
    ///
    /// Returns the parse or materialisation failure. The caller attaches the
    /// file path.
    pub fn from_text(origin: SourceOrigin, path: &Path, text: &str) -> ConfigResult<Self> {
        let mut tree = parse_yaml(text)?;
        let typed = materialise(tree.clone())?;
        prune_nulls(&mut tree);
        Ok(Self {
            origin,
            path: Some(path.to_path_buf()),
            tree,
            typed,
        })
    }
}
