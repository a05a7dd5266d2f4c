//! Hierarchical configuration for the ochami cluster-management client.
//!
//! Configuration is read from up to three layers, lowest precedence first:
//! built-in defaults, the system file (`/etc/ochami/config.yaml`) and the
//! per-user file (`~/.config/ochami/config.yaml`). Layers are deep-merged,
//! with clusters matched across layers by name, and the result is validated
//! into a [`Config`]. A file named explicitly replaces the cascade.
//!
//! Single files can be edited through [`ConfigFile`], and the base URI of
//! each cluster service is derived with [`resolve_service_uri`].
//!
//! # Examples
//!
//! ```no_run
//! use ochami_config::{ConfigPaths, ServiceName, load_config};
//!
//! let resolved = load_config(None, ConfigPaths::discover())?;
//! let smd = resolved.service_uri(None, ServiceName::Smd)?;
//! println!("SMD lives at {smd}");
//! # Ok::<_, ochami_config::ConfigError>(())
//! ```

pub mod cascade;
pub mod endpoint;
mod error;
pub mod file;
pub mod merge;
pub mod model;
pub mod mutate;
mod result_ext;
pub mod schema;
pub mod tree;
mod value;

pub use cascade::{CascadeResolver, ConfigPaths, ResolvedConfig, load_config};
pub use endpoint::{ServiceName, resolve_service_uri};
pub use error::{ConfigError, ConfigResult};
pub use file::{SourceOrigin, SourceRecord};
pub use model::{
    BootServiceEndpoint, ClusterConfig, ClusterEntry, Config, LogConfig, ServiceEndpoint, Timeout,
};
pub use mutate::{ConfigFile, OutputFormat, render_value};
pub use result_ext::{ConfigResultExt, FileContextExt};
pub use tree::{Tree, TreeKind, TreeMap};
pub use value::parse_scalar;
