//! Reading and writing configuration files.
//!
//! A configuration source is one YAML file. Loading never assumes the file
//! matches the schema: the raw tree is kept for merging and a typed copy is
//! materialised separately so that problems are reported against the file
//! that caused them.

mod loader;
mod source;
mod writer;

pub use loader::{load_source, read_config};
pub use source::{SourceOrigin, SourceRecord};
pub use writer::{create_if_missing, write_config};
