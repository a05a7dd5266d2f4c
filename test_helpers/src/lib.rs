//! Test helpers shared across the workspace.
//!
//! - [`env`] serialises environment variable changes and restores them.
//! - [`layers`] lays out system and user configuration files in a temporary
//!   directory.

pub mod env;
pub mod layers;
