//! Rendering configuration values as text.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::result_ext::SerialiseExt;
use crate::tree::{Tree, to_yaml};
use crate::{ConfigError, ConfigResult};

/// Text format for maps and lists.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    /// YAML.
    #[default]
    Yaml,
    /// Single-line JSON.
    Json,
    /// JSON indented with tabs.
    JsonPretty,
}

impl OutputFormat {
    /// Name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::JsonPretty => "json-pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "json-pretty" => Ok(Self::JsonPretty),
            other => Err(ConfigError::UnknownFormat {
                format: other.to_owned(),
            }),
        }
    }
}

/// Render a looked-up value for display.
///
/// Maps and lists are serialised in `format`. Strings are returned as-is,
/// other scalars in their plain form, and a missing value as an empty
/// string.
///
/// # Errors
///
/// Returns [`ConfigError::Serialise`] if serialisation fails.
///
/// # Examples
///
/// ```
/// use ochami_config::{OutputFormat, render_value};
/// use serde_json::json;
///
/// assert_eq!(render_value(Some(&json!("debug")), OutputFormat::Json)?, "debug");
/// assert_eq!(render_value(Some(&json!({"a": 1})), OutputFormat::Json)?, r#"{"a":1}"#);
/// assert_eq!(render_value(None, OutputFormat::Yaml)?, "");
/// # Ok::<_, ochami_config::ConfigError>(())
/// ```
pub fn render_value(value: Option<&Tree>, format: OutputFormat) -> ConfigResult<String> {
    match value {
        None | Some(Tree::Null) => Ok(String::new()),
        Some(Tree::String(text)) => Ok(text.clone()),
        Some(nested @ (Tree::Object(_) | Tree::Array(_))) => serialise(nested, format),
        Some(scalar) => Ok(scalar.to_string()),
    }
}

fn serialise(value: &Tree, format: OutputFormat) -> ConfigResult<String> {
    match format {
        OutputFormat::Yaml => to_yaml(value),
        OutputFormat::Json => serde_json::to_string(value).into_serialise(),
        OutputFormat::JsonPretty => {
            let mut buffer = Vec::new();
            let mut serializer =
                Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"\t"));
            value.serialize(&mut serializer).into_serialise()?;
            String::from_utf8(buffer).into_serialise()
        }
    }
}
