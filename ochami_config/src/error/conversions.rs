//! Trait-based conversions between serializer errors and `ConfigError`.

use super::ConfigError;

/// Typed conversion failures from the tree into configuration structs.
impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidConfig {
            message: e.to_string(),
        }
    }
}

/// YAML syntax failures, keeping the location the parser reports.
impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        let location = e.location();
        Self::Parse {
            line: location.as_ref().map(serde_yaml::Location::line),
            column: location.as_ref().map(serde_yaml::Location::column),
            message: e.to_string(),
        }
    }
}
