//! Component configuration.
//!
//! Each component receives its configuration as a raw TOML table from an external loader. The
//! component converts the table into its own typed configuration struct once, at construction,
//! instead of re-checking value types at every access.

use serde::de::DeserializeOwned;

/// Raw component configuration as supplied by the external loader.
pub type RawConfig = toml::value::Table;

/// An error that occurred while validating a component's configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid component configuration: {0}")]
    InvalidValue(#[from] toml::de::Error),
}

/// Deserializes a raw configuration table into a component's typed configuration.
///
/// A value of the wrong type (for example an integer where a path string is expected) is an
/// error; missing keys take the struct's defaults.
pub fn from_table<C: DeserializeOwned>(table: &RawConfig) -> Result<C, ConfigError> {
    Ok(toml::Value::Table(table.clone()).try_into()?)
}

/// Normalizes an optional string property.
///
/// Absent and blank values both mean "feature disabled", so a present-but-empty string
/// collapses to `None`.
#[must_use]
pub fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
