//! Configuration loading for the pack exporter.
//!
//! Settings live in an optional `poptracker-config.yaml` next to the pack
//! sources. Every field has a default, so an empty or missing file is valid.
//! A couple of environment variables override the file after parsing.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidOverride {
        /// The environment variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Overrides the output indent; empty or `none` selects compact output.
pub const INDENT_ENV: &str = "POPTRACKER_INDENT";

/// Overrides [`PackConfig::verify_round_trip`].
pub const VERIFY_ENV: &str = "POPTRACKER_VERIFY_ROUND_TRIP";

/// Top-level exporter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackConfig {
    /// How the JSON output is formatted.
    #[serde(default)]
    pub output: OutputConfig,

    /// Refuse to export when the written JSON would drop or change a
    /// meaningful field of the source.
    #[serde(default = "default_true")]
    pub verify_round_trip: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            verify_round_trip: true,
        }
    }
}

/// Output formatting options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Spaces per indent level; `None` writes compact JSON.
    #[serde(default)]
    pub indent: Option<usize>,

    /// Append a newline after the JSON document.
    #[serde(default = "default_true")]
    pub trailing_newline: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: None,
            trailing_newline: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

impl PackConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] for a malformed override.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides looked up through `lookup` (normally the process
    /// environment).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if a value does not parse.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup(INDENT_ENV) {
            self.output.indent = match value.trim() {
                "" | "none" => None,
                width => Some(width.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidOverride {
                        var: INDENT_ENV,
                        value: value.clone(),
                        reason: e.to_string(),
                    }
                })?),
            };
        }
        if let Some(value) = lookup(VERIFY_ENV) {
            self.verify_round_trip =
                value
                    .trim()
                    .parse()
                    .map_err(|e: std::str::ParseBoolError| ConfigError::InvalidOverride {
                        var: VERIFY_ENV,
                        value: value.clone(),
                        reason: e.to_string(),
                    })?;
        }
        Ok(())
    }
}
