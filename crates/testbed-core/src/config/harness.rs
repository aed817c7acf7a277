use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
#[cfg(feature = "yaml-config")]
use serde_yaml;
#[cfg(feature = "toml-config")]
use toml;

use crate::config::error::ConfigError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// What happens when a context reads a module property through the
/// deprecated fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeprecationPolicy {
    /// Log a warning and publish the event
    #[default]
    Log,
    /// Only publish the event
    Silent,
}

/// Harness-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Deprecation reporting
    pub deprecations: DeprecationPolicy,
    /// Restore the fixture surface after every test
    pub reset_fixture: bool,
    /// Log and publish every lifecycle transition
    pub trace_lifecycle: bool,
    /// Skip the remaining tests of a suite after the first failure
    pub fail_fast: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            deprecations: DeprecationPolicy::Log,
            reset_fixture: true,
            trace_lifecycle: true,
            fail_fast: false,
        }
    }
}

impl HarnessConfig {
    /// Load a config file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_str_with_format(&data, format)?;
        log::debug!("Loaded harness config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parse a config from a string in the given format
    pub fn from_str_with_format(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let failed = |e: &dyn fmt::Display| ConfigError::Deserialization {
            format: format.to_string(),
            reason: e.to_string(),
        };
        match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| failed(&e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| failed(&e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| failed(&e)),
        }
    }

    /// Serialize the config in the given format
    pub fn to_string_with_format(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        let failed = |e: &dyn fmt::Display| ConfigError::Serialization {
            format: format.to_string(),
            reason: e.to_string(),
        };
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| failed(&e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| failed(&e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| failed(&e)),
        }
    }
}
