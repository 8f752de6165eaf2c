//! Loading engine configuration from JSON or TOML files.

use std::fs;
use std::path::Path;

use crate::engine::EngineConfig;
use crate::error::{ConfigError, ConfigResult, Validate};

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON document.
    Json,
    /// TOML document.
    Toml,
}

impl ConfigFormat {
    /// Determines the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Serializes the configuration in the given format.
    pub fn to_string_as(&self, format: ConfigFormat) -> ConfigResult<String> {
        match format {
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ConfigFormat::Toml => Ok(toml::to_string_pretty(self)?),
        }
    }
}

/// Loads and validates an engine configuration, choosing the parser from the
/// file extension.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<EngineConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.display().to_string(),
        });
    }
    let contents = fs::read_to_string(path)?;
    match format {
        ConfigFormat::Json => EngineConfig::from_json_str(&contents),
        ConfigFormat::Toml => EngineConfig::from_toml_str(&contents),
    }
}
