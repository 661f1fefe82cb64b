use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "GLBRIDGE_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level bridge configuration, loaded from glbridge.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub checks: CheckConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Query the driver error slot after every call
    #[serde(default = "default_true")]
    pub automatic_error_checking: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Driver libraries tried before the platform defaults
    #[serde(default)]
    pub library_paths: Vec<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            automatic_error_checking: true,
        }
    }
}

impl BridgeConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from file if it exists, otherwise return defaults.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("ignoring {}: {}", path, e);
                Self::default()
            }
        }
    }
}

/// Returns the config file path: `$GLBRIDGE_CONFIG` if set, else
/// `./glbridge.toml`.
pub fn default_config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| "glbridge.toml".to_string())
}

fn default_true() -> bool {
    true
}
