//! Session configuration loading and validation.
//!
//! Sessions can be constructed from an explicit [`SessionConfig`] or from a
//! TOML file:
//!
//! ```toml
//! [universe]
//! host = "universe.example.net"
//! port = 57000
//!
//! [credentials]
//! username = "alice"
//! password = "hunter2"
//! bot_name = "caretaker"
//!
//! [world]
//! name = "Aden"
//! local_cache_path = "/var/cache/worldgate/aden"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default universe port.
const DEFAULT_PORT: u16 = 57_000;

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A required field is missing or empty.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Universe endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UniverseConfig {
    /// Universe host name.
    pub host: String,
    /// Universe port.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Login credentials.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CredentialsConfig {
    /// Account user name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Name the avatar announces as.
    pub bot_name: String,
}

/// Default world to enter.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct WorldConfig {
    /// World name.
    pub name: Option<String>,
    /// Local object-cache directory applied to entered worlds.
    pub local_cache_path: Option<PathBuf>,
}

/// Complete session configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Universe endpoint.
    pub universe: UniverseConfig,
    /// Login credentials.
    pub credentials: CredentialsConfig,
    /// Default world, if any.
    #[serde(default)]
    pub world: WorldConfig,
}

impl SessionConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: SessionConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every required field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.host.is_empty() {
            return Err(ConfigError::Invalid("universe.host must not be empty"));
        }
        if self.credentials.username.is_empty() {
            return Err(ConfigError::Invalid(
                "credentials.username must not be empty",
            ));
        }
        if self.credentials.bot_name.is_empty() {
            return Err(ConfigError::Invalid(
                "credentials.bot_name must not be empty",
            ));
        }
        if let Some(name) = &self.world.name
            && name.is_empty()
        {
            return Err(ConfigError::Invalid("world.name must not be empty if set"));
        }
        Ok(())
    }
}
