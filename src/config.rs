//! Server configuration loaded from environment variables.

use std::path::PathBuf;
use thiserror::Error;

/// Settings for the web binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Directory holding one JSON snapshot per tournament
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl ServerConfig {
    /// Read HOST, PORT and DATA_DIR, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns error if PORT is set but is not a valid port number
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "PORT".to_string(),
                reason: format!("'{}' is not a port number", raw),
            })?,
            None => defaults.port,
        };
        let data_dir = lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir);
        Ok(Self {
            host,
            port,
            data_dir,
        })
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}
