use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::Ipv6Addr;
use std::path::Path;
use std::time::Duration;

use crate::types::{RoomOptions, VideoCodec};

/// `FISHJAM_*` variables; `__` separates nesting levels
fn env_source() -> Environment {
    Environment::with_prefix("FISHJAM")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub room: RoomDefaults,
    pub logging: LoggingConfig,
}

/// Fishjam server endpoint. Every request is authorized with `token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub token: String,
    /// Use https instead of http
    pub secure: bool,
    pub connect_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5002,
            token: "development".to_string(),
            secure: false,
            connect_timeout_seconds: 5,
            request_timeout_seconds: 15,
        }
    }
}

impl ServerConfig {
    /// `host:port` as passed to the server API
    #[must_use]
    pub fn address(&self) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Base URL every API path is appended to
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}", self.address())
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Options used for rooms created by the provisioner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDefaults {
    pub video_codec: VideoCodec,
    pub max_peers: Option<u32>,
}

impl RoomDefaults {
    #[must_use]
    pub const fn room_options(&self) -> RoomOptions {
        RoomOptions {
            video_codec: self.video_codec,
            max_peers: self.max_peers,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (`FISHJAM_SERVER__HOST`, `FISHJAM_ROOM__VIDEO_CODEC`, ...)
    /// 2. Config file (if provided)
    /// 3. Defaults
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_file, env_source())
    }

    fn load_with_env(config_file: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if !Path::new(path).exists() {
                return Err(ConfigError::Message(format!("config file not found: {path}")));
            }
            builder = builder.add_source(File::with_name(path));
        }

        let config = builder.add_source(env).build()?;
        config.try_deserialize()
    }

    /// Check for values that would make every request fail.
    ///
    /// Returns one message per problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.host.trim().is_empty() {
            errors.push("server.host must not be empty".to_string());
        }
        if self.server.port == 0 {
            errors.push("server.port must be greater than 0".to_string());
        }
        if self.server.token.trim().is_empty() {
            errors.push("server.token must not be empty".to_string());
        }
        if self.server.connect_timeout_seconds == 0 {
            errors.push("server.connect_timeout_seconds must be greater than 0".to_string());
        }
        if self.server.request_timeout_seconds == 0 {
            errors.push("server.request_timeout_seconds must be greater than 0".to_string());
        }
        if self.room.max_peers == Some(0) {
            errors.push("room.max_peers must be greater than 0 when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
