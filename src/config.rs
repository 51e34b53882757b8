//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files,
//! with environment variable overrides for deployment settings.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Supported baud rates for NMEA-speaking GPS devices
const SUPPORTED_BAUD_RATES: &[u32] = &[4800, 9600, 19200, 38400, 57600, 115200];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub boat: BoatConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
}

/// Remote ingestion API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Boat identity configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BoatConfig {
    #[serde(default = "default_boat_name")]
    pub default_name: String,
}

// Default value functions
fn default_serial_port() -> String { "COM3".to_string() }
fn default_baud_rate() -> u32 { 9600 }
fn default_read_timeout_ms() -> u64 { 1000 }
fn default_reconnect_interval_ms() -> u64 { 5000 }

fn default_base_url() -> String { "http://localhost:33003".to_string() }
fn default_request_timeout_ms() -> u64 { 8000 }

fn default_boat_name() -> String { "Endurance".to_string() }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: String::new(),
            password: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for BoatConfig {
    fn default() -> Self {
        Self {
            default_name: default_boat_name(),
        }
    }
}

impl ApiConfig {
    /// Login endpoint derived from the base URL
    pub fn login_url(&self) -> String {
        format!("{}/login", self.base_url.trim_end_matches('/'))
    }

    /// Ingestion endpoint derived from the base URL
    pub fn gps_url(&self) -> String {
        format!("{}/gps", self.base_url.trim_end_matches('/'))
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Environment overrides are applied after parsing, before validation.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, or fall back to defaults if the
    /// file does not exist
    ///
    /// Deployments that configure everything through the environment do not
    /// need a config file at all.
    ///
    /// # Errors
    ///
    /// Returns error if an existing file cannot be read or parsed, or if the
    /// resulting configuration fails validation.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = if path.as_ref().exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str::<Config>(&contents)?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Recognized variables: `SERIAL_PORT`, `BAUDRATE`, `API_BASE`,
    /// `APP_USER`, `APP_PASS`, `DEFAULT_BOAT`.
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("SERIAL_PORT") {
            self.serial.port = port;
        }
        if let Some(baud) = std::env::var("BAUDRATE").ok().and_then(|v| v.parse().ok()) {
            self.serial.baud_rate = baud;
        }
        if let Ok(base) = std::env::var("API_BASE") {
            self.api.base_url = base;
        }
        if let Ok(user) = std::env::var("APP_USER") {
            self.api.username = user;
        }
        if let Ok(pass) = std::env::var("APP_PASS") {
            self.api.password = pass;
        }
        if let Ok(boat) = std::env::var("DEFAULT_BOAT") {
            self.boat.default_name = boat;
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        // Validate serial port configuration
        if self.serial.port.is_empty() {
            return Err(crate::error::GpsBridgeError::Config(
                toml::de::Error::custom("serial port cannot be empty")
            ));
        }

        if !SUPPORTED_BAUD_RATES.contains(&self.serial.baud_rate) {
            return Err(crate::error::GpsBridgeError::Config(
                toml::de::Error::custom("baud_rate must be one of: 4800, 9600, 19200, 38400, 57600, 115200")
            ));
        }

        // Validate timing fields
        if self.serial.read_timeout_ms == 0 || self.serial.read_timeout_ms > 10000 {
            return Err(crate::error::GpsBridgeError::Config(
                toml::de::Error::custom("read_timeout_ms must be between 1 and 10000")
            ));
        }

        if self.serial.reconnect_interval_ms == 0 || self.serial.reconnect_interval_ms > 60000 {
            return Err(crate::error::GpsBridgeError::Config(
                toml::de::Error::custom("reconnect_interval_ms must be between 1 and 60000")
            ));
        }

        if self.api.request_timeout_ms == 0 || self.api.request_timeout_ms > 60000 {
            return Err(crate::error::GpsBridgeError::Config(
                toml::de::Error::custom("request_timeout_ms must be between 1 and 60000")
            ));
        }

        // Validate API base URL
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(crate::error::GpsBridgeError::Config(
                toml::de::Error::custom("base_url must start with http:// or https://")
            ));
        }

        // Credentials may be empty here; login fails at runtime with a clear
        // message instead, so a config file without secrets still parses.

        if self.boat.default_name.is_empty() {
            return Err(crate::error::GpsBridgeError::Config(
                toml::de::Error::custom("boat default_name cannot be empty")
            ));
        }

        Ok(())
    }
}
