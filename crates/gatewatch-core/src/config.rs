//! Configuration loading and typed config structures for Gatewatch.
//!
//! The canonical configuration lives in `gatewatch-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure and provides a loader that reads the file and applies
//! environment overrides.
//!
//! Recognized environment variables:
//!
//! - `OFFLINE_TIMEOUT` -- seconds of silence before a sensor is OFFLINE
//! - `SWEEP_INTERVAL` -- seconds between sweep evaluations
//! - `GATEWATCH_TIMEZONE` -- IANA zone name for all timestamps
//! - `GATEWATCH_PORT` -- TCP port for the HTTP server

use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use tracing::warn;

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

    /// The configured timezone is not a known IANA zone name.
    #[error("unknown timezone: {name}")]
    InvalidTimezone {
        /// The unrecognized zone name.
        name: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
///
/// Mirrors the structure of `gatewatch-config.yaml`. All fields have
/// defaults matching the reference deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GatewatchConfig {
    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Liveness timeout and sweep cadence.
    #[serde(default)]
    pub liveness: LivenessConfig,

    /// Timestamping timezone.
    #[serde(default)]
    pub time: TimeConfig,
}

impl GatewatchConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values; see the module docs for
    /// the recognized names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary lookup (injectable for tests).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("OFFLINE_TIMEOUT") {
            match raw.parse::<u64>() {
                Ok(seconds) => self.liveness.offline_timeout_seconds = seconds,
                Err(_) => warn!(value = %raw, "ignoring unparseable OFFLINE_TIMEOUT"),
            }
        }
        if let Some(raw) = lookup("SWEEP_INTERVAL") {
            match raw.parse::<u64>() {
                Ok(seconds) => self.liveness.sweep_interval_seconds = seconds,
                Err(_) => warn!(value = %raw, "ignoring unparseable SWEEP_INTERVAL"),
            }
        }
        if let Some(zone) = lookup("GATEWATCH_TIMEZONE") {
            self.time.timezone = zone;
        }
        if let Some(raw) = lookup("GATEWATCH_PORT") {
            match raw.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %raw, "ignoring unparseable GATEWATCH_PORT"),
            }
        }
    }
}

/// HTTP server bind configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Liveness parameters: how long a sensor may stay silent, and how often
/// the sweep re-evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LivenessConfig {
    /// Seconds of silence after which a sensor is marked OFFLINE.
    #[serde(default = "default_offline_timeout_seconds")]
    pub offline_timeout_seconds: u64,

    /// Seconds between sweep evaluations.
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

impl LivenessConfig {
    /// The offline timeout as a [`Duration`].
    pub const fn offline_timeout(&self) -> Duration {
        Duration::from_secs(self.offline_timeout_seconds)
    }

    /// The sweep interval as a [`Duration`].
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            offline_timeout_seconds: default_offline_timeout_seconds(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}

/// Timestamping timezone configuration.
///
/// One named zone is shared by ingestion timestamping and the sweep's
/// staleness comparison. A misconfigured zone is a startup error, never
/// corrected at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeConfig {
    /// IANA timezone name (e.g. `Asia/Colombo`).
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl TimeConfig {
    /// Parse the configured zone name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimezone`] if the name is not a known
    /// IANA zone.
    pub fn zone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_err| ConfigError::InvalidTimezone {
                name: self.timezone.clone(),
            })
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

const fn default_offline_timeout_seconds() -> u64 {
    8
}

const fn default_sweep_interval_seconds() -> u64 {
    5
}

fn default_timezone() -> String {
    String::from("Asia/Colombo")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = GatewatchConfig::default();
        assert_eq!(config.liveness.offline_timeout_seconds, 8);
        assert_eq!(config.liveness.sweep_interval_seconds, 5);
        assert_eq!(config.time.timezone, "Asia/Colombo");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.liveness.offline_timeout(), Duration::from_secs(8));
    }

    #[test]
    fn parses_full_yaml() {
        let yaml = r"
server:
  host: 127.0.0.1
  port: 9000
liveness:
  offline_timeout_seconds: 12
  sweep_interval_seconds: 10
time:
  timezone: Europe/Rome
";
        let config = GatewatchConfig::parse(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.liveness.offline_timeout_seconds, 12);
        assert_eq!(config.liveness.sweep_interval_seconds, 10);
        assert_eq!(config.time.timezone, "Europe/Rome");
        assert_eq!(config.time.zone().unwrap(), chrono_tz::Europe::Rome);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = GatewatchConfig::parse("server:\n  port: 9001\n").unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.liveness.offline_timeout_seconds, 8);
        assert_eq!(config.time.timezone, "Asia/Colombo");
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config = GatewatchConfig::parse("time:\n  timezone: Mars/Olympus\n").unwrap();
        assert!(matches!(
            config.time.zone(),
            Err(ConfigError::InvalidTimezone { .. })
        ));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = GatewatchConfig::default();
        config.apply_overrides(|name| match name {
            "OFFLINE_TIMEOUT" => Some(String::from("30")),
            "SWEEP_INTERVAL" => Some(String::from("7")),
            "GATEWATCH_TIMEZONE" => Some(String::from("Asia/Tokyo")),
            _ => None,
        });
        assert_eq!(config.liveness.offline_timeout_seconds, 30);
        assert_eq!(config.liveness.sweep_interval_seconds, 7);
        assert_eq!(config.time.timezone, "Asia/Tokyo");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn unparseable_env_values_are_ignored() {
        let mut config = GatewatchConfig::default();
        config.apply_overrides(|name| {
            (name == "OFFLINE_TIMEOUT").then(|| String::from("soon"))
        });
        assert_eq!(config.liveness.offline_timeout_seconds, 8);
    }
}
