//! Gateway configuration
//!
//! Values are layered: built-in defaults, then an optional YAML file named by
//! `FLEET_CONFIG`, then individual environment overrides.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "FLEET_CONFIG";
pub const LISTEN_ADDR_VAR: &str = "FLEET_LISTEN_ADDR";
pub const LOG_FORMAT_VAR: &str = "FLEET_LOG_FORMAT";
pub const METRICS_VAR: &str = "FLEET_METRICS";
pub const MAX_BODY_BYTES_VAR: &str = "FLEET_MAX_BODY_BYTES";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Address the HTTP listener binds to
    pub listen_addr: SocketAddr,
    pub log_format: LogFormat,
    /// Serve `/metrics` and record Prometheus series
    pub metrics_enabled: bool,
    /// Largest accepted request body; bigger bodies get 413
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: ([0, 0, 0, 0], 8080).into(),
            log_format: LogFormat::Text,
            metrics_enabled: true,
            max_body_bytes: fleet_http::MAX_BODY_BYTES,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|var| std::env::var(var).ok())
    }

    /// Load configuration using `lookup` to read variables
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                let contents = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                Self::from_yaml(&contents)?
            }
            None => Self::default(),
        };

        if let Some(value) = lookup(LISTEN_ADDR_VAR) {
            config.listen_addr = value.parse().map_err(|_| ConfigError::InvalidValue {
                var: LISTEN_ADDR_VAR,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(LOG_FORMAT_VAR) {
            config.log_format = match value.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: LOG_FORMAT_VAR,
                        value,
                    })
                }
            };
        }

        if let Some(value) = lookup(METRICS_VAR) {
            config.metrics_enabled = match value.to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: METRICS_VAR,
                        value,
                    })
                }
            };
        }

        if let Some(value) = lookup(MAX_BODY_BYTES_VAR) {
            config.max_body_bytes = match value.parse() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: MAX_BODY_BYTES_VAR,
                        value,
                    })
                }
            };
        }

        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::load_from(lookup(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.listen_addr.port(), 8080);
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_env_overrides() {
        let config = GatewayConfig::load_from(lookup(&[
            (LISTEN_ADDR_VAR, "127.0.0.1:9000"),
            (LOG_FORMAT_VAR, "JSON"),
            (METRICS_VAR, "false"),
        ]))
        .unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn test_invalid_env_value() {
        let err = GatewayConfig::load_from(lookup(&[(LISTEN_ADDR_VAR, "not-an-addr")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: LISTEN_ADDR_VAR, .. }));

        let err = GatewayConfig::load_from(lookup(&[(METRICS_VAR, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: METRICS_VAR, .. }));
    }

    #[test]
    fn test_body_limit() {
        assert_eq!(GatewayConfig::default().max_body_bytes, 64 * 1024);

        let config = GatewayConfig::load_from(lookup(&[(MAX_BODY_BYTES_VAR, "1024")])).unwrap();
        assert_eq!(config.max_body_bytes, 1024);

        let err = GatewayConfig::load_from(lookup(&[(MAX_BODY_BYTES_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: MAX_BODY_BYTES_VAR, .. }));

        let config = GatewayConfig::from_yaml("max_body_bytes: 2048\n").unwrap();
        assert_eq!(config.max_body_bytes, 2048);
    }

    #[test]
    fn test_yaml_partial() {
        let config = GatewayConfig::from_yaml("listen_addr: 127.0.0.1:7070\nlog_format: json\n").unwrap();
        assert_eq!(config.listen_addr.port(), 7070);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_yaml_rejects_unknown_format() {
        assert!(GatewayConfig::from_yaml("log_format: xml\n").is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let err = GatewayConfig::load_from(lookup(&[(CONFIG_PATH_VAR, "/nonexistent/fleet.yaml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
