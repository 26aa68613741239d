use crate::api::types::OutputFormat;
use crate::core::{POSITION_TAG, TAG_LEN};
use crate::hardware::TransportConfig;
use crate::processing::TransportErrorPolicy;
use crate::utils::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Reader configuration, stored as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpsConfig {
    /// How to reach the receiver
    pub transport: TransportConfig,
    /// Sentence tag to decode
    pub position_tag: String,
    /// Whether transport failures end a decode or are retried
    pub transport_error_policy: TransportErrorPolicy,
    /// Delay between readings (milliseconds)
    pub poll_interval_ms: u64,
    /// Number of readings to take; `None` runs until stopped
    pub readings: Option<u32>,
    /// Output format for each reading
    pub output_format: OutputFormat,
    /// Diagnostic verbosity
    pub log_level: LogLevel,
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            position_tag: POSITION_TAG.to_string(),
            transport_error_policy: TransportErrorPolicy::Absorb,
            poll_interval_ms: 1000,
            readings: None,
            output_format: OutputFormat::Text,
            log_level: LogLevel::Info,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

impl GpsConfig {
    /// Load and validate a configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path)
            .map_err(|e| ConfigError::IoError {
                message: format!("Failed to read config file '{}': {}", path_str, e),
            })?;

        let config: GpsConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Transport error policy the session actually runs with.
    ///
    /// End of input on stdin or a replay file is permanent, so those
    /// interfaces always propagate transport failures.
    pub fn effective_error_policy(&self) -> TransportErrorPolicy {
        if self.transport.interface.is_finite() {
            TransportErrorPolicy::Propagate
        } else {
            self.transport_error_policy
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content)
            .map_err(|e| ConfigError::IoError {
                message: format!("Failed to write config file '{}': {}", path_str, e),
            })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.position_tag.len() != TAG_LEN || !self.position_tag.is_ascii() {
            return Err(ConfigError::InvalidParameter {
                parameter: "position_tag".to_string(),
                value: self.position_tag.clone(),
                reason: format!("must be {} ASCII characters", TAG_LEN),
            });
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "poll_interval_ms".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        self.transport.validate().map_err(|e| ConfigError::InvalidParameter {
            parameter: "transport".to_string(),
            value: format!("{:?}", self.transport.interface),
            reason: e.to_string(),
        })
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "Invalid parameter '{}' = '{}': {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => {
                write!(f, "I/O error: {}", message)
            }
            ConfigError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::InterfaceType;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = GpsConfig::default();
        assert_eq!(config.position_tag, "GPGGA");
        assert_eq!(config.transport.baud_rate, 9600);
        assert_eq!(config.transport_error_policy, TransportErrorPolicy::Absorb);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_finite_interfaces_propagate_transport_errors() {
        let mut config = GpsConfig::default();
        assert_eq!(config.effective_error_policy(), TransportErrorPolicy::Absorb);

        config.transport.interface = InterfaceType::Stdin;
        assert_eq!(config.effective_error_policy(), TransportErrorPolicy::Propagate);

        config.transport.interface = InterfaceType::Replay;
        assert_eq!(config.effective_error_policy(), TransportErrorPolicy::Propagate);
        assert_eq!(config.transport_error_policy, TransportErrorPolicy::Absorb);
    }

    #[test]
    fn test_invalid_tag() {
        let config = GpsConfig {
            position_tag: "GGA".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_invalid_transport() {
        let mut config = GpsConfig::default();
        config.transport.interface = InterfaceType::Replay;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: GpsConfig = serde_json::from_str(
            r#"{ "transport": { "port_name": "/dev/ttyAMA0" }, "output_format": "json" }"#,
        )
        .unwrap();

        assert_eq!(config.transport.port_name, "/dev/ttyAMA0");
        assert_eq!(config.transport.baud_rate, 9600);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn test_config_serialization() {
        let config = GpsConfig {
            transport: TransportConfig::replay("track.nmea"),
            readings: Some(10),
            transport_error_policy: TransportErrorPolicy::Propagate,
            log_level: LogLevel::Debug,
            ..Default::default()
        };

        let temp_path = PathBuf::from("test_gps_config.json");
        config.save_to_file(&temp_path).unwrap();
        let loaded = GpsConfig::load_from_file(&temp_path).unwrap();

        assert_eq!(loaded, config);

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_missing_file() {
        let result = GpsConfig::load_from_file("no_such_config.json");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
