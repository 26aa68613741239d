//! Line source capability trait

use crate::hardware::{TransportError, TransportResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Anything that can hand out NMEA text one line at a time.
///
/// Implementations block until a full line is available. Line terminators
/// (`\r\n` or `\n`) are stripped. Any I/O failure, including the end of the
/// stream, is reported as an error.
pub trait LineSource {
    /// Read the next line from the transport
    fn next_line(&mut self) -> TransportResult<String>;

    /// Short human-readable name of the transport, used in log messages
    fn describe(&self) -> String {
        "line source".to_string()
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> TransportResult<String> {
        (**self).next_line()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Transport parameters for the GPS receiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Which kind of transport to open
    pub interface: InterfaceType,
    /// Serial device path
    pub port_name: String,
    /// Serial line speed
    pub baud_rate: u32,
    /// Serial data bits (7 or 8)
    pub data_bits: u8,
    /// Timeout for a single serial read (milliseconds)
    pub read_timeout_ms: u32,
    /// File of recorded sentences for `InterfaceType::Replay`
    pub replay_path: Option<PathBuf>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            interface: InterfaceType::Serial,
            port_name: "/dev/ttyS0".to_string(),
            baud_rate: 9600,
            data_bits: 8,
            read_timeout_ms: 1000,
            replay_path: None,
        }
    }
}

/// Transport kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceType {
    /// Serial/UART device
    Serial,
    /// Standard input
    Stdin,
    /// Recorded NMEA log file
    Replay,
}

impl InterfaceType {
    /// Whether the transport runs out of input (a file or a pipe) rather than
    /// streaming until the device goes away
    pub fn is_finite(&self) -> bool {
        matches!(self, InterfaceType::Stdin | InterfaceType::Replay)
    }
}

impl TransportConfig {
    pub fn serial(port_name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            interface: InterfaceType::Serial,
            port_name: port_name.into(),
            baud_rate,
            ..Default::default()
        }
    }

    pub fn stdin() -> Self {
        Self {
            interface: InterfaceType::Stdin,
            ..Default::default()
        }
    }

    pub fn replay(path: impl Into<PathBuf>) -> Self {
        Self {
            interface: InterfaceType::Replay,
            replay_path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> TransportResult<()> {
        match self.interface {
            InterfaceType::Serial => {
                if self.port_name.is_empty() {
                    return Err(TransportError::ConfigurationError {
                        parameter: "port_name".to_string(),
                        value: String::new(),
                    });
                }
                if self.baud_rate == 0 {
                    return Err(TransportError::ConfigurationError {
                        parameter: "baud_rate".to_string(),
                        value: self.baud_rate.to_string(),
                    });
                }
                if !(7..=8).contains(&self.data_bits) {
                    return Err(TransportError::ConfigurationError {
                        parameter: "data_bits".to_string(),
                        value: self.data_bits.to_string(),
                    });
                }
            }
            InterfaceType::Replay => {
                if self.replay_path.is_none() {
                    return Err(TransportError::ConfigurationError {
                        parameter: "replay_path".to_string(),
                        value: "None".to_string(),
                    });
                }
            }
            InterfaceType::Stdin => {}
        }

        Ok(())
    }
}
