//! Serial/UART transport for the GPS receiver

use crate::hardware::{
    LineSource, ReaderLineSource, TransportConfig, TransportError, TransportResult,
};
use log::info;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::BufReader;
use std::time::Duration;

/// GPS receiver attached to a serial port.
///
/// Read timeouts are absorbed while waiting for the rest of a line, so
/// `next_line` only fails when the port itself fails.
pub struct SerialLineSource {
    port_name: String,
    lines: ReaderLineSource<BufReader<Box<dyn SerialPort>>>,
}

impl SerialLineSource {
    /// Open the serial port described by `config`
    pub fn open(config: &TransportConfig) -> TransportResult<Self> {
        config.validate()?;

        let port = serialport::new(config.port_name.as_str(), config.baud_rate)
            .data_bits(data_bits(config.data_bits)?)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(config.read_timeout_ms as u64))
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => TransportError::ConnectionLost {
                    port: config.port_name.clone(),
                },
                serialport::ErrorKind::InvalidInput => TransportError::ConfigurationError {
                    parameter: "port_name".to_string(),
                    value: config.port_name.clone(),
                },
                serialport::ErrorKind::Io(kind) => TransportError::Io {
                    kind,
                    message: e.description,
                },
                serialport::ErrorKind::Unknown => TransportError::Io {
                    kind: std::io::ErrorKind::Other,
                    message: e.description,
                },
            })?;

        info!(
            "GPS receiver ready on {} at {} baud",
            config.port_name, config.baud_rate
        );

        let lines = ReaderLineSource::new(BufReader::new(port), config.port_name.clone())
            .retry_on_timeout(true)
            .with_timeout_ms(config.read_timeout_ms);

        Ok(Self {
            port_name: config.port_name.clone(),
            lines,
        })
    }
}

impl LineSource for SerialLineSource {
    fn next_line(&mut self) -> TransportResult<String> {
        self.lines.next_line().map_err(|e| match e {
            TransportError::Io { kind, .. } if kind == std::io::ErrorKind::BrokenPipe => {
                TransportError::ConnectionLost {
                    port: self.port_name.clone(),
                }
            }
            other => other,
        })
    }

    fn describe(&self) -> String {
        format!("serial {}", self.port_name)
    }
}

fn data_bits(bits: u8) -> TransportResult<DataBits> {
    match bits {
        5 => Ok(DataBits::Five),
        6 => Ok(DataBits::Six),
        7 => Ok(DataBits::Seven),
        8 => Ok(DataBits::Eight),
        other => Err(TransportError::ConfigurationError {
            parameter: "data_bits".to_string(),
            value: other.to_string(),
        }),
    }
}
