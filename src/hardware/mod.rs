//! Hardware abstraction layer for the GPS receiver transport
//!
//! This module provides the `LineSource` capability and its adapters:
//! serial ports, arbitrary byte streams (stdin, replay files) and a mock
//! source for tests.

pub mod source;
pub mod stream;
pub mod serial;
pub mod mock;
pub mod error;

pub use source::{LineSource, TransportConfig, InterfaceType};
pub use stream::ReaderLineSource;
pub use serial::SerialLineSource;
pub use mock::MockLineSource;
pub use error::{TransportError, TransportResult};

use std::fs::File;
use std::io::{self, BufReader};

/// Open the transport described by `config`
pub fn open_source(config: &TransportConfig) -> TransportResult<Box<dyn LineSource>> {
    config.validate()?;

    match config.interface {
        InterfaceType::Serial => Ok(Box::new(SerialLineSource::open(config)?)),
        InterfaceType::Stdin => Ok(Box::new(ReaderLineSource::new(
            io::stdin().lock(),
            "stdin",
        ))),
        InterfaceType::Replay => {
            let path = config.replay_path.as_ref().ok_or_else(|| {
                TransportError::ConfigurationError {
                    parameter: "replay_path".to_string(),
                    value: "None".to_string(),
                }
            })?;
            let file = File::open(path)?;
            Ok(Box::new(ReaderLineSource::new(
                BufReader::new(file),
                path.display().to_string(),
            )))
        }
    }
}
