//! Transport error types

use std::fmt;
use std::io;

/// Failure of the underlying line transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The stream ended; no further lines will arrive
    EndOfStream,
    /// Timeout waiting for data
    Timeout { timeout_ms: u32 },
    /// Connection to the receiver failed or was lost
    ConnectionLost { port: String },
    /// Any other I/O failure
    Io { kind: io::ErrorKind, message: String },
    /// Transport could not be set up with the given parameter
    ConfigurationError { parameter: String, value: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::EndOfStream => {
                write!(f, "End of input stream")
            }
            TransportError::Timeout { timeout_ms } => {
                write!(f, "Read timeout after {}ms", timeout_ms)
            }
            TransportError::ConnectionLost { port } => {
                write!(f, "Connection lost on {}", port)
            }
            TransportError::Io { kind, message } => {
                write!(f, "I/O error ({:?}): {}", kind, message)
            }
            TransportError::ConfigurationError { parameter, value } => {
                write!(f, "Configuration error: invalid {} = {}", parameter, value)
            }
        }
    }
}

impl std::error::Error for TransportError {}

impl From<io::Error> for TransportError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => TransportError::EndOfStream,
            kind => TransportError::Io {
                kind,
                message: error.to_string(),
            },
        }
    }
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

impl TransportError {
    /// Whether the transport can never produce another line
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransportError::EndOfStream
                | TransportError::ConnectionLost { .. }
                | TransportError::ConfigurationError { .. }
        )
    }
}
