//! Common API types and data structures

use crate::hardware::TransportError;
use crate::processing::{DecodeError, DecoderStats};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Decoding ended without a position
    Decode(DecodeError),
    /// Transport could not be opened
    Transport(TransportError),
    /// Output could not be produced
    Formatting { reason: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Decode(e) => write!(f, "{}", e),
            ApiError::Transport(e) => write!(f, "{}", e),
            ApiError::Formatting { reason } => write!(f, "Formatting error: {}", reason),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<DecodeError> for ApiError {
    fn from(error: DecodeError) -> Self {
        ApiError::Decode(error)
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        ApiError::Transport(error)
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Four-line human-readable summary
    Text,
    /// One JSON object per reading
    Json,
    /// One CSV row per reading
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text
    }
}

/// Session state information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    /// Timestamp of the last decoded position (seconds since epoch)
    pub last_position_time: Option<u64>,
    /// Sequence number of the last reading
    pub sequence_number: u32,
    /// Decoder counters
    pub decoder: DecoderStats,
    /// Lines dropped for bad framing or checksum
    pub discarded_lines: u64,
    /// Valid sentences dropped for carrying another tag
    pub skipped_sentences: u64,
    /// Session uptime (milliseconds)
    pub uptime_ms: u64,
}
