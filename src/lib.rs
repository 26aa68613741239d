//! GGA Position Reader
//!
//! Decodes NMEA 0183 GGA sentences from a GPS receiver's line stream into
//! position records, with checksum validation, sentence filtering and
//! retry on malformed data.

pub mod core;
pub mod processing;
pub mod utils;
pub mod hardware;
pub mod api;

// Re-export commonly used types
pub use crate::core::{Position, to_dms, POSITION_TAG};
pub use hardware::{
    LineSource, TransportConfig, InterfaceType, TransportError, TransportResult,
    ReaderLineSource, SerialLineSource, MockLineSource, open_source,
};
pub use processing::{
    validate, split_fields, Sentence, SentenceReader, TagFilter, TransportErrorPolicy,
    PositionDecoder, DecodeError, DecodeResult, Rejection, DecoderStats,
    CancelSignal, CancellationToken,
};
pub use api::{
    BlockingGpsApi, ApiResult, ApiError, SystemState, OutputFormat,
    PositionFormatter, FormattedPosition, TextFormatter, JsonFormatter, CsvFormatter,
};
pub use utils::{GpsConfig, ConfigError, LogLevel, StderrLogger};
