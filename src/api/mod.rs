//! Caller-facing API
//!
//! A blocking session object over one receiver plus text, JSON and CSV
//! output formatters.

pub mod blocking;
pub mod types;
pub mod formatting;

pub use types::{ApiResult, ApiError, SystemState, OutputFormat};
pub use blocking::BlockingGpsApi;
pub use formatting::{
    PositionFormatter, FormattedPosition, CoordinateText, TextFormatter, JsonFormatter, CsvFormatter,
};
