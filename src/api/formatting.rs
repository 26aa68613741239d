//! Position output formatting and serialization
//!
//! Text output is the four-line `Position::render` summary. JSON and CSV
//! carry both the raw NMEA coordinates and their DMS rendering.

use crate::api::types::OutputFormat;
use crate::core::Position;
use serde::{Deserialize, Serialize};

/// A position ready for output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedPosition {
    /// Reading number within the session
    pub sequence_number: u32,
    /// Seconds since epoch at decode time
    pub timestamp: u64,
    pub latitude: CoordinateText,
    pub longitude: CoordinateText,
    /// Meters above mean sea level
    pub altitude_m: f64,
}

/// Raw NMEA coordinate with its DMS rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateText {
    pub raw: f64,
    pub direction: char,
    pub dms: String,
}

/// Builds `FormattedPosition` values
#[derive(Debug, Clone, Default)]
pub struct PositionFormatter {
    /// Default output format
    pub default_format: OutputFormat,
}

impl PositionFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.default_format = format;
        self
    }

    pub fn format(&self, position: &Position, sequence_number: u32) -> FormattedPosition {
        FormattedPosition {
            sequence_number,
            timestamp: position.timestamp(),
            latitude: CoordinateText {
                raw: position.latitude(),
                direction: position.latitude_direction(),
                dms: position.latitude_dms(),
            },
            longitude: CoordinateText {
                raw: position.longitude(),
                direction: position.longitude_direction(),
                dms: position.longitude_dms(),
            },
            altitude_m: position.altitude(),
        }
    }

    /// Render in the default format, with a CSV header when `first` is set
    pub fn render(
        &self,
        position: &Position,
        sequence_number: u32,
        first: bool,
    ) -> Result<String, serde_json::Error> {
        match self.default_format {
            OutputFormat::Text => Ok(TextFormatter::new().format_text(position)),
            OutputFormat::Json => {
                JsonFormatter::new().format_json(&self.format(position, sequence_number))
            }
            OutputFormat::Csv => {
                let csv = CsvFormatter { include_header: first };
                let row = csv.format_csv(&self.format(position, sequence_number));
                if first {
                    Ok(format!("{}\n{}", csv.header(), row))
                } else {
                    Ok(row)
                }
            }
        }
    }
}

/// Human-readable text formatter
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    /// Single line instead of the four-line summary
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { compact: true }
    }

    pub fn format_text(&self, position: &Position) -> String {
        if self.compact {
            format!(
                "{} | {}{} | {}{} | {:.2} m",
                position.timestamp(),
                position.latitude_dms(),
                position.latitude_direction(),
                position.longitude_dms(),
                position.longitude_direction(),
                position.altitude(),
            )
        } else {
            position.render()
        }
    }
}

/// JSON formatter for structured output
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Pretty print JSON
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, formatted: &FormattedPosition) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(formatted)
        } else {
            serde_json::to_string(formatted)
        }
    }
}

/// CSV formatter for data logging
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Include header row
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> String {
        "sequence,timestamp,latitude,latitude_direction,longitude,longitude_direction,altitude".to_string()
    }

    pub fn format_csv(&self, formatted: &FormattedPosition) -> String {
        format!(
            "{},{},{},{},{},{},{:.2}",
            formatted.sequence_number,
            formatted.timestamp,
            formatted.latitude.raw,
            formatted.latitude.direction,
            formatted.longitude.raw,
            formatted.longitude.direction,
            formatted.altitude_m,
        )
    }
}
