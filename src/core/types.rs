//! Core data types for the position reader

use crate::core::coordinate::to_dms;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded GPS position fix.
///
/// Coordinates are kept exactly as transmitted (`ddmm.mmmm` / `dddmm.mmmm`),
/// without conversion to decimal degrees. The timestamp is the wall clock at
/// the moment of decoding, not the fix time carried by the sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    timestamp: u64,
    latitude: f64,
    latitude_direction: char,
    longitude: f64,
    longitude_direction: char,
    altitude: f64,
}

impl Position {
    pub fn new(
        timestamp: u64,
        latitude: f64,
        latitude_direction: char,
        longitude: f64,
        longitude_direction: char,
        altitude: f64,
    ) -> Self {
        Self {
            timestamp,
            latitude,
            latitude_direction,
            longitude,
            longitude_direction,
            altitude,
        }
    }

    /// Seconds since the Unix epoch at which this position was decoded
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Raw latitude in `ddmm.mmmm` layout
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// `N` or `S`
    pub fn latitude_direction(&self) -> char {
        self.latitude_direction
    }

    /// Raw longitude in `dddmm.mmmm` layout
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// `E` or `W`
    pub fn longitude_direction(&self) -> char {
        self.longitude_direction
    }

    /// Meters above mean sea level
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn latitude_dms(&self) -> String {
        to_dms(self.latitude)
    }

    pub fn longitude_dms(&self) -> String {
        to_dms(self.longitude)
    }

    /// Four-line human-readable summary
    pub fn render(&self) -> String {
        format!(
            "Timestamp: {}\nLatitude: {}{}\nLongitude: {}{}\nAltitude: {:.2} meters",
            self.timestamp,
            self.latitude_dms(),
            self.latitude_direction,
            self.longitude_dms(),
            self.longitude_direction,
            self.altitude,
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
