//! Utility modules for configuration and logging

pub mod config;
pub mod logging;

pub use config::{GpsConfig, ConfigError};
pub use logging::{LogLevel, StderrLogger};
