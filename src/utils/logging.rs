//! Stderr backend for the `log` facade

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging
    None,
    /// Error messages only
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and info messages
    Info,
    /// Adds discarded sentences and transport retries
    Debug,
    /// Everything, including skipped sentence tags
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::None => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Writes `LEVEL target: message` lines to stderr
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level: level.to_level_filter(),
        }
    }

    /// Install as the global logger
    pub fn init(level: LogLevel) -> Result<(), SetLoggerError> {
        let logger = Self::new(level);
        let filter = logger.level;
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(filter);
        Ok(())
    }

    fn format_record(record: &Record) -> String {
        format!("{:<5} {}: {}", record.level(), record.target(), record.args())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(std::io::stderr(), "{}", Self::format_record(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_level_filtering() {
        let logger = StderrLogger::new(LogLevel::Warn);
        let warn = Metadata::builder().level(Level::Warn).build();
        let debug = Metadata::builder().level(Level::Debug).build();

        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&debug));
    }

    #[test]
    fn test_none_disables_everything() {
        let logger = StderrLogger::new(LogLevel::None);
        let error = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&error));
    }

    #[test]
    fn test_record_format() {
        assert_eq!(
            StderrLogger::format_record(
                &Record::builder()
                    .level(Level::Warn)
                    .target("gga_position::processing::decoder")
                    .args(format_args!("Corrupt position data"))
                    .build()
            ),
            "WARN  gga_position::processing::decoder: Corrupt position data"
        );
    }
}
