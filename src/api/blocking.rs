//! Blocking API for reading positions
//!
//! Each call blocks the calling thread until the decoder produces a
//! position, the transport fails (under the propagate policy) or the
//! session's cancellation token is set.

use crate::api::formatting::{CsvFormatter, FormattedPosition, JsonFormatter, PositionFormatter, TextFormatter};
use crate::api::types::{ApiError, ApiResult, SystemState};
use crate::core::Position;
use crate::hardware::{open_source, LineSource, TransportError};
use crate::processing::{CancellationToken, DecodeError, PositionDecoder};
use crate::utils::GpsConfig;
use log::info;
use std::thread;
use std::time::{Duration, Instant};

/// Simple blocking API over one GPS receiver
pub struct BlockingGpsApi<S: LineSource> {
    decoder: PositionDecoder<S>,
    formatter: PositionFormatter,
    state: SystemState,
    cancel: CancellationToken,
    start_time: Instant,
}

impl BlockingGpsApi<Box<dyn LineSource>> {
    /// Open the transport named in `config` and build an API over it
    pub fn from_config(config: &GpsConfig) -> ApiResult<Self> {
        let source = open_source(&config.transport)?;
        info!("Reading {} sentences from {}", config.position_tag, source.describe());
        Ok(Self::new(source, config))
    }
}

impl<S: LineSource> BlockingGpsApi<S> {
    pub fn new(source: S, config: &GpsConfig) -> Self {
        let decoder = PositionDecoder::new(source)
            .with_tag(&config.position_tag)
            .with_policy(config.effective_error_policy());

        Self {
            decoder,
            formatter: PositionFormatter::new().with_format(config.output_format),
            state: SystemState::default(),
            cancel: CancellationToken::new(),
            start_time: Instant::now(),
        }
    }

    /// Token that stops a blocked `get_position` before its next attempt
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Block until the next position is decoded
    pub fn get_position(&mut self) -> ApiResult<Position> {
        let result = self.decoder.decode_with(&self.cancel);
        self.refresh_state();

        let position = result?;
        self.state.sequence_number += 1;
        self.state.last_position_time = Some(position.timestamp());
        Ok(position)
    }

    /// Next position with its sequence number and DMS rendering
    pub fn get_formatted_position(&mut self) -> ApiResult<FormattedPosition> {
        let position = self.get_position()?;
        Ok(self.formatter.format(&position, self.state.sequence_number))
    }

    /// Next position as the four-line text summary
    pub fn get_position_text(&mut self, compact: bool) -> ApiResult<String> {
        let position = self.get_position()?;
        let text_formatter = TextFormatter { compact };
        Ok(text_formatter.format_text(&position))
    }

    /// Next position as a JSON object
    pub fn get_position_json(&mut self, pretty: bool) -> ApiResult<String> {
        let formatted = self.get_formatted_position()?;
        let json_formatter = if pretty {
            JsonFormatter::pretty()
        } else {
            JsonFormatter::new()
        };
        json_formatter.format_json(&formatted).map_err(|e| ApiError::Formatting {
            reason: format!("JSON formatting error: {}", e),
        })
    }

    /// Next position as a CSV row
    pub fn get_position_csv(&mut self, include_header: bool) -> ApiResult<String> {
        let formatted = self.get_formatted_position()?;
        let csv_formatter = CsvFormatter { include_header };

        let mut result = String::new();
        if include_header {
            result.push_str(&csv_formatter.header());
            result.push('\n');
        }
        result.push_str(&csv_formatter.format_csv(&formatted));

        Ok(result)
    }

    /// Next position in the configured output format
    pub fn read_output(&mut self) -> ApiResult<String> {
        let position = self.get_position()?;
        let first = self.state.sequence_number == 1;
        self.formatter
            .render(&position, self.state.sequence_number, first)
            .map_err(|e| ApiError::Formatting {
                reason: format!("JSON formatting error: {}", e),
            })
    }

    /// Next reading in the configured format, or `None` once the source is exhausted
    pub fn next_output(&mut self) -> ApiResult<Option<String>> {
        match self.read_output() {
            Ok(output) => Ok(Some(output)),
            Err(ApiError::Decode(DecodeError::Transport(TransportError::EndOfStream))) => {
                info!("End of input after {} readings", self.state.sequence_number);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Take up to `readings` readings (`None` for no limit), pausing `interval`
    /// between them, and hand each one to `emit`.
    ///
    /// Stops early when the source runs out of input. Returns the number of
    /// readings taken.
    pub fn run<F: FnMut(&str)>(
        &mut self,
        readings: Option<u32>,
        interval: Duration,
        mut emit: F,
    ) -> ApiResult<u32> {
        let mut taken = 0u32;
        while readings.map_or(true, |limit| taken < limit) {
            if taken > 0 {
                thread::sleep(interval);
            }
            let Some(output) = self.next_output()? else {
                break;
            };
            emit(&output);
            taken += 1;
        }
        Ok(taken)
    }

    /// Get session state information
    pub fn get_system_state(&mut self) -> SystemState {
        self.refresh_state();
        self.state.clone()
    }

    /// Reset session statistics
    pub fn reset_statistics(&mut self) {
        self.decoder.reset_stats();
        self.state = SystemState::default();
        self.start_time = Instant::now();
    }

    pub fn into_source(self) -> S {
        self.decoder.into_source()
    }

    fn refresh_state(&mut self) {
        self.state.decoder = self.decoder.stats().clone();
        self.state.discarded_lines = self.decoder.discarded_lines();
        self.state.skipped_sentences = self.decoder.skipped_sentences();
        self.state.uptime_ms = self.start_time.elapsed().as_millis() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::OutputFormat;
    use crate::hardware::mock::sentence;
    use crate::hardware::{InterfaceType, MockLineSource, ReaderLineSource, TransportConfig};
    use crate::processing::TransportErrorPolicy;
    use std::io::Cursor;

    const GGA: &str = "GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";

    fn config() -> GpsConfig {
        GpsConfig {
            transport_error_policy: TransportErrorPolicy::Propagate,
            ..Default::default()
        }
    }

    fn source(count: usize) -> MockLineSource {
        let mut source = MockLineSource::new();
        for _ in 0..count {
            source.add_line("$GPGSV,garbage*00");
            source.add_sentence(GGA);
        }
        source
    }

    #[test]
    fn test_sequence_and_state() {
        let mut api = BlockingGpsApi::new(source(2), &config());

        api.get_position().unwrap();
        api.get_position().unwrap();
        let state = api.get_system_state();

        assert_eq!(state.sequence_number, 2);
        assert_eq!(state.decoder.positions, 2);
        assert_eq!(state.discarded_lines, 2);
        assert!(state.last_position_time.is_some());
    }

    #[test]
    fn test_transport_error_surfaces() {
        let mut api = BlockingGpsApi::new(source(0), &config());
        assert_eq!(
            api.get_position(),
            Err(ApiError::Decode(DecodeError::Transport(TransportError::EndOfStream)))
        );
    }

    #[test]
    fn test_cancelled_session() {
        let absorb = GpsConfig::default();
        let mut api = BlockingGpsApi::new(MockLineSource::new(), &absorb);
        api.cancellation_token().cancel();

        assert!(matches!(
            api.get_position(),
            Err(ApiError::Decode(DecodeError::Cancelled { .. }))
        ));
    }

    #[test]
    fn test_text_output() {
        let mut api = BlockingGpsApi::new(source(1), &config());
        let text = api.get_position_text(false).unwrap();

        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("Latitude: 48\u{00B0} 7' 2.3\" N"));
        assert!(text.ends_with("Altitude: 545.40 meters"));
    }

    #[test]
    fn test_json_output() {
        let mut api = BlockingGpsApi::new(source(1), &config());
        let json = api.get_position_json(false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["sequence_number"], 1);
        assert_eq!(value["longitude"]["direction"], "E");
    }

    #[test]
    fn test_csv_output() {
        let mut api = BlockingGpsApi::new(source(1), &config());
        let csv = api.get_position_csv(true).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_configured_output_format() {
        let config = GpsConfig {
            output_format: OutputFormat::Csv,
            ..config()
        };
        let mut api = BlockingGpsApi::new(source(2), &config);

        assert_eq!(api.read_output().unwrap().lines().count(), 2);
        assert_eq!(api.read_output().unwrap().lines().count(), 1);
    }

    fn replay_config() -> GpsConfig {
        GpsConfig {
            transport: TransportConfig {
                interface: InterfaceType::Replay,
                replay_path: Some("recorded.nmea".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn replay(text: String) -> ReaderLineSource<Cursor<Vec<u8>>> {
        ReaderLineSource::new(Cursor::new(text.into_bytes()), "recorded.nmea")
    }

    #[test]
    fn test_replay_stops_at_end_of_input() {
        let text = format!(
            "{}\r\n$GPGSV,garbage*00\r\n{}\r\n",
            sentence(GGA),
            sentence(GGA)
        );
        let mut api = BlockingGpsApi::new(replay(text), &replay_config());

        assert!(api.next_output().unwrap().is_some());
        assert!(api.next_output().unwrap().is_some());
        assert_eq!(api.next_output(), Ok(None));
        assert_eq!(api.get_system_state().sequence_number, 2);
    }

    #[test]
    fn test_replay_without_positions_ends() {
        let text = "$GPGSV,garbage*00\nnot nmea\n".to_string();
        let mut api = BlockingGpsApi::new(replay(text), &replay_config());

        assert_eq!(api.next_output(), Ok(None));
        assert_eq!(api.get_system_state().discarded_lines, 2);
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        let text = format!("{}\n{}\n", sentence(GGA), sentence(GGA));
        let mut api = BlockingGpsApi::new(replay(text), &replay_config());
        let mut outputs = Vec::new();

        let taken = api
            .run(Some(5), Duration::ZERO, |output| outputs.push(output.to_string()))
            .unwrap();

        assert_eq!(taken, 2);
        assert_eq!(outputs.len(), 2);
        assert!(outputs[0].starts_with("Timestamp: "));
    }

    #[test]
    fn test_run_pauses_only_between_readings() {
        let text = format!("{}\n{}\n{}\n", sentence(GGA), sentence(GGA), sentence(GGA));
        let mut api = BlockingGpsApi::new(replay(text), &replay_config());
        let interval = Duration::from_millis(150);

        let started = Instant::now();
        let taken = api.run(Some(2), interval, |_| {}).unwrap();
        let elapsed = started.elapsed();

        assert_eq!(taken, 2);
        assert!(elapsed >= interval);
        assert!(elapsed < interval * 2);
    }

    #[test]
    fn test_reset_statistics() {
        let mut api = BlockingGpsApi::new(source(1), &config());
        api.get_position().unwrap();
        api.reset_statistics();

        let state = api.get_system_state();
        assert_eq!(state.sequence_number, 0);
        assert_eq!(state.decoder.attempts, 0);
    }
}
