//! GGA position decoding with retry

use crate::core::{
    Position, ALTITUDE_FIELD, LATITUDE_DIRECTION_FIELD, LATITUDE_FIELD,
    LONGITUDE_DIRECTION_FIELD, LONGITUDE_FIELD, MIN_POSITION_FIELDS, POSITION_TAG,
};
use crate::hardware::{LineSource, TransportError, TransportResult};
use crate::processing::fields::split_fields;
use crate::processing::filter::{TagFilter, TransportErrorPolicy};
use crate::processing::sentence::SentenceReader;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Why a single decode attempt produced no position
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The transport produced nothing usable
    NoData,
    /// The body contains the start of another sentence
    CorruptBody,
    /// Not enough fields to reach the altitude
    TooFewFields { count: usize, required: usize },
    /// A coordinate or altitude field is not a number
    InvalidNumber { field: &'static str, value: String },
    /// A hemisphere field is empty
    MissingDirection { field: &'static str },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoData => write!(f, "No position data received"),
            Rejection::CorruptBody => write!(f, "Corrupt position data"),
            Rejection::TooFewFields { count, required } => {
                write!(f, "Incorrect position field count: {} (need {})", count, required)
            }
            Rejection::InvalidNumber { field, value } => {
                write!(f, "Badly formatted {} number: '{}'", field, value)
            }
            Rejection::MissingDirection { field } => write!(f, "Missing {}", field),
        }
    }
}

/// Errors that end a decode call
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Transport failure, only under `TransportErrorPolicy::Propagate`
    Transport(TransportError),
    /// The cancel signal fired before a position was decoded
    Cancelled { attempts: u64 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Transport(e) => write!(f, "Transport failure: {}", e),
            DecodeError::Cancelled { attempts } => {
                write!(f, "Decoding cancelled after {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Transport(e) => Some(e),
            DecodeError::Cancelled { .. } => None,
        }
    }
}

impl From<TransportError> for DecodeError {
    fn from(error: TransportError) -> Self {
        DecodeError::Transport(error)
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Checked once before every decode attempt
pub trait CancelSignal {
    fn is_cancelled(&self) -> bool;
}

impl<F: Fn() -> bool> CancelSignal for F {
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Signal that never fires
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shareable cancel flag, e.g. set from a Ctrl-C handler or another thread
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Attempt and rejection counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecoderStats {
    pub attempts: u64,
    pub positions: u64,
    pub no_data: u64,
    pub corrupt: u64,
    pub too_few_fields: u64,
    pub invalid_numbers: u64,
    pub missing_directions: u64,
}

impl DecoderStats {
    fn record(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::NoData => self.no_data += 1,
            Rejection::CorruptBody => self.corrupt += 1,
            Rejection::TooFewFields { .. } => self.too_few_fields += 1,
            Rejection::InvalidNumber { .. } => self.invalid_numbers += 1,
            Rejection::MissingDirection { .. } => self.missing_directions += 1,
        }
    }

    /// Total attempts that ended in a rejection
    pub fn rejected(&self) -> u64 {
        self.no_data + self.corrupt + self.too_few_fields + self.invalid_numbers + self.missing_directions
    }
}

/// Reads GGA sentences until one decodes into a `Position`.
///
/// Every attempt reads one tagged body and either yields a position or a
/// `Rejection`. Rejections are logged and the next attempt starts from a
/// fresh read; there is no retry limit other than the cancel signal.
pub struct PositionDecoder<S: LineSource> {
    filter: TagFilter<S>,
    tag: String,
    corruption_marker: String,
    stats: DecoderStats,
    clock: fn() -> u64,
}

impl<S: LineSource> PositionDecoder<S> {
    /// Decoder for `GPGGA` sentences that absorbs transport failures
    pub fn new(source: S) -> Self {
        let mut decoder = Self {
            filter: TagFilter::new(SentenceReader::new(source)),
            tag: String::new(),
            corruption_marker: String::new(),
            stats: DecoderStats::default(),
            clock: unix_seconds,
        };
        decoder.set_tag(POSITION_TAG);
        decoder
    }

    /// Decode sentences with another tag, e.g. `GNGGA`
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.set_tag(tag);
        self
    }

    pub fn with_policy(mut self, policy: TransportErrorPolicy) -> Self {
        self.filter = self.filter.with_policy(policy);
        self
    }

    /// Replace the wall clock used for position timestamps
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    fn set_tag(&mut self, tag: &str) {
        self.tag = tag.to_string();
        let talker: String = tag.chars().take(2).collect();
        self.corruption_marker = format!("${}", talker);
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn stats(&self) -> &DecoderStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = DecoderStats::default();
    }

    /// Lines dropped for bad framing or checksum
    pub fn discarded_lines(&self) -> u64 {
        self.filter.reader().discarded()
    }

    /// Valid sentences dropped for carrying another tag
    pub fn skipped_sentences(&self) -> u64 {
        self.filter.skipped()
    }

    pub fn source_mut(&mut self) -> &mut S {
        self.filter.reader_mut().source_mut()
    }

    pub fn into_source(self) -> S {
        self.filter.into_reader().into_source()
    }

    /// Block until a position is decoded
    pub fn decode(&mut self) -> DecodeResult<Position> {
        self.decode_with(&NeverCancel)
    }

    /// Block until a position is decoded or `cancel` fires
    pub fn decode_with(&mut self, cancel: &dyn CancelSignal) -> DecodeResult<Position> {
        let mut attempts = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(DecodeError::Cancelled { attempts });
            }
            attempts += 1;
            self.stats.attempts += 1;

            match self.attempt()? {
                Ok(position) => {
                    self.stats.positions += 1;
                    return Ok(position);
                }
                Err(rejection) => {
                    warn!("{}", rejection);
                    self.stats.record(&rejection);
                }
            }
        }
    }

    /// One read-filter-split-decode pass
    fn attempt(&mut self) -> TransportResult<Result<Position, Rejection>> {
        let body = match self.filter.read_body_for_tag(&self.tag)? {
            Some(body) => body,
            None => return Ok(Err(Rejection::NoData)),
        };

        let timestamp = (self.clock)();
        Ok(decode_body(&body, &self.corruption_marker, timestamp))
    }
}

/// Decode a GGA body into a position stamped with `timestamp`.
///
/// `corruption_marker` (e.g. `$GP`) inside the body means two sentences ran
/// together on the wire.
pub fn decode_body(body: &str, corruption_marker: &str, timestamp: u64) -> Result<Position, Rejection> {
    if body.contains(corruption_marker) {
        return Err(Rejection::CorruptBody);
    }

    let fields = split_fields(body);
    if fields.len() < MIN_POSITION_FIELDS {
        return Err(Rejection::TooFewFields {
            count: fields.len(),
            required: MIN_POSITION_FIELDS,
        });
    }

    let latitude = parse_number("latitude", fields[LATITUDE_FIELD])?;
    let latitude_direction = parse_direction("latitude direction", fields[LATITUDE_DIRECTION_FIELD])?;
    let longitude = parse_number("longitude", fields[LONGITUDE_FIELD])?;
    let longitude_direction = parse_direction("longitude direction", fields[LONGITUDE_DIRECTION_FIELD])?;
    let altitude = parse_number("altitude", fields[ALTITUDE_FIELD])?;

    Ok(Position::new(
        timestamp,
        latitude,
        latitude_direction,
        longitude,
        longitude_direction,
        altitude,
    ))
}

fn parse_number(field: &'static str, text: &str) -> Result<f64, Rejection> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Rejection::InvalidNumber {
            field,
            value: text.to_string(),
        }),
    }
}

fn parse_direction(field: &'static str, text: &str) -> Result<char, Rejection> {
    text.chars()
        .next()
        .ok_or(Rejection::MissingDirection { field })
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
