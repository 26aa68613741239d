//! Validated sentences and the reader that produces them

use crate::core::{BODY_OFFSET, TAG_LEN};
use crate::hardware::{LineSource, TransportResult};
use crate::processing::checksum::validate;
use log::debug;
use std::fmt;

/// A line that passed framing and checksum validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    line: String,
    star: usize,
}

impl Sentence {
    /// Wrap `line` if it is a valid sentence
    pub fn parse(line: impl Into<String>) -> Option<Self> {
        let line = line.into();
        if !validate(&line) {
            return None;
        }
        let star = line.find('*')?;
        Some(Self { line, star })
    }

    /// The five characters following `$`, e.g. `GPGGA`
    pub fn tag(&self) -> &str {
        self.line.get(1..1 + TAG_LEN).unwrap_or("")
    }

    /// Text after the tag and its comma, up to (not including) the `*`
    pub fn body(&self) -> &str {
        if self.star < BODY_OFFSET {
            return "";
        }
        self.line.get(BODY_OFFSET..self.star).unwrap_or("")
    }

    /// The two checksum characters after `*`
    pub fn checksum_text(&self) -> &str {
        &self.line[self.star + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Pulls lines until one is a valid sentence.
///
/// Invalid lines are discarded silently. Transport errors are returned
/// to the caller as soon as they happen.
pub struct SentenceReader<S: LineSource> {
    source: S,
    discarded: u64,
}

impl<S: LineSource> SentenceReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            discarded: 0,
        }
    }

    /// Block until the next valid sentence arrives
    pub fn next_sentence(&mut self) -> TransportResult<Sentence> {
        loop {
            let line = self.source.next_line()?;
            match Sentence::parse(line) {
                Some(sentence) => return Ok(sentence),
                None => {
                    self.discarded += 1;
                    debug!("Discarding malformed line from {}", self.source.describe());
                }
            }
        }
    }

    /// Number of lines rejected by validation so far
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::sentence;
    use crate::hardware::{MockLineSource, TransportError};

    #[test]
    fn test_sentence_parts() {
        let s = Sentence::parse(sentence("GPGGA,123519,4807.038,N,")).unwrap();
        assert_eq!(s.tag(), "GPGGA");
        assert_eq!(s.body(), "123519,4807.038,N,");
        assert_eq!(s.checksum_text().len(), 2);
    }

    #[test]
    fn test_sentence_without_body() {
        let s = Sentence::parse("$GPGGA*56").unwrap();
        assert_eq!(s.tag(), "GPGGA");
        assert_eq!(s.body(), "");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(Sentence::parse("$GPGGA,1,2*00").is_none());
        assert!(Sentence::parse("garbage").is_none());
    }

    #[test]
    fn test_reader_skips_invalid_lines() {
        let good = sentence("GPGSA,A,3");
        let mut source = MockLineSource::new();
        source.add_line("");
        source.add_line("noise");
        source.add_line("$GPGGA,1,2*00");
        source.add_line(good.clone());

        let mut reader = SentenceReader::new(source);
        let s = reader.next_sentence().unwrap();

        assert_eq!(s.as_str(), good);
        assert_eq!(reader.discarded(), 3);
        assert_eq!(reader.source().lines_read(), 4);
    }

    #[test]
    fn test_reader_propagates_transport_error() {
        let mut source = MockLineSource::with_lines(["noise"]);
        source.add_error(TransportError::Timeout { timeout_ms: 10 });
        source.add_sentence("GPGGA,1");

        let mut reader = SentenceReader::new(source);
        assert_eq!(
            reader.next_sentence(),
            Err(TransportError::Timeout { timeout_ms: 10 })
        );
        assert_eq!(reader.next_sentence().unwrap().tag(), "GPGGA");
    }

    #[test]
    fn test_reader_end_of_stream() {
        let mut reader = SentenceReader::new(MockLineSource::new());
        assert_eq!(reader.next_sentence(), Err(TransportError::EndOfStream));
    }
}
