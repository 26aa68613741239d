//! Line framing over any buffered byte stream

use crate::hardware::{LineSource, TransportError, TransportResult};
use std::io::{BufRead, ErrorKind};

/// Frames lines out of a `BufRead` (stdin, a replay file, a serial port).
///
/// Bytes of a partially received line are kept across read timeouts so a
/// slow transport never splits a sentence.
pub struct ReaderLineSource<R: BufRead> {
    reader: R,
    name: String,
    pending: Vec<u8>,
    retry_on_timeout: bool,
    timeout_ms: u32,
}

impl<R: BufRead> ReaderLineSource<R> {
    /// Create a line source that reports timeouts as errors
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            pending: Vec::with_capacity(128),
            retry_on_timeout: false,
            timeout_ms: 0,
        }
    }

    /// Keep waiting through read timeouts instead of reporting them
    pub fn retry_on_timeout(mut self, retry: bool) -> Self {
        self.retry_on_timeout = retry;
        self
    }

    /// Timeout reported in `TransportError::Timeout`
    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn take_line(&mut self) -> String {
        while matches!(self.pending.last(), Some(b'\n') | Some(b'\r')) {
            self.pending.pop();
        }
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        line
    }
}

impl<R: BufRead> LineSource for ReaderLineSource<R> {
    fn next_line(&mut self) -> TransportResult<String> {
        loop {
            match self.reader.read_until(b'\n', &mut self.pending) {
                Ok(0) => {
                    // A final line without terminator is still a line
                    if self.pending.is_empty() {
                        return Err(TransportError::EndOfStream);
                    }
                    return Ok(self.take_line());
                }
                Ok(_) => {
                    if self.pending.last() == Some(&b'\n') {
                        return Ok(self.take_line());
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    if !self.retry_on_timeout {
                        return Err(TransportError::Timeout {
                            timeout_ms: self.timeout_ms,
                        });
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    #[test]
    fn test_strips_line_endings() {
        let input = Cursor::new("$GPGSV,1*00\r\n$GPGGA,2*00\nlast");
        let mut source = ReaderLineSource::new(input, "test");

        assert_eq!(source.next_line().unwrap(), "$GPGSV,1*00");
        assert_eq!(source.next_line().unwrap(), "$GPGGA,2*00");
        assert_eq!(source.next_line().unwrap(), "last");
        assert_eq!(source.next_line(), Err(TransportError::EndOfStream));
    }

    #[test]
    fn test_empty_lines_are_lines() {
        let mut source = ReaderLineSource::new(Cursor::new("\n\nx\n"), "test");
        assert_eq!(source.next_line().unwrap(), "");
        assert_eq!(source.next_line().unwrap(), "");
        assert_eq!(source.next_line().unwrap(), "x");
    }

    /// Reader that times out once in the middle of a line
    struct Stutter {
        chunks: Vec<io::Result<Vec<u8>>>,
    }

    impl Read for Stutter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            match self.chunks.remove(0) {
                Ok(bytes) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Err(e) => Err(e),
            }
        }
    }

    fn stutter() -> io::BufReader<Stutter> {
        io::BufReader::new(Stutter {
            chunks: vec![
                Ok(b"$GPGGA,12".to_vec()),
                Err(io::Error::new(ErrorKind::TimedOut, "timed out")),
                Ok(b"3519*00\r\n".to_vec()),
            ],
        })
    }

    #[test]
    fn test_partial_line_survives_timeout() {
        let mut source = ReaderLineSource::new(stutter(), "serial").retry_on_timeout(true);
        assert_eq!(source.next_line().unwrap(), "$GPGGA,123519*00");
    }

    #[test]
    fn test_timeout_reported_without_retry() {
        let mut source = ReaderLineSource::new(stutter(), "serial").with_timeout_ms(250);
        assert_eq!(source.next_line(), Err(TransportError::Timeout { timeout_ms: 250 }));
        // The partial bytes are still pending for the next call
        assert_eq!(source.next_line().unwrap(), "$GPGGA,123519*00");
    }
}
