//! Mock line source for testing and development

use crate::hardware::{LineSource, TransportError, TransportResult};
use std::collections::VecDeque;

/// Line source fed with canned sentences
pub struct MockLineSource {
    queue: VecDeque<TransportResult<String>>,
    connected: bool,
    lines_read: usize,
}

impl MockLineSource {
    /// Create an empty mock source
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            connected: true,
            lines_read: 0,
        }
    }

    /// Create a mock source preloaded with lines
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut source = Self::new();
        for line in lines {
            source.add_line(line);
        }
        source
    }

    /// Queue a raw line exactly as given
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.queue.push_back(Ok(line.into()));
    }

    /// Queue a sentence built from `payload` (text between `$` and `*`)
    /// with a correct checksum appended
    pub fn add_sentence(&mut self, payload: &str) {
        self.add_line(sentence(payload));
    }

    /// Queue a transport failure to be returned in order with the lines
    pub fn add_error(&mut self, error: TransportError) {
        self.queue.push_back(Err(error));
    }

    /// Simulate connection loss
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Restore connection
    pub fn reconnect(&mut self) {
        self.connected = true;
    }

    /// Number of lines handed out so far
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Number of queued lines and errors not yet consumed
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl Default for MockLineSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for MockLineSource {
    fn next_line(&mut self) -> TransportResult<String> {
        if !self.connected {
            return Err(TransportError::ConnectionLost {
                port: "mock".to_string(),
            });
        }

        match self.queue.pop_front() {
            Some(Ok(line)) => {
                self.lines_read += 1;
                Ok(line)
            }
            Some(Err(e)) => Err(e),
            None => Err(TransportError::EndOfStream),
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// Build `$<payload>*<checksum>` with the checksum computed over `payload`
pub fn sentence(payload: &str) -> String {
    let checksum = payload.bytes().fold(0u8, |acc, b| acc ^ b);
    format!("${}*{:02X}", payload, checksum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_in_order() {
        let mut source = MockLineSource::with_lines(["a", "b"]);
        assert_eq!(source.remaining(), 2);

        assert_eq!(source.next_line().unwrap(), "a");
        assert_eq!(source.next_line().unwrap(), "b");
        assert_eq!(source.lines_read(), 2);
        assert_eq!(source.next_line(), Err(TransportError::EndOfStream));
    }

    #[test]
    fn test_sentence_checksum() {
        assert_eq!(sentence("GPGGA"), "$GPGGA*56");
    }

    #[test]
    fn test_queued_error() {
        let mut source = MockLineSource::new();
        source.add_error(TransportError::Timeout { timeout_ms: 5 });
        source.add_line("x");

        assert_eq!(source.next_line(), Err(TransportError::Timeout { timeout_ms: 5 }));
        assert_eq!(source.next_line().unwrap(), "x");
    }

    #[test]
    fn test_connection_simulation() {
        let mut source = MockLineSource::with_lines(["x"]);

        source.disconnect();
        assert!(matches!(
            source.next_line(),
            Err(TransportError::ConnectionLost { .. })
        ));
        assert_eq!(source.remaining(), 1);

        source.reconnect();
        assert_eq!(source.next_line().unwrap(), "x");
    }
}
