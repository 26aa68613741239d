//! Sentence type filtering

use crate::hardware::{LineSource, TransportResult};
use crate::processing::sentence::SentenceReader;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// What the tag filter does with a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportErrorPolicy {
    /// Report "no data" and let the caller retry
    Absorb,
    /// Hand the error to the caller
    Propagate,
}

impl Default for TransportErrorPolicy {
    fn default() -> Self {
        TransportErrorPolicy::Absorb
    }
}

/// Skips sentences until one with the requested tag arrives
pub struct TagFilter<S: LineSource> {
    reader: SentenceReader<S>,
    policy: TransportErrorPolicy,
    skipped: u64,
}

impl<S: LineSource> TagFilter<S> {
    pub fn new(reader: SentenceReader<S>) -> Self {
        Self {
            reader,
            policy: TransportErrorPolicy::default(),
            skipped: 0,
        }
    }

    pub fn with_policy(mut self, policy: TransportErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TransportErrorPolicy {
        self.policy
    }

    /// Return the body of the next sentence tagged `tag` (exact match).
    ///
    /// `Ok(None)` means no body could be read because the transport failed
    /// under `TransportErrorPolicy::Absorb`. Under `Propagate` the failure is
    /// returned as an error instead.
    pub fn read_body_for_tag(&mut self, tag: &str) -> TransportResult<Option<String>> {
        loop {
            let sentence = match self.reader.next_sentence() {
                Ok(sentence) => sentence,
                Err(e) => match self.policy {
                    TransportErrorPolicy::Absorb => {
                        if e.is_terminal() {
                            warn!("Transport failure while waiting for {}: {}", tag, e);
                        } else {
                            debug!("Transport failure while waiting for {}: {}", tag, e);
                        }
                        return Ok(None);
                    }
                    TransportErrorPolicy::Propagate => return Err(e),
                },
            };

            if sentence.tag() == tag {
                return Ok(Some(sentence.body().to_string()));
            }

            self.skipped += 1;
            trace!("Skipping {} sentence", sentence.tag());
        }
    }

    /// Number of valid sentences skipped for having another tag
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn reader(&self) -> &SentenceReader<S> {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut SentenceReader<S> {
        &mut self.reader
    }

    pub fn into_reader(self) -> SentenceReader<S> {
        self.reader
    }
}
