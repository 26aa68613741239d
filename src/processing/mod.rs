//! Sentence validation and position decoding pipeline

pub mod checksum;
pub mod sentence;
pub mod filter;
pub mod fields;
pub mod decoder;

pub use checksum::{checksum, validate};
pub use sentence::{Sentence, SentenceReader};
pub use filter::{TagFilter, TransportErrorPolicy};
pub use fields::split_fields;
pub use decoder::{
    PositionDecoder, DecodeError, DecodeResult, Rejection, DecoderStats,
    CancelSignal, CancellationToken, NeverCancel,
};
