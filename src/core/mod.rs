//! Core types and constants for the GPS position reader

pub mod types;
pub mod constants;
pub mod coordinate;

pub use types::*;
pub use constants::*;
pub use coordinate::to_dms;
