//! NMEA sentence constants

/// Tag of the GPS position fix sentence (talker ID `GP` + `GGA`)
pub const POSITION_TAG: &str = "GPGGA";

/// Length of a sentence tag such as `GPGGA`
pub const TAG_LEN: usize = 5;

/// `$GPxxx*ss` is the shortest line that can carry a checksum
pub const MIN_SENTENCE_LEN: usize = 9;

/// Offset of the body inside a sentence: `$` + tag + `,`
pub const BODY_OFFSET: usize = 1 + TAG_LEN + 1;

/// A GGA body needs at least this many fields to be decoded
pub const MIN_POSITION_FIELDS: usize = 10;

// Field positions inside a GGA body (field 0 is the UTC time of fix)
pub const LATITUDE_FIELD: usize = 1;
pub const LATITUDE_DIRECTION_FIELD: usize = 2;
pub const LONGITUDE_FIELD: usize = 3;
pub const LONGITUDE_DIRECTION_FIELD: usize = 4;
pub const ALTITUDE_FIELD: usize = 8;
