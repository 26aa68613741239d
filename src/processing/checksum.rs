//! NMEA sentence framing and checksum validation

use crate::core::MIN_SENTENCE_LEN;

/// XOR of every byte strictly between the leading `$` and the first `*`.
///
/// Returns `None` when the line has no `$...*` framing.
pub fn checksum(line: &str) -> Option<u8> {
    let payload = line.strip_prefix('$')?;
    let star = payload.find('*')?;
    Some(xor_bytes(&payload.as_bytes()[..star]))
}

fn xor_bytes(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// Check that `line` is a well-formed, checksum-correct NMEA sentence.
///
/// A line is rejected when it is shorter than `$GPxxx*ss`, does not start
/// with `$`, has no `*`, does not carry exactly two characters after the
/// first `*`, or when those two characters do not match (case-insensitively)
/// the XOR of the bytes between `$` and `*`.
pub fn validate(line: &str) -> bool {
    if line.len() < MIN_SENTENCE_LEN || !line.starts_with('$') {
        return false;
    }

    let star = match line.find('*') {
        Some(star) => star,
        None => return false,
    };

    let received = &line[star + 1..];
    if received.len() != 2 {
        return false;
    }

    let calculated = format!("{:02x}", xor_bytes(&line.as_bytes()[1..star]));
    received.eq_ignore_ascii_case(&calculated)
}
