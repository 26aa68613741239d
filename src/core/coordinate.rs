//! Degrees/minutes/seconds rendering of raw NMEA coordinates

/// Convert a raw NMEA `ddmm.mmmm` / `dddmm.mmmm` value into a DMS display string.
///
/// The value is split as
///
/// ```text
/// degrees   = floor(raw / 100)
/// remainder = (raw / 100 - degrees) / 0.60
/// minutes   = floor(remainder * 60)
/// seconds   = (remainder * 60 - minutes) * 60
/// ```
///
/// and rendered as `51° 44' 23.1" ` (seconds to one decimal, trailing space kept
/// for compatibility with existing displays).
///
/// Seconds are rounded from the exact binary value of the `f64`, so a value
/// whose shortest decimal form ends in exactly `5` at the second decimal
/// (e.g. `2.25`) can round down where a HALF_UP decimal formatter would
/// round up.
pub fn to_dms(raw: f64) -> String {
    let deg_value = raw / 100.0;
    let degrees = deg_value.floor();
    let remainder = (deg_value - degrees) / 0.60;
    let minute_value = remainder * 60.0;
    let minutes = minute_value.floor();
    let seconds = (minute_value - minutes) * 60.0;

    format!("{}\u{00B0} {}' {:.1}\" ", degrees as i64, minutes as i64, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dms_reference_value() {
        assert_eq!(to_dms(5144.3855), "51\u{00B0} 44' 23.1\" ");
    }

    #[test]
    fn test_dms_gga_latitude() {
        assert_eq!(to_dms(4807.038), "48\u{00B0} 7' 2.3\" ");
    }

    #[test]
    fn test_dms_keeps_trailing_space() {
        let text = to_dms(5144.3855);
        assert!(text.ends_with("\" "));
        assert!(text.contains('\u{00B0}'));
    }

    #[test]
    fn test_dms_whole_degrees() {
        assert_eq!(to_dms(4500.0), "45\u{00B0} 0' 0.0\" ");
    }

    #[test]
    fn test_dms_is_deterministic() {
        assert_eq!(to_dms(1131.0), to_dms(1131.0));
    }
}
