//! Comma-delimited field splitting

/// Split `body` into the fields that end with a comma.
///
/// Fields are neither trimmed nor dropped when empty. Only text that is
/// followed by a comma is captured, so the segment after the last comma is
/// not part of the result and the field count equals the comma count.
pub fn split_fields(body: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;

    while let Some(offset) = body[start..].find(',') {
        let end = start + offset;
        fields.push(&body[start..end]);
        start = end + 1;
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_segment_dropped() {
        assert_eq!(split_fields("a,b,c"), vec!["a", "b"]);
        assert_eq!(split_fields("a,b,c,"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_fields_kept() {
        assert_eq!(split_fields(",,x,,"), vec!["", "", "x", ""]);
    }

    #[test]
    fn test_no_commas() {
        assert!(split_fields("").is_empty());
        assert!(split_fields("abc").is_empty());
    }

    #[test]
    fn test_fields_not_trimmed() {
        assert_eq!(split_fields(" a , b ,"), vec![" a ", " b "]);
    }

    #[test]
    fn test_count_matches_commas() {
        let body = "123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";
        let fields = split_fields(body);
        assert_eq!(fields.len(), body.matches(',').count());
        assert_eq!(fields[1], "4807.038");
        assert_eq!(fields[8], "545.4");
    }

    #[test]
    fn test_each_call_is_independent() {
        let first = split_fields("1,2,3,");
        let second = split_fields("x,");
        assert_eq!(first.len(), 3);
        assert_eq!(second, vec!["x"]);
    }
}
