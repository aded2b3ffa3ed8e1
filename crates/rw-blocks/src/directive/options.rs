//! Directive option block parsing.
//!
//! Parses the `:key: value` lines between a directive's title line and its
//! content.

/// Parse a directive option block into ordered `(key, value)` pairs.
///
/// Each non-blank line is trimmed, its leading marker character dropped, and
/// the remainder split at the first colon. Keys are kept as written, values
/// are trimmed. Duplicate keys are preserved in source order. Lines without a
/// colon are skipped.
///
/// # Example
///
/// ```
/// use rw_blocks::directive::parse_options;
///
/// let options = parse_options(":class: tip\n\n:class: wide\n:width:   80%");
/// assert_eq!(
///     options,
///     vec![
///         ("class".to_owned(), "tip".to_owned()),
///         ("class".to_owned(), "wide".to_owned()),
///         ("width".to_owned(), "80%".to_owned()),
///     ]
/// );
/// ```
#[must_use]
pub fn parse_options(text: &str) -> Vec<(String, String)> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    text.split('\n')
        .filter_map(|line| {
            let line = line.trim();
            let mut chars = line.chars();
            chars.next()?;
            let line = chars.as_str();
            if line.is_empty() {
                return None;
            }

            let Some((key, value)) = line.split_once(':') else {
                tracing::debug!(line, "Skipping directive option line without a colon");
                return None;
            };
            Some((key.to_owned(), value.trim().to_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_owned(), value.to_owned())
    }

    #[test]
    fn test_empty_block() {
        assert!(parse_options("").is_empty());
        assert!(parse_options("  \n\n \t").is_empty());
    }

    #[test]
    fn test_single_option() {
        assert_eq!(parse_options(":class: note"), vec![pair("class", "note")]);
    }

    #[test]
    fn test_indented_option_lines() {
        let options = parse_options("   :class: a\n   :name: b\n");
        assert_eq!(options, vec![pair("class", "a"), pair("name", "b")]);
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let options = parse_options(":target: https://example.com:8080/x");
        assert_eq!(options, vec![pair("target", "https://example.com:8080/x")]);
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(parse_options(":open:"), vec![pair("open", "")]);
    }

    #[test]
    fn test_key_not_trimmed_beyond_outer_strip() {
        assert_eq!(parse_options(":key : v"), vec![pair("key ", "v")]);
    }

    #[test]
    fn test_duplicates_preserved_in_order() {
        let options = parse_options(":a: 1\n:b: 2\n:a: 3");
        assert_eq!(options, vec![pair("a", "1"), pair("b", "2"), pair("a", "3")]);
    }

    #[test]
    fn test_line_without_colon_is_skipped() {
        let options = parse_options(":a: 1\n:malformed\n:b: 2");
        assert_eq!(options, vec![pair("a", "1"), pair("b", "2")]);
    }

    #[test]
    fn test_marker_only_line_is_skipped() {
        assert_eq!(parse_options(":\n:a: 1"), vec![pair("a", "1")]);
    }

    #[test]
    fn test_multibyte_marker_is_dropped_whole() {
        assert_eq!(parse_options("·a: 1"), vec![pair("a", "1")]);
    }
}
