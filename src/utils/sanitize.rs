//! Sanitizing of free-text filter input.

use regex::Regex;
use std::sync::LazyLock;

static HTML_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Trims the input and strips anything that looks like an HTML tag.
///
/// ```ignore
/// assert_eq!(sanitize_string("  <b>Eng</b>ineering "), "Engineering");
/// ```
pub fn sanitize_string(input: &str) -> String {
    HTML_TAG_REGEX.replace_all(input.trim(), "").into_owned()
}

/// Escapes `LIKE`/`ILIKE` metacharacters so the input matches literally.
///
/// The escape character is a backslash; queries must use `ESCAPE '\'`.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Sanitizes free text and returns `None` when nothing meaningful is left.
pub fn non_empty_sanitized(input: Option<&str>) -> Option<String> {
    input
        .map(sanitize_string)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_string_strips_tags_and_trims() {
        assert_eq!(sanitize_string("  John  "), "John");
        assert_eq!(sanitize_string("<script>alert(1)</script>IT"), "alert(1)IT");
        assert_eq!(sanitize_string("<b>Eng</b>ineering"), "Engineering");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\dir"), "c:\\\\dir");
    }

    #[test]
    fn test_non_empty_sanitized() {
        assert_eq!(non_empty_sanitized(None), None);
        assert_eq!(non_empty_sanitized(Some("   ")), None);
        assert_eq!(non_empty_sanitized(Some("<br>")), None);
        assert_eq!(non_empty_sanitized(Some(" HR ")), Some("HR".to_string()));
    }
}
