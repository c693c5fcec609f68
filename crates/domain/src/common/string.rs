//! String helpers for node titles and search.

/// Converts a blank string to `None`, otherwise returns `Some(value)`.
///
/// Node payloads store missing titles as empty strings; display fallbacks
/// ("Act 2", "Act III") apply whenever the stored value is blank.
///
/// # Examples
///
/// ```
/// use bookforge_domain::common::none_if_blank;
///
/// assert_eq!(none_if_blank("Rising Action"), Some("Rising Action"));
/// assert_eq!(none_if_blank(""), None);
/// assert_eq!(none_if_blank("   "), None);
/// ```
pub fn none_if_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Case-insensitive substring test. An empty needle always matches.
///
/// # Examples
///
/// ```
/// use bookforge_domain::common::contains_ignore_case;
///
/// assert!(contains_ignore_case("The Forbidden Forest", "forest"));
/// assert!(!contains_ignore_case("Diagon Alley", "forest"));
/// ```
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_if_blank_with_content() {
        assert_eq!(none_if_blank("hello"), Some("hello"));
        assert_eq!(none_if_blank(" padded "), Some(" padded "));
    }

    #[test]
    fn test_none_if_blank_whitespace_is_blank() {
        assert_eq!(none_if_blank(""), None);
        assert_eq!(none_if_blank("\t\n "), None);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Harry meets HAGRID", "hagrid"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("", "x"));
    }
}
