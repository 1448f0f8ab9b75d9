//! Field normalization helpers.
//!
//! Pure functions used while mapping API responses into [`VideoRecord`]s and
//! while (de)serializing multi-valued columns.
//!
//! [`VideoRecord`]: crate::models::VideoRecord

/// Separator for multi-valued columns (`topics`, `tags`).
pub const LIST_DELIMITER: &str = ";";

/// Parse a decimal statistics string, falling back to `0`.
///
/// Missing values, garbage and negative numbers all yield `0`; this never
/// fails.
pub fn parse_or_zero(s: &str) -> i64 {
    s.parse::<i64>().ok().filter(|n| *n >= 0).unwrap_or(0)
}

/// Same as [`parse_or_zero`] for an optional field.
pub fn parse_opt_or_zero(s: Option<&str>) -> i64 {
    s.map(parse_or_zero).unwrap_or(0)
}

/// Final path segment of a topic-category URI.
///
/// `https://en.wikipedia.org/wiki/Music` → `Music`. Input without `/` is
/// returned unchanged.
pub fn extract_topic(uri: &str) -> &str {
    match uri.rfind('/') {
        Some(pos) => &uri[pos + 1..],
        None => uri,
    }
}

/// Apply [`extract_topic`] to each URI, keeping order and dropping empty
/// segments (e.g. a trailing slash).
pub fn extract_topics<S: AsRef<str>>(uris: &[S]) -> Vec<String> {
    uris.iter()
        .map(|u| extract_topic(u.as_ref()))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join values with [`LIST_DELIMITER`]. Empty input gives an empty string.
pub fn join_delimited<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(LIST_DELIMITER)
}

/// Inverse of [`join_delimited`]. An empty string gives an empty vector.
pub fn split_delimited(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split(LIST_DELIMITER).map(str::to_string).collect()
}
