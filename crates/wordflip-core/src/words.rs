//! Splitting container content into word segments.

/// Delimiter used when none is configured.
pub const DEFAULT_DELIMITER: &str = "|";

/// Split `content` on the literal `delimiter`.
///
/// Segments are kept verbatim: surrounding whitespace is preserved and empty
/// segments become empty words. Empty content yields no words at all.
pub fn split_words(content: &str, delimiter: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    if delimiter.is_empty() {
        return vec![content.to_string()];
    }
    content.split(delimiter).map(str::to_string).collect()
}

/// Inverse of [`split_words`].
pub fn join_words<S: AsRef<str>>(words: &[S], delimiter: &str) -> String {
    words
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(delimiter)
}
