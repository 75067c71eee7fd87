//! Text helpers shared by the extraction rules.
//!
//! Lengths and truncation work on characters (Unicode scalar values), never
//! bytes, so multi-byte text such as Japanese is cut on character boundaries.

/// Join text fragments the way slide text is read: each fragment is trimmed,
/// empty fragments are dropped, and the rest are concatenated without a
/// separator.
pub fn join_stripped<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    fragments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
