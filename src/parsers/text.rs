use crate::utils::truncate_chars;

/// Maximum length of the plain-text reduction of a page, in characters
pub const MAX_TEXT_LENGTH: usize = 4000;

/// Appended when text is cut at `MAX_TEXT_LENGTH`
pub const TRUNCATION_MARKER: &str = "…";

/// Collapses every run of whitespace into a single space and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Bounds text to `MAX_TEXT_LENGTH` characters plus the marker.
///
/// Applying this to its own output returns the same string.
pub fn bound_length(text: &str) -> String {
    truncate_chars(text, MAX_TEXT_LENGTH, TRUNCATION_MARKER)
}

/// Normalizes and bounds a block of extracted text
pub fn clean(text: &str) -> String {
    bound_length(&normalize_whitespace(text))
}
