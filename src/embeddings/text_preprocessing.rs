//! Text preprocessing utilities for embedding generation
//!
//! PDF text layers are full of hard line breaks, tabs and control characters
//! left over from layout. They are flattened before embedding; the chunk text
//! kept in the index is left untouched.

/// Normalise text for embedding. Returns `None` when nothing embeddable remains.
pub fn preprocess_text_for_embedding(text: &str) -> Option<String> {
    let sanitized = sanitize_text(text);
    let normalized = normalize_whitespace(&sanitized);

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Collapse every run of whitespace (including newlines) into a single space
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Replace control characters with spaces
fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
