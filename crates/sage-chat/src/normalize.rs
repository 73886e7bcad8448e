//! Input normalization.

/// Lower-case and trim raw input. Total; never fails.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}

/// Drop a single trailing `s`.
///
/// Deliberately naive: irregular plurals are not handled and words that
/// merely end in `s` lose it too (`"bus"` becomes `"bu"`).
pub fn singularize(word: &str) -> String {
    word.strip_suffix('s').unwrap_or(word).to_string()
}
