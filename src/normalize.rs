//! Text canonicalization for fuzzy matching.
//!
//! Sheet names, header cells and field labels are all compared through
//! [`normalize`]: accents are folded to their base letters, surrounding
//! whitespace is trimmed and the result is lowercased. `"Fecha de Ejecución"`
//! and `"fecha de ejecucion"` compare equal after folding.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical comparison form of a string.
///
/// NFD-decomposes the input, drops the combining marks, trims and lowercases.
/// Pure and total; idempotent.
pub fn normalize(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_lowercase()
}

/// Like [`normalize`], with absent input folding to the empty string.
pub fn normalize_opt(input: Option<&str>) -> String {
    input.map(normalize).unwrap_or_default()
}
