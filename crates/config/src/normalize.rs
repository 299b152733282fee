//! Text folding for user answers
//!
//! Choice values, confirmation answers, configured button values and the
//! restart command are compared after folding: trimmed, whitespace collapsed, lower-cased, and with
//! diacritics removed ("Mañana" and "manana" fold to the same string).

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Fold text for case- and accent-insensitive comparison
pub fn fold(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !is_combining_mark(*c)).collect();

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
