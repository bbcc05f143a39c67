//! Query normalization.
//!
//! Every stage of the brain works on a normalized copy of the raw query:
//! lower-cased, Turkish diacritics folded to ASCII, whitespace collapsed.
//! The raw query itself is never modified.

/// Combining dot above, left behind when `İ` goes through Unicode lowercasing.
const COMBINING_DOT_ABOVE: char = '\u{0307}';

/// Fold a single lower-case character onto its ASCII base letter.
fn fold_char(c: char) -> char {
    match c {
        'ç' => 'c',
        'ğ' => 'g',
        'ı' => 'i',
        'ö' => 'o',
        'ş' => 's',
        'ü' => 'u',
        'â' => 'a',
        'î' => 'i',
        'û' => 'u',
        other => other,
    }
}

/// Normalize a query for matching.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(raw: &str) -> String {
    let folded: String = raw
        .chars()
        .map(|c| if c == 'İ' { 'i' } else { c })
        .flat_map(char::to_lowercase)
        .filter(|c| *c != COMBINING_DOT_ABOVE)
        .map(fold_char)
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
