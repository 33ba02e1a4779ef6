//! Case and accent folding plus small scanning helpers shared by the
//! filter, the completeness checker and the line parser.
//!
//! Provider messages are Spanish and written by hand, so the same header
//! shows up as `BUEN DÍA`, `Buen dia` or `BUEN DIA`. Every comparison goes
//! through [`fold_upper`] first.

use crate::lexicon::{BRAND_TOKENS, GREETING_PHRASES};

/// Maps an accented Latin letter to its unaccented lower-case base.
/// Any other character is returned unchanged.
pub(crate) fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        other => other,
    }
}

/// Accent-folds and upper-cases `s`.
#[must_use]
pub fn fold_upper(s: &str) -> String {
    s.chars()
        .map(fold_char)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Returns `true` when `needle` occurs in `haystack` with no alphanumeric
/// character directly before or after it.
///
/// Both arguments must already be folded.
pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(pos, _)| {
        let before_ok = !haystack[..pos]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
        let after_ok = !haystack[pos + needle.len()..]
            .chars()
            .next()
            .is_some_and(char::is_alphanumeric);
        before_ok && after_ok
    })
}

/// `$` covers `U$S`; `USD` must stand alone so `USDT` does not count.
pub(crate) fn has_currency_marker(folded: &str) -> bool {
    folded.contains('$') || contains_word(folded, "USD")
}

pub(crate) fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

pub(crate) fn has_brand_token(folded: &str) -> bool {
    BRAND_TOKENS.iter().any(|b| contains_word(folded, b))
}

/// Returns `true` if `folded` carries a shared greeting phrase or one of
/// the provider-specific `extra` phrases (folded on the fly).
pub(crate) fn has_greeting(folded: &str, extra: &[String]) -> bool {
    GREETING_PHRASES.iter().any(|p| folded.contains(p))
        || extra
            .iter()
            .map(|p| fold_upper(p.trim()))
            .any(|p| !p.is_empty() && folded.contains(&p))
}

/// Mirrors Python's `str.isupper`: at least one cased character and no
/// lower-case ones.
pub(crate) fn is_all_upper(s: &str) -> bool {
    let mut saw_cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            saw_cased = true;
        }
    }
    saw_cased
}
