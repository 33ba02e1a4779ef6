//! Category Normalizer: raw header labels to canonical category names.

use listas_core::DEFAULT_CATEGORY;

use crate::lexicon::{
    CATEGORY_BULLET, GAMING_TOKENS, IPHONE_CONDITIONS, PHONE_BRANDS, TELEVISIONS, TELEVISION_TOKENS,
    VERBATIM_CATEGORIES, VIDEO_GAMES,
};
use crate::text::{contains_word, fold_upper};

/// Maps a raw category label to its canonical name.
///
/// Rules, first match wins:
/// 1. keep only the text before the first `" - "` (warranty and delivery
///    qualifiers such as `"SAMSUNG - GTIA 3 MESES"`);
/// 2. any television token yields `TELEVISIONS`;
/// 3. a phone brand yields `PHONES <BRAND>`;
/// 4. an iPhone condition yields `PHONES IPHONE <NEW|TESTER|AS IS>`;
/// 5. a gaming token yields `VIDEO_GAMES`;
/// 6. an allow-listed label is returned verbatim;
/// 7. anything else is returned upper-cased with whitespace collapsed.
///
/// Never fails; an empty label falls back to [`DEFAULT_CATEGORY`].
#[must_use]
pub fn normalize_category(raw: &str) -> String {
    let unbulleted = raw.trim().trim_start_matches(CATEGORY_BULLET);
    let stripped = unbulleted
        .split(" - ")
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if stripped.is_empty() {
        return DEFAULT_CATEGORY.to_string();
    }

    let folded = fold_upper(&stripped);

    if TELEVISION_TOKENS.iter().any(|t| contains_word(&folded, t)) {
        return TELEVISIONS.to_string();
    }

    if let Some((_, brand)) = PHONE_BRANDS
        .iter()
        .find(|(token, _)| contains_word(&folded, token))
    {
        return format!("PHONES {brand}");
    }

    if let Some((_, condition)) = IPHONE_CONDITIONS
        .iter()
        .find(|(phrase, _)| contains_word(&folded, phrase))
    {
        return format!("PHONES IPHONE {condition}");
    }

    if GAMING_TOKENS.iter().any(|t| contains_word(&folded, t)) {
        return VIDEO_GAMES.to_string();
    }

    if let Some(verbatim) = VERBATIM_CATEGORIES.iter().find(|v| **v == folded) {
        return (*verbatim).to_string();
    }

    stripped.to_uppercase()
}

/// Storefront and broadcast icon for a canonical category.
#[must_use]
pub fn category_icon(canonical: &str) -> &'static str {
    let folded = fold_upper(canonical);
    if folded == VIDEO_GAMES {
        "🎮"
    } else if folded == TELEVISIONS {
        "📺"
    } else if folded.contains("WATCH") {
        "⌚"
    } else if folded.starts_with("PHONES") || folded.contains("IPHONE") || folded.contains("IPAD") {
        "📱"
    } else if folded.contains("MACBOOK") || folded.contains("NOTEBOOK") {
        "💻"
    } else if folded.contains("AIRPODS") || folded.contains("PARLANTE") || folded.contains("JBL") {
        "🎧"
    } else if folded.contains("CARGADOR") {
        "🔌"
    } else {
        "📦"
    }
}
