//! Catalog keys: the identity two sightings of a product share.

use listas_parser::fold_upper;

/// Normalizes a product name into its catalog key.
///
/// Accents are folded, letters lower-cased, anything other than letters,
/// digits, `_`, `-` and whitespace is dropped, whitespace runs become a
/// single `_`, and a hyphen standing on its own is dropped.
/// `"iPhone 13 (128GB) 🔥"` and `"IPHONE 13 - 128GB"` share the key
/// `iphone_13_128gb`.
#[must_use]
pub fn normalize_key(name: &str) -> String {
    let cleaned: String = fold_upper(name)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    cleaned
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.chars().all(|c| c == '-'))
        .collect::<Vec<_>>()
        .join("_")
}

/// Storefront image file name for a catalog key.
#[must_use]
pub fn image_name(key: &str) -> String {
    format!("{key}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_case() {
        assert_eq!(normalize_key("Cargador Apple Original 20W"), "cargador_apple_original_20w");
        assert_eq!(normalize_key("JOYSTICK PS5 EDICIÓN"), "joystick_ps5_edicion");
    }

    #[test]
    fn drops_symbols_and_emoji() {
        assert_eq!(normalize_key("IPHONE 13 128GB 🔥"), "iphone_13_128gb");
        assert_eq!(normalize_key("iPhone 13 – 128GB"), "iphone_13_128gb");
        assert_eq!(normalize_key("TV 50\" (4K)"), "tv_50_4k");
    }

    #[test]
    fn keeps_hyphens_inside_words() {
        assert_eq!(normalize_key("MOTO G-54 5G"), "moto_g-54_5g");
    }

    #[test]
    fn standalone_hyphens_are_dropped() {
        assert_eq!(normalize_key("IPHONE 13 - 128GB"), "iphone_13_128gb");
        assert_eq!(normalize_key("IPHONE 13 -- 128GB"), "iphone_13_128gb");
        assert_eq!(normalize_key("iPhone 13 – 128GB"), normalize_key("IPHONE 13 - 128GB"));
    }

    #[test]
    fn collapses_whitespace_and_underscores() {
        assert_eq!(normalize_key("  AIRPODS   PRO__2  "), "airpods_pro_2");
    }

    #[test]
    fn image_name_appends_png() {
        assert_eq!(image_name("airpods_pro_2"), "airpods_pro_2.png");
    }
}
