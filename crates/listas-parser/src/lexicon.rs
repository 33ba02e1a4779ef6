//! Phrase and token lists the heuristics match against.
//!
//! Every entry is stored accent-folded and upper-cased so it can be compared
//! directly against the output of [`crate::text::fold_upper`].

/// Header phrases that mark a provider's price list for the current day.
pub const GREETING_PHRASES: &[&str] = &[
    "BUEN DIA TE DEJO LA LISTA DE HOY",
    "LISTA DE HOY",
    "LISTA DE PRECIOS DE HOY",
    "PRECIOS DE HOY",
    "LISTA ACTUALIZADA",
];

/// Markers of an availability-only message (models and colors, no prices).
pub const AVAILABILITY_MARKERS: &[&str] = &[
    "LISTA DE MODELOS Y COLORES",
    "DISPONIBILIDAD",
    "STOCK DISPONIBLE",
    "COLORES DISPONIBLES",
];

/// Brand and product-family tokens, matched on word boundaries.
pub const BRAND_TOKENS: &[&str] = &[
    "IPHONE",
    "SAMSUNG",
    "MOTOROLA",
    "XIAOMI",
    "REDMI",
    "INFINIX",
    "ITEL",
    "TECNO",
    "REALME",
    "JBL",
    "AIRPODS",
    "APPLE",
    "IPAD",
    "MACBOOK",
    "PLAYSTATION",
    "PS5",
    "XBOX",
    "NINTENDO",
];

/// More brand lines than this, with no currency marker at all, is an
/// availability list.
pub const AVAILABILITY_BRAND_LINE_THRESHOLD: usize = 10;

/// Generic word for "list", required by the emergency filter fallback.
pub const LIST_WORD: &str = "LISTA";

/// Prefix that marks a category header line.
pub const CATEGORY_BULLET: char = '►';

/// Category candidates at or beyond this length are prose, not headers.
pub const MAX_CATEGORY_CHARS: usize = 80;

/// Upper-case lines that are boilerplate rather than category headers.
pub const CATEGORY_EXACT_EXCLUSIONS: &[&str] = &["LISTA DE MODELOS Y COLORES DEL DIA"];

/// Lines containing any of these are policy text, never category headers.
pub const CATEGORY_CONTAINS_EXCLUSIONS: &[&str] = &["ACEPTAMOS", "NO TOMAMOS", "GARANTIAS"];

/// Lines starting with any of these are never category headers.
pub const CATEGORY_PREFIX_EXCLUSIONS: &[&str] = &["•", "PRODUCTOS QUE", "ARTICULOS DE"];

/// Line prefixes for comments and separators.
pub const COMMENT_PREFIXES: &[char] = &['#', '='];

pub const TELEVISION_TOKENS: &[&str] = &["TV", "TVS", "QLED", "ULED", "TELEVISORES"];

/// Phone brands mapped to `PHONES <BRAND>`, as `(token, brand)`.
pub const PHONE_BRANDS: &[(&str, &str)] = &[
    ("SAMSUNG", "SAMSUNG"),
    ("MOTOROLA", "MOTOROLA"),
    ("XIAOMI", "XIAOMI"),
    ("INFINIX", "INFINIX"),
    ("ITEL", "ITEL"),
    ("TECNO", "TECNO"),
    ("REALME", "REALME"),
    ("OTRAS MARCAS", "OTHER BRANDS"),
];

/// iPhone condition qualifiers mapped to `PHONES IPHONE <COND>`.
pub const IPHONE_CONDITIONS: &[(&str, &str)] = &[
    ("IPHONE NEW", "NEW"),
    ("IPHONE TESTER", "TESTER"),
    ("IPHONE AS IS", "AS IS"),
];

pub const GAMING_TOKENS: &[&str] = &[
    "PLAYSTATION",
    "PS4",
    "PS5",
    "XBOX",
    "NINTENDO",
    "JOYSTICK",
    "VIDEOJUEGOS",
    "VIDEO JUEGOS",
];

/// Categories returned verbatim when the stripped label matches exactly.
pub const VERBATIM_CATEGORIES: &[&str] = &[
    "PARLANTES JBL",
    "CARGADOR APPLE ORIGINAL",
    "AIRPODS",
    "APPLE WATCH",
    "IPAD",
    "MACBOOK",
];

pub const TELEVISIONS: &str = "TELEVISIONS";
pub const VIDEO_GAMES: &str = "VIDEO_GAMES";
