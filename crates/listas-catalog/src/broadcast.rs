//! Broadcast text posted back to the customer chat.
//!
//! Built from the public view only, so a cost can never leak into it.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use listas_parser::category_icon;

use crate::error::CatalogError;
use crate::store::write_atomic;
use crate::types::{CatalogMetadata, PrivateCatalog, PublicCatalog, PublicProduct};

/// Categories listed first, in this order. Any other category follows,
/// alphabetically.
pub const CATEGORY_ORDER: &[&str] = &[
    "PHONES IPHONE NEW",
    "PHONES IPHONE TESTER",
    "PHONES IPHONE AS IS",
    "PHONES SAMSUNG",
    "PHONES MOTOROLA",
    "PHONES XIAOMI",
    "PHONES INFINIX",
    "PHONES ITEL",
    "PARLANTES JBL",
    "CARGADOR APPLE ORIGINAL",
    "AIRPODS",
    "APPLE WATCH",
    "IPAD",
    "MACBOOK",
    "VIDEO_GAMES",
    "TELEVISIONS",
];

const HEADER: &[&str] = &[
    "🔥 LISTA DE PRECIOS RAM INFORMATICA 🔥",
    "",
    "⚠️ LOS PEDIDOS Y LAS CONSULTAS SE TOMAN DESDE EL MOMENTO QUE ENVIAMOS LA LISTA HASTA LAS 13 HS.",
    "UNA VEZ CONFIRMADO EL PEDIDO SE RETIRA POR NUESTRA SUCURSAL A PARTIR DE LAS 16 HASTA LAS 18 HS",
    "O AL DÍA SIGUIENTE DE 11 A 18 HS, LOS PEDIDOS COMO MÁXIMO SE GUARDAN POR 24 HS",
    "",
    "⛔ NO ⛔ SE ACEPTAN DÓLARES CARA CHICA, MANCHADOS, ROTOS, ESCRITOS.",
    "NO SE ACEPTA CAMBIO EN CANTIDAD - MAYOR A 50. SIN EXCEPCIÓN",
    "",
    "💲 ACEPTAMOS PAGOS EN USDT MAS EL 1 %",
    "",
    "⚠️ NO TOMAMOS PESOS ⛔🚫",
    "",
    "🛒 PRODUCTOS DISPONIBLES",
];

const RULE_WIDE: usize = 50;
const RULE_NARROW: usize = 30;

/// `difusion_ram_<dd-mm-YYYY>.txt`
#[must_use]
pub fn broadcast_file_name(date: NaiveDate) -> String {
    format!("difusion_ram_{}.txt", date.format("%d-%m-%Y"))
}

/// The public view minus the keys whose published offer comes from one of
/// `excluded` providers.
#[must_use]
pub fn broadcast_view(
    public: &PublicCatalog,
    private: &PrivateCatalog,
    excluded: &[&str],
) -> PublicCatalog {
    if excluded.is_empty() {
        return public.clone();
    }
    let hidden: HashSet<&str> = private
        .products
        .iter()
        .filter(|e| e.published && excluded.contains(&e.provider.as_str()))
        .map(|e| e.key.as_str())
        .collect();

    let products: Vec<PublicProduct> = public
        .products
        .iter()
        .filter(|p| !hidden.contains(p.key.as_str()))
        .cloned()
        .collect();
    PublicCatalog {
        metadata: CatalogMetadata {
            total_products: products.len(),
            ..public.metadata.clone()
        },
        products,
    }
}

/// Renders the broadcast message for `date`.
#[must_use]
pub fn render_broadcast(public: &PublicCatalog, date: NaiveDate) -> String {
    let mut lines: Vec<String> = HEADER.iter().map(|l| (*l).to_string()).collect();
    lines.push("=".repeat(RULE_WIDE));
    lines.push(String::new());

    for (category, products) in ordered_categories(public) {
        lines.push(format!("{} {category}", category_icon(category)));
        lines.push("-".repeat(RULE_NARROW));
        lines.push(String::new());
        for product in products {
            lines.push(format!("• {}", product.name));
            lines.push(format!("💰 U$S {}", product.price));
            lines.push(String::new());
        }
    }

    lines.push("=".repeat(RULE_WIDE));
    lines.push(format!("📅 Lista actualizada: {}", date.format("%d/%m/%Y")));
    lines.push(String::new());
    lines.push("💬 Para consultas y pedidos, responder a este mensaje".to_string());
    lines.push(String::new());
    lines.push("🏪 RAM INFORMATICA - Tu tienda de confianza".to_string());

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Renders and writes the broadcast into `dir`, returning the file path.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] when the file cannot be written.
pub fn write_broadcast(
    dir: &Path,
    public: &PublicCatalog,
    date: NaiveDate,
) -> Result<PathBuf, CatalogError> {
    let path = dir.join(broadcast_file_name(date));
    write_atomic(&path, &render_broadcast(public, date))?;
    tracing::info!(path = %path.display(), products = public.products.len(), "broadcast written");
    Ok(path)
}

fn ordered_categories(public: &PublicCatalog) -> Vec<(&str, Vec<&PublicProduct>)> {
    let mut groups: BTreeMap<&str, Vec<&PublicProduct>> = BTreeMap::new();
    for product in &public.products {
        groups.entry(product.category.as_str()).or_default().push(product);
    }

    let mut ordered = Vec::with_capacity(groups.len());
    for category in CATEGORY_ORDER {
        if let Some(products) = groups.remove(category) {
            ordered.push((*category, products));
        }
    }
    ordered.extend(groups);
    ordered
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::types::CatalogEntry;

    fn product(name: &str, price: u32, category: &str) -> PublicProduct {
        PublicProduct {
            key: crate::key::normalize_key(name),
            name: name.to_string(),
            price,
            category: category.to_string(),
            image: String::new(),
            last_updated: DateTime::<Utc>::default(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[test]
    fn file_name_uses_day_month_year() {
        assert_eq!(broadcast_file_name(date()), "difusion_ram_14-10-2026.txt");
    }

    #[test]
    fn categories_follow_preferred_order_then_alphabetical() {
        let public = PublicCatalog {
            products: vec![
                product("CABLE USB C", 10, "ACCESORIOS"),
                product("XBOX SERIES S", 410, "VIDEO_GAMES"),
                product("ZAPATILLA", 15, "ZONA OFERTAS"),
                product("IPHONE 13 128GB", 465, "PHONES IPHONE NEW"),
                product("SAMSUNG A15", 190, "PHONES SAMSUNG"),
            ],
            ..PublicCatalog::default()
        };
        let text = render_broadcast(&public, date());
        let headers: Vec<&str> = text
            .lines()
            .filter(|l| !l.starts_with('•') && !l.starts_with('💰'))
            .filter(|l| {
                ["PHONES", "VIDEO_GAMES", "ACCESORIOS", "ZONA"]
                    .iter()
                    .any(|c| l.contains(c))
            })
            .collect();
        assert_eq!(
            headers,
            vec![
                "📱 PHONES IPHONE NEW",
                "📱 PHONES SAMSUNG",
                "🎮 VIDEO_GAMES",
                "📦 ACCESORIOS",
                "📦 ZONA OFERTAS",
            ]
        );
    }

    #[test]
    fn product_block_layout() {
        let public = PublicCatalog {
            products: vec![product("JBL GO 3", 70, "PARLANTES JBL")],
            ..PublicCatalog::default()
        };
        let text = render_broadcast(&public, date());
        assert!(text.contains("🎧 PARLANTES JBL\n------------------------------\n\n• JBL GO 3\n💰 U$S 70\n\n"));
        assert!(text.starts_with("🔥 LISTA DE PRECIOS RAM INFORMATICA 🔥\n"));
        assert!(text.contains("📅 Lista actualizada: 14/10/2026\n"));
        assert!(text.ends_with("🏪 RAM INFORMATICA - Tu tienda de confianza\n"));
    }

    #[test]
    fn excluded_providers_stay_out_of_broadcast() {
        let public = PublicCatalog {
            products: vec![
                product("JBL GO 3", 70, "PARLANTES JBL"),
                product("JBL FLIP 6", 150, "PARLANTES JBL"),
                product("JBL CHARGE 5", 190, "PARLANTES JBL"),
            ],
            ..PublicCatalog::default()
        };
        let published = |name: &str, provider: &str| CatalogEntry {
            key: crate::key::normalize_key(name),
            name: name.to_string(),
            price: 0,
            cost_price: rust_decimal::Decimal::ZERO,
            category: "PARLANTES JBL".to_string(),
            provider: provider.to_string(),
            margin_percent: rust_decimal::Decimal::ZERO,
            flat_fee_usd: rust_decimal::Decimal::ZERO,
            last_updated: DateTime::<Utc>::default(),
            published: true,
        };
        let private = PrivateCatalog {
            products: vec![
                published("JBL GO 3", "GcGroup"),
                published("JBL FLIP 6", "Rodrigo Provee"),
            ],
            ..PrivateCatalog::default()
        };

        let view = broadcast_view(&public, &private, &["Rodrigo Provee"]);
        assert_eq!(view.metadata.total_products, 2);
        let text = render_broadcast(&view, date());
        assert!(text.contains("• JBL GO 3\n"));
        assert!(text.contains("• JBL CHARGE 5\n"));
        assert!(!text.contains("JBL FLIP 6"));

        assert_eq!(broadcast_view(&public, &private, &[]), public);
    }

    #[test]
    fn write_broadcast_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_broadcast(dir.path(), &PublicCatalog::default(), date()).unwrap();
        assert_eq!(path, dir.path().join("difusion_ram_14-10-2026.txt"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("🛒 PRODUCTOS DISPONIBLES"));
    }
}
