//! Reading every catalog shape the storefront has ever written.
//!
//! Older exports used Spanish field names, grouped products by category,
//! or were a bare list. They are normalized into the current views once,
//! at load time; nothing downstream sees a legacy shape.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use listas_core::DEFAULT_CATEGORY;
use listas_parser::normalize_category;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::key::{image_name, normalize_key};
use crate::types::{
    CatalogEntry, CatalogMetadata, PrivateCatalog, PrivateMetadata, PublicCatalog, PublicProduct,
};

/// Provider tag given to private entries written before providers were
/// tracked.
pub const LEGACY_PROVIDER: &str = "legacy";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PublicDocument {
    Current(PublicCatalog),
    Legacy(LegacyDocument),
}

impl PublicDocument {
    pub(crate) fn into_catalog(self) -> PublicCatalog {
        match self {
            PublicDocument::Current(catalog) => catalog,
            PublicDocument::Legacy(doc) => {
                let catalog = public_from_rows(doc.into_rows());
                tracing::info!(
                    products = catalog.products.len(),
                    "migrated legacy public catalog"
                );
                catalog
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PrivateDocument {
    Current(PrivateCatalog),
    Legacy(LegacyDocument),
}

impl PrivateDocument {
    pub(crate) fn into_catalog(self) -> PrivateCatalog {
        match self {
            PrivateDocument::Current(catalog) => catalog,
            PrivateDocument::Legacy(doc) => {
                let catalog = private_from_rows(doc.into_rows());
                tracing::info!(
                    products = catalog.products.len(),
                    "migrated legacy private catalog"
                );
                catalog
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LegacyDocument {
    Wrapped {
        #[serde(alias = "productos")]
        products: LegacyProducts,
    },
    Bare(Vec<LegacyItem>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LegacyProducts {
    Flat(Vec<LegacyItem>),
    Grouped(BTreeMap<String, Vec<LegacyItem>>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct LegacyItem {
    #[serde(alias = "nombre", alias = "producto")]
    name: Option<String>,
    #[serde(alias = "precio", alias = "precio_venta", alias = "precio_usd")]
    price: Option<LegacyNumber>,
    #[serde(alias = "precio_costo", alias = "costPrice")]
    cost_price: Option<LegacyNumber>,
    #[serde(alias = "categoria")]
    category: Option<String>,
    #[serde(alias = "proveedor")]
    provider: Option<String>,
}

/// Prices were written both as numbers and as display strings (`"$465"`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyNumber {
    Number(f64),
    Text(String),
}

impl LegacyNumber {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            LegacyNumber::Number(n) => Decimal::from_f64(*n),
            LegacyNumber::Text(s) => {
                let digits: String = s
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
                    .collect();
                if digits.is_empty() || digits.matches(['.', ',']).count() > 1 {
                    return None;
                }
                digits.replace(',', ".").parse().ok()
            }
        }
    }
}

#[derive(Debug)]
struct LegacyRow {
    key: String,
    name: String,
    price: u32,
    cost: Option<Decimal>,
    category: String,
    provider: Option<String>,
}

impl LegacyDocument {
    fn into_rows(self) -> Vec<LegacyRow> {
        let items: Vec<(Option<String>, LegacyItem)> = match self {
            LegacyDocument::Bare(items)
            | LegacyDocument::Wrapped {
                products: LegacyProducts::Flat(items),
            } => items.into_iter().map(|item| (None, item)).collect(),
            LegacyDocument::Wrapped {
                products: LegacyProducts::Grouped(groups),
            } => groups
                .into_iter()
                .flat_map(|(group, items)| {
                    items.into_iter().map(move |item| (Some(group.clone()), item))
                })
                .collect(),
        };

        let total = items.len();
        let rows: Vec<LegacyRow> = items
            .into_iter()
            .filter_map(|(group, item)| item.into_row(group))
            .collect();
        if rows.len() < total {
            tracing::warn!(
                dropped = total - rows.len(),
                "legacy catalog items without a usable name or price were dropped"
            );
        }
        rows
    }
}

impl LegacyItem {
    fn into_row(self, group: Option<String>) -> Option<LegacyRow> {
        let name = self.name?.trim().to_string();
        let key = normalize_key(&name);
        if key.is_empty() {
            return None;
        }

        let price = self
            .price?
            .to_decimal()?
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            .to_u32()?;

        let category = self
            .category
            .or(group)
            .filter(|c| !c.trim().is_empty())
            .map_or_else(|| DEFAULT_CATEGORY.to_string(), |c| normalize_category(&c));

        Some(LegacyRow {
            key,
            name,
            price,
            cost: self.cost_price.as_ref().and_then(LegacyNumber::to_decimal),
            category,
            provider: self
                .provider
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        })
    }
}

/// Legacy documents carry no per-product timestamp.
fn legacy_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

fn public_from_rows(rows: Vec<LegacyRow>) -> PublicCatalog {
    let mut seen = HashSet::new();
    let products: Vec<PublicProduct> = rows
        .into_iter()
        .filter(|row| seen.insert(row.key.clone()))
        .map(|row| PublicProduct {
            image: image_name(&row.key),
            key: row.key,
            name: row.name,
            price: row.price,
            category: row.category,
            last_updated: legacy_timestamp(),
        })
        .collect();

    PublicCatalog {
        metadata: CatalogMetadata {
            total_products: products.len(),
            ..CatalogMetadata::default()
        },
        products,
    }
}

/// The first legacy entry seen for a key is flagged published until
/// [`CatalogMerger::reconcile`](crate::merge::CatalogMerger::reconcile)
/// re-runs the election.
fn private_from_rows(rows: Vec<LegacyRow>) -> PrivateCatalog {
    let mut seen_pairs = HashSet::new();
    let mut published_keys = HashSet::new();
    let mut providers = BTreeSet::new();
    let mut products = Vec::new();

    for row in rows {
        let provider = row.provider.unwrap_or_else(|| LEGACY_PROVIDER.to_string());
        if !seen_pairs.insert((row.key.clone(), provider.clone())) {
            continue;
        }
        providers.insert(provider.clone());
        products.push(CatalogEntry {
            published: published_keys.insert(row.key.clone()),
            key: row.key,
            name: row.name,
            price: row.price,
            cost_price: row.cost.unwrap_or(Decimal::ZERO),
            category: row.category,
            provider,
            margin_percent: Decimal::ZERO,
            flat_fee_usd: Decimal::ZERO,
            last_updated: legacy_timestamp(),
        });
    }

    PrivateCatalog {
        metadata: PrivateMetadata {
            total_products: products.len(),
            providers: providers.into_iter().collect(),
            ..PrivateMetadata::default()
        },
        products,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public(json: &str) -> PublicCatalog {
        serde_json::from_str::<PublicDocument>(json)
            .unwrap()
            .into_catalog()
    }

    fn private(json: &str) -> PrivateCatalog {
        serde_json::from_str::<PrivateDocument>(json)
            .unwrap()
            .into_catalog()
    }

    #[test]
    fn flat_spanish_export_is_migrated() {
        let catalog = public(
            r#"{
                "metadatos": {"fecha_actualizacion": "14/10/2026", "total_productos": 2, "version": "1.0"},
                "productos": [
                    {"producto": "IPHONE 13 128GB", "precio_usd": 465, "categoria": "IPHONE NEW", "imagen": "x.png"},
                    {"producto": "JBL GO 3", "precio_usd": "$70", "categoria": "PARLANTES JBL"}
                ]
            }"#,
        );
        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.metadata.total_products, 2);
        let iphone = &catalog.products[0];
        assert_eq!(iphone.key, "iphone_13_128gb");
        assert_eq!(iphone.price, 465);
        assert_eq!(iphone.category, "PHONES IPHONE NEW");
        assert_eq!(iphone.image, "iphone_13_128gb.png");
        assert_eq!(catalog.products[1].price, 70);
    }

    #[test]
    fn grouped_export_takes_category_from_group() {
        let catalog = public(
            r#"{
                "metadatos": {},
                "productos": {
                    "SAMSUNG": [{"nombre": "SAMSUNG A15", "precio": 190}],
                    "XBOX": [{"nombre": "XBOX SERIES S", "precio": 410.0}]
                }
            }"#,
        );
        let categories: Vec<&str> = catalog.products.iter().map(|p| p.category.as_str()).collect();
        assert_eq!(categories, vec!["PHONES SAMSUNG", "VIDEO_GAMES"]);
    }

    #[test]
    fn bare_list_is_accepted() {
        let catalog = public(r#"[{"name": "AIRPODS PRO 2", "price": 220}]"#);
        assert_eq!(catalog.products[0].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn unusable_items_are_dropped() {
        let catalog = public(
            r#"[{"nombre": "SIN PRECIO"}, {"precio": 10}, {"nombre": "CONSULTAR", "precio": "A CONFIRMAR"}, {"nombre": "OK", "precio": 5}]"#,
        );
        assert_eq!(catalog.products.len(), 1);
        assert_eq!(catalog.products[0].name, "OK");
    }

    #[test]
    fn duplicate_public_keys_keep_first() {
        let catalog = public(
            r#"[{"nombre": "JBL GO 3", "precio": 70}, {"nombre": "jbl go 3", "precio": 60}]"#,
        );
        assert_eq!(catalog.products.len(), 1);
        assert_eq!(catalog.products[0].price, 70);
    }

    #[test]
    fn private_legacy_without_provider_is_tagged() {
        let catalog = private(
            r#"{"productos": [
                {"producto": "IPHONE 13 128GB", "precio_venta": 465, "precio_costo": 400},
                {"producto": "IPHONE 13 128GB", "precio_venta": 470, "precio_costo": 405, "proveedor": "Kadabra Provee"}
            ]}"#,
        );
        assert_eq!(catalog.products.len(), 2);
        let legacy = &catalog.products[0];
        assert_eq!(legacy.provider, LEGACY_PROVIDER);
        assert_eq!(legacy.cost_price, Decimal::from(400));
        assert!(legacy.published);
        assert!(!catalog.products[1].published);
        assert_eq!(
            catalog.metadata.providers,
            vec!["Kadabra Provee".to_string(), LEGACY_PROVIDER.to_string()]
        );
    }

    #[test]
    fn current_shape_is_not_migrated() {
        let catalog = private(
            r#"{
                "metadata": {"lastUpdated": null, "totalProducts": 1, "version": "2.0", "formula": null, "providers": ["GcGroup"]},
                "products": [{
                    "key": "jbl_go_3", "name": "JBL GO 3", "price": 70, "costPrice": 45.5,
                    "category": "PARLANTES JBL", "provider": "GcGroup", "marginPercent": 11.11,
                    "flatFeeUSD": 20, "lastUpdated": "2026-10-14T12:00:00Z", "published": true
                }]
            }"#,
        );
        assert_eq!(catalog.products[0].provider, "GcGroup");
        assert_eq!(catalog.products[0].margin_percent, Decimal::new(1111, 2));
    }

    #[test]
    fn unrecognized_document_is_an_error() {
        assert!(serde_json::from_str::<PublicDocument>(r#"{"foo": 1}"#).is_err());
        assert!(serde_json::from_str::<PublicDocument>("42").is_err());
    }
}
