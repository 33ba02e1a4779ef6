//! The two catalog views.
//!
//! The public view feeds the storefront and carries no cost, margin or
//! provider data at all; the types make that impossible rather than
//! filtered. The private view keeps one entry per `(key, provider)`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Document version written by this crate.
pub const CATALOG_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogMetadata {
    pub last_updated: Option<DateTime<Utc>>,
    pub total_products: usize,
    pub version: String,
}

impl Default for CatalogMetadata {
    fn default() -> Self {
        Self {
            last_updated: None,
            total_products: 0,
            version: CATALOG_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProduct {
    pub key: String,
    pub name: String,
    /// Sale price in whole USD.
    pub price: u32,
    pub category: String,
    pub image: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCatalog {
    pub metadata: CatalogMetadata,
    pub products: Vec<PublicProduct>,
}

impl PublicCatalog {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PublicProduct> {
        self.products.iter().find(|p| p.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivateMetadata {
    pub last_updated: Option<DateTime<Utc>>,
    pub total_products: usize,
    pub version: String,
    /// Price formula in force at the last merge.
    pub formula: Option<String>,
    /// Providers with at least one entry, sorted.
    pub providers: Vec<String>,
}

impl Default for PrivateMetadata {
    fn default() -> Self {
        Self {
            last_updated: None,
            total_products: 0,
            version: CATALOG_VERSION.to_string(),
            formula: None,
            providers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub key: String,
    pub name: String,
    pub price: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost_price: Decimal,
    pub category: String,
    pub provider: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub margin_percent: Decimal,
    #[serde(rename = "flatFeeUSD", with = "rust_decimal::serde::float")]
    pub flat_fee_usd: Decimal,
    pub last_updated: DateTime<Utc>,
    /// Whether this provider's offer is the one shown publicly for `key`.
    #[serde(default)]
    pub published: bool,
}

impl CatalogEntry {
    /// Sale price minus cost, in USD.
    #[must_use]
    pub fn profit(&self) -> Decimal {
        Decimal::from(self.price) - self.cost_price
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateCatalog {
    pub metadata: PrivateMetadata,
    pub products: Vec<CatalogEntry>,
}

impl PrivateCatalog {
    /// The entry currently feeding the public view for `key`.
    #[must_use]
    pub fn published(&self, key: &str) -> Option<&CatalogEntry> {
        self.products.iter().find(|e| e.key == key && e.published)
    }

    #[must_use]
    pub fn entry(&self, key: &str, provider: &str) -> Option<&CatalogEntry> {
        self.products
            .iter()
            .find(|e| e.key == key && e.provider == provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> CatalogEntry {
        CatalogEntry {
            key: "iphone_13_128gb".to_string(),
            name: "IPHONE 13 128GB".to_string(),
            price: 465,
            cost_price: Decimal::from(400),
            category: "PHONES IPHONE NEW".to_string(),
            provider: "GcGroup".to_string(),
            margin_percent: Decimal::new(1111, 2),
            flat_fee_usd: Decimal::from(20),
            last_updated: DateTime::<Utc>::default(),
            published: true,
        }
    }

    #[test]
    fn private_entry_uses_storefront_field_names() {
        let json = serde_json::to_value(entry()).unwrap();
        assert_eq!(json["costPrice"], serde_json::json!(400.0));
        assert_eq!(json["marginPercent"], serde_json::json!(11.11));
        assert_eq!(json["flatFeeUSD"], serde_json::json!(20.0));
        assert_eq!(json["published"], serde_json::json!(true));
    }

    #[test]
    fn profit_is_price_minus_cost() {
        assert_eq!(entry().profit(), Decimal::from(65));
    }

    #[test]
    fn public_product_has_no_private_fields() {
        let product = PublicProduct {
            key: "iphone_13_128gb".to_string(),
            name: "IPHONE 13 128GB".to_string(),
            price: 465,
            category: "PHONES IPHONE NEW".to_string(),
            image: "iphone_13_128gb.png".to_string(),
            last_updated: DateTime::<Utc>::default(),
        };
        let json = serde_json::to_value(product).unwrap();
        let mut fields: Vec<&String> = json.as_object().unwrap().keys().collect();
        fields.sort();
        assert_eq!(
            fields,
            vec!["category", "image", "key", "lastUpdated", "name", "price"]
        );
    }

    #[test]
    fn metadata_defaults_to_current_version() {
        let meta: CatalogMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(meta.version, CATALOG_VERSION);
        assert_eq!(meta.total_products, 0);
    }
}
