use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category assigned to products that appear before any category header.
pub const DEFAULT_CATEGORY: &str = "PRODUCTS";

/// A product line extracted from a provider's price-list message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product name as written by the provider, trimmed (e.g. `"IPHONE 13 128GB"`).
    pub raw_name: String,
    /// Provider cost in USD. Always strictly positive.
    pub cost: Decimal,
    /// Canonical category active when the line was read.
    pub category: String,
}

/// A [`ProductRecord`] with the sale price computed by the price formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedProduct {
    pub product: ProductRecord,
    /// Sale price in whole USD; always a multiple of 5.
    pub sale_price: u32,
    /// Margin over cost used to compute `sale_price`, in percent.
    pub margin_percent: Decimal,
    /// Flat fee in USD added after the margin.
    pub flat_fee_usd: Decimal,
}

impl PricedProduct {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.product.raw_name
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.product.category
    }

    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.product.cost
    }

    /// Sale price minus cost, in USD.
    #[must_use]
    pub fn profit(&self) -> Decimal {
        Decimal::from(self.sale_price) - self.product.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_priced(cost: i64, sale_price: u32) -> PricedProduct {
        PricedProduct {
            product: ProductRecord {
                raw_name: "IPHONE 13 128GB".to_string(),
                cost: Decimal::from(cost),
                category: "PHONES IPHONE NEW".to_string(),
            },
            sale_price,
            margin_percent: Decimal::new(1111, 2),
            flat_fee_usd: Decimal::from(20),
        }
    }

    #[test]
    fn accessors_expose_record_fields() {
        let priced = make_priced(400, 465);
        assert_eq!(priced.name(), "IPHONE 13 128GB");
        assert_eq!(priced.category(), "PHONES IPHONE NEW");
        assert_eq!(priced.cost(), Decimal::from(400));
    }

    #[test]
    fn profit_is_sale_minus_cost() {
        let priced = make_priced(400, 465);
        assert_eq!(priced.profit(), Decimal::from(65));
    }

    #[test]
    fn serde_roundtrip_priced_product() {
        let priced = make_priced(400, 465);
        let json = serde_json::to_string(&priced).expect("serialization failed");
        let decoded: PricedProduct = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(decoded, priced);
    }
}
