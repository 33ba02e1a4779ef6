//! Pricing parameters shared by the price formula and the catalog views.
//!
//! Two formula revisions exist in the price lists we ingest: a markup of
//! `cost * 1.18 + 20` rounded up to the next multiple of 5, and the current
//! `cost / 0.9 + 20` rounded to the nearest multiple of 5. Both the margin
//! rule and the rounding mode are configuration; the defaults are the
//! current revision.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the provider cost is lifted before the flat fee is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MarginRule {
    /// `cost / divisor` (e.g. `0.9`).
    Divisor(Decimal),
    /// `cost * markup` (e.g. `1.18`).
    Markup(Decimal),
}

impl MarginRule {
    /// Applies the margin to a cost, before the flat fee.
    ///
    /// Returns `None` on overflow or a zero divisor.
    #[must_use]
    pub fn apply(&self, cost: Decimal) -> Option<Decimal> {
        match self {
            MarginRule::Divisor(divisor) => cost.checked_div(*divisor),
            MarginRule::Markup(markup) => cost.checked_mul(*markup),
        }
    }

    /// Effective margin over cost, in percent, rounded to 2 decimal places.
    ///
    /// A divisor of `0.9` yields `11.11`; a markup of `1.18` yields `18`.
    #[must_use]
    pub fn percent(&self) -> Decimal {
        let factor = match self {
            MarginRule::Divisor(divisor) => {
                Decimal::ONE.checked_div(*divisor).unwrap_or(Decimal::ONE)
            }
            MarginRule::Markup(markup) => *markup,
        };
        ((factor - Decimal::ONE) * Decimal::ONE_HUNDRED)
            .round_dp(2)
            .normalize()
    }
}

/// Rounding applied to the lifted price, always at 5-unit granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Round half-up to an integer, then to the nearest multiple of 5.
    #[default]
    Nearest,
    /// Round up to the next multiple of 5.
    Ceiling,
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nearest" => Ok(RoundingMode::Nearest),
            "ceiling" | "ceil" => Ok(RoundingMode::Ceiling),
            other => Err(format!(
                "unknown rounding mode '{other}'; expected 'nearest' or 'ceiling'"
            )),
        }
    }
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundingMode::Nearest => write!(f, "nearest"),
            RoundingMode::Ceiling => write!(f, "ceiling"),
        }
    }
}

/// Full set of pricing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub margin: MarginRule,
    pub flat_fee_usd: Decimal,
    pub rounding: RoundingMode,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            margin: MarginRule::Divisor(Decimal::new(9, 1)),
            flat_fee_usd: Decimal::from(20),
            rounding: RoundingMode::Nearest,
        }
    }
}

impl PricingConfig {
    /// Human-readable formula, recorded in the private catalog metadata.
    #[must_use]
    pub fn describe(&self) -> String {
        let margin = match self.margin {
            MarginRule::Divisor(d) => format!("cost / {d}"),
            MarginRule::Markup(m) => format!("cost * {m}"),
        };
        format!(
            "({margin}) + ${} USD, {} multiple of 5",
            self.flat_fee_usd, self.rounding
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisor_percent_is_eleven_point_one_one() {
        let rule = MarginRule::Divisor(Decimal::new(9, 1));
        assert_eq!(rule.percent(), Decimal::new(1111, 2));
    }

    #[test]
    fn markup_percent_is_eighteen() {
        let rule = MarginRule::Markup(Decimal::new(118, 2));
        assert_eq!(rule.percent(), Decimal::from(18));
    }

    #[test]
    fn divisor_applies_division() {
        let rule = MarginRule::Divisor(Decimal::new(9, 1));
        assert_eq!(rule.apply(Decimal::from(90)), Some(Decimal::from(100)));
    }

    #[test]
    fn zero_divisor_does_not_panic() {
        let rule = MarginRule::Divisor(Decimal::ZERO);
        assert_eq!(rule.apply(Decimal::from(90)), None);
        assert_eq!(rule.percent(), Decimal::ZERO);
    }

    #[test]
    fn rounding_mode_parses_known_values() {
        assert_eq!("nearest".parse::<RoundingMode>(), Ok(RoundingMode::Nearest));
        assert_eq!("CEILING".parse::<RoundingMode>(), Ok(RoundingMode::Ceiling));
        assert!("floor".parse::<RoundingMode>().is_err());
    }

    #[test]
    fn default_is_divide_by_point_nine_plus_twenty() {
        let cfg = PricingConfig::default();
        assert_eq!(cfg.margin, MarginRule::Divisor(Decimal::new(9, 1)));
        assert_eq!(cfg.flat_fee_usd, Decimal::from(20));
        assert_eq!(cfg.rounding, RoundingMode::Nearest);
    }

    #[test]
    fn describe_mentions_rounding_mode() {
        let cfg = PricingConfig::default();
        assert_eq!(cfg.describe(), "(cost / 0.9) + $20 USD, nearest multiple of 5");
    }
}
