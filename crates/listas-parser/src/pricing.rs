//! Price formula: provider cost to storefront sale price.

use listas_core::{PricedProduct, PricingConfig, ProductRecord, RoundingMode};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ParserError;

const STEP: u32 = 5;

/// Computes the sale price for `cost` under `config`.
///
/// The result is always a multiple of 5.
///
/// # Errors
///
/// Returns [`ParserError::NonPositiveCost`] when `cost <= 0` and
/// [`ParserError::PriceOverflow`] when the result does not fit in a `u32`.
pub fn price(cost: Decimal, config: &PricingConfig) -> Result<u32, ParserError> {
    if cost <= Decimal::ZERO {
        return Err(ParserError::NonPositiveCost { cost });
    }

    let lifted = config
        .margin
        .apply(cost)
        .and_then(|m| m.checked_add(config.flat_fee_usd))
        .ok_or(ParserError::PriceOverflow { value: cost })?;

    let step = Decimal::from(STEP);
    let rounded = match config.rounding {
        RoundingMode::Nearest => {
            let whole = lifted.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            let rem = whole % step;
            if rem.is_zero() {
                whole
            } else if rem < Decimal::new(25, 1) {
                whole - rem
            } else {
                whole + (step - rem)
            }
        }
        RoundingMode::Ceiling => (lifted / step).ceil() * step,
    };

    rounded
        .to_u32()
        .ok_or(ParserError::PriceOverflow { value: rounded })
}

/// Prices a parsed record, attaching the margin and fee that produced it.
///
/// # Errors
///
/// Propagates the errors of [`price`].
pub fn price_record(
    record: ProductRecord,
    config: &PricingConfig,
) -> Result<PricedProduct, ParserError> {
    let sale_price = price(record.cost, config)?;
    Ok(PricedProduct {
        product: record,
        sale_price,
        margin_percent: config.margin.percent(),
        flat_fee_usd: config.flat_fee_usd,
    })
}
