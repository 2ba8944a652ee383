use rust_decimal::Decimal;

use crate::arbitrage::snapshot::{ArbitrageSnapshot, RecommendedAction};
use crate::types::price::Price;
use crate::types::quote::Quote;

/// Pure spread calculation; no failure modes for positive-price inputs.
pub fn compute(
    quote_a: Quote,
    quote_b: Quote,
    ratio: Decimal,
    round_trip_cost_pct: Decimal,
) -> ArbitrageSnapshot {
    let implied = quote_b.price.as_decimal() * ratio;
    let spread_pct =
        (quote_a.price.as_decimal() - implied) / implied * Decimal::ONE_HUNDRED;

    let adjusted_magnitude = (spread_pct.abs() - round_trip_cost_pct).max(Decimal::ZERO);
    let cost_adjusted_spread_pct = if spread_pct.is_sign_negative() {
        -adjusted_magnitude
    } else {
        adjusted_magnitude
    };

    /* A rich vs parity means the conversion leg is the cheap entry */
    let recommended_action = if cost_adjusted_spread_pct > Decimal::ZERO {
        RecommendedAction::BuyViaConversion
    } else if cost_adjusted_spread_pct < Decimal::ZERO {
        RecommendedAction::BuyDirect
    } else {
        RecommendedAction::Hold
    };

    ArbitrageSnapshot {
        quote_a,
        quote_b,
        conversion_ratio: ratio,
        implied_price: Price::new(implied),
        spread_pct,
        cost_adjusted_spread_pct,
        recommended_action,
    }
}
