use std::fmt;

use rust_decimal::Decimal;

use crate::types::price::Price;
use crate::types::quote::Quote;

/// One run's view of the pair. `quote_a` is the instrument that can also be
/// acquired indirectly by buying `quote_b` and converting at the fixed
/// merger ratio.
#[derive(Debug, Clone)]
pub struct ArbitrageSnapshot {
    pub quote_a: Quote,
    pub quote_b: Quote,
    pub conversion_ratio: Decimal,

    /// Price A would have if driven purely by B and the conversion ratio.
    pub implied_price: Price,

    /// Signed deviation of A from parity, in percent. Positive means A
    /// trades rich relative to the B-implied price.
    pub spread_pct: Decimal,

    /// Spread with the round-trip transaction cost deducted from its
    /// magnitude, floored at zero, sign preserved.
    pub cost_adjusted_spread_pct: Decimal,

    pub recommended_action: RecommendedAction,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RecommendedAction {
    BuyDirect,
    BuyViaConversion,
    Hold,
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuyDirect => write!(formatter, "buy-direct"),
            Self::BuyViaConversion => write!(formatter, "buy-via-conversion"),
            Self::Hold => write!(formatter, "hold"),
        }
    }
}
