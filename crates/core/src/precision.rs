//! Price adjustment to the instrument's tick grid.
//!
//! The exchange rejects orders whose price is off the grid implied by the
//! instrument's quote precision. Adjustment floors toward zero so a long
//! stop never lands a tick above where the operator asked for it.
//!
//! Lookup failures degrade to the unadjusted price (fail-open): a slightly
//! off-grid protective order that the exchange may still accept beats no
//! protective order at all. The transport layer, by contrast, fails closed.

use crate::traits::ExchangeApi;
use rust_decimal::Decimal;

/// Outcome of a price adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustedPrice {
    /// Price floored to the instrument's tick grid.
    Adjusted(Decimal),
    /// Precision lookup failed; the original price is passed through.
    Unadjusted { price: Decimal, reason: String },
}

impl AdjustedPrice {
    /// The price to submit, whichever outcome occurred.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        match self {
            Self::Adjusted(price) | Self::Unadjusted { price, .. } => *price,
        }
    }

    #[must_use]
    pub const fn is_adjusted(&self) -> bool {
        matches!(self, Self::Adjusted(_))
    }
}

/// Floors `price` to the grid implied by `quote_precision` decimal digits.
///
/// Tick size is 10^(−precision); the computation stays in exact decimal
/// arithmetic throughout, so 12.34567 at precision 4 is 12.3456, never
/// 12.3457.
#[must_use]
pub fn floor_to_tick(price: Decimal, quote_precision: u32) -> Decimal {
    // Decimal scale is capped at 28 fractional digits.
    let tick = Decimal::new(1, quote_precision.min(28));
    (price / tick).trunc() * tick
}

/// Adjusts `price` to `symbol`'s tick grid, looking the precision up on the
/// exchange. Any lookup failure yields [`AdjustedPrice::Unadjusted`] with a
/// warning rather than an error.
pub async fn adjust_price<A: ExchangeApi + ?Sized>(
    api: &A,
    symbol: &str,
    price: Decimal,
) -> AdjustedPrice {
    match api.quote_precision(symbol).await {
        Ok(Some(precision)) => AdjustedPrice::Adjusted(floor_to_tick(price, precision)),
        Ok(None) => {
            let reason = format!("no quote precision published for {symbol}");
            tracing::warn!(symbol, %price, "{reason}; submitting unadjusted price");
            AdjustedPrice::Unadjusted { price, reason }
        }
        Err(err) => {
            tracing::warn!(symbol, %price, error = %err, "precision lookup failed; submitting unadjusted price");
            AdjustedPrice::Unadjusted {
                price,
                reason: err.to_string(),
            }
        }
    }
}
