//! Domain types shared between the reconciliation engine and exchange clients.
//!
//! All financial values use `rust_decimal::Decimal` for precision.

use anyhow::{ensure, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a position or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Returns the side that closes a position held on this side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

/// Exchange order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderKind {
    Limit,
    Market,
}

/// Snapshot of one open futures position, as observed at poll time.
///
/// Owned by the exchange; the engine never mutates it and never assumes the
/// position still looks like this by the time an order is placed against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub symbol: String,
    pub side: Side,
    pub quantity: Decimal,
    /// Average entry price.
    pub avg_open_price: Decimal,
    /// Position size in quote currency (notional value at entry).
    pub entry_value: Decimal,
    pub position_id: String,
}

impl Position {
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.quantity.is_zero()
    }
}

/// One resting order from the open-orders lookup.
///
/// The exchange may omit type or side on exotic rows; such rows are carried
/// through untyped so callers can skip them.
#[derive(Debug, Clone)]
pub struct OpenOrder {
    pub order_id: String,
    pub kind: Option<OrderKind>,
    pub side: Option<Side>,
}

/// One pending conditional (TP/SL) order.
#[derive(Debug, Clone)]
pub struct TpslOrder {
    pub id: String,
}

/// Acknowledgement returned by the exchange for a placed order.
#[derive(Debug, Clone)]
pub struct OrderAck {
    pub order_id: String,
    pub client_id: Option<String>,
}

/// Validated operator risk parameters for one tracking session.
#[derive(Debug, Clone)]
pub struct RiskSettings {
    pub symbol: String,
    /// Maximum acceptable loss, in quote currency.
    pub stop_loss_budget: Decimal,
    /// Take-profit distance from entry, in percent, when enabled.
    pub take_profit_pct: Option<Decimal>,
}

impl RiskSettings {
    /// Builds validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty symbol, a non-positive budget, or a
    /// non-positive take-profit percentage.
    pub fn new(
        symbol: impl Into<String>,
        stop_loss_budget: Decimal,
        take_profit_pct: Option<Decimal>,
    ) -> Result<Self> {
        let symbol = symbol.into();
        ensure!(!symbol.trim().is_empty(), "symbol cannot be empty");
        ensure!(
            stop_loss_budget > Decimal::ZERO,
            "stop-loss budget must be positive, got {stop_loss_budget}"
        );
        if let Some(pct) = take_profit_pct {
            ensure!(
                pct > Decimal::ZERO,
                "take-profit percentage must be positive, got {pct}"
            );
        }
        Ok(Self {
            symbol,
            stop_loss_budget,
            take_profit_pct,
        })
    }
}

/// Intent to place a position-linked stop-loss. Built and consumed within a
/// single reconciliation pass, never persisted.
#[derive(Debug, Clone)]
pub struct StopLossIntent {
    pub symbol: String,
    pub position_id: String,
    pub trigger_price: Decimal,
}

/// Intent to place a plain limit order closing the position at a profit
/// target. Built and consumed within a single reconciliation pass.
#[derive(Debug, Clone)]
pub struct TakeProfitIntent {
    pub symbol: String,
    pub position_id: String,
    /// Closing side (opposite of the position side).
    pub side: Side,
    pub quantity: Decimal,
    pub limit_price: Decimal,
}
