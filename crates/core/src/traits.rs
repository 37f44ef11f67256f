use crate::types::{
    OpenOrder, Position, RiskSettings, StopLossIntent, TakeProfitIntent, TpslOrder,
};
use anyhow::Result;
use async_trait::async_trait;

/// Exchange operations the reconciliation engine depends on.
///
/// Implemented by the Bitunix REST client; engine tests substitute a scripted
/// double. Errors propagate unmodified to the tick boundary, where the engine
/// resets and retries on the next poll.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Returns the open position for `symbol`, or `None` when the symbol has
    /// no position (closed counts as none).
    async fn open_position(&self, symbol: &str) -> Result<Option<Position>>;

    /// Returns the instrument's declared quote precision (decimal digits),
    /// or `None` when the instrument or its precision is unknown.
    async fn quote_precision(&self, symbol: &str) -> Result<Option<u32>>;

    /// Returns all resting plain orders for `symbol`.
    async fn pending_orders(&self, symbol: &str) -> Result<Vec<OpenOrder>>;

    /// Returns all pending conditional (TP/SL) orders for `symbol`.
    async fn pending_tpsl_orders(&self, symbol: &str) -> Result<Vec<TpslOrder>>;

    /// Cancels the given orders for `symbol` by id.
    async fn cancel_orders(&self, symbol: &str, order_ids: &[String]) -> Result<()>;

    /// Cancels every open order for `symbol`.
    async fn cancel_all_orders(&self, symbol: &str) -> Result<()>;

    /// Places a position-linked stop-loss.
    async fn place_position_stop(&self, intent: &StopLossIntent) -> Result<()>;

    /// Places a plain limit order that closes the position at a target price.
    async fn place_limit_close(&self, intent: &TakeProfitIntent) -> Result<()>;
}

/// Source of operator risk parameters, consulted while no symbol is tracked.
///
/// Returning `Ok(None)` means "nothing configured this round"; the engine
/// stays inactive and asks again on the next tick. Implementations validate
/// input themselves — invalid values never reach the engine.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn next_settings(&mut self) -> Result<Option<RiskSettings>>;
}
