use crate::types::RiskSettings;
use rust_decimal::Decimal;

/// The engine's only mutable memory: which symbol is tracked and under what
/// risk parameters. Single-writer — owned and mutated exclusively by the
/// reconciliation engine, reset to defaults when the tracked position closes
/// or an unrecovered error escapes a tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingState {
    pub active: bool,
    pub symbol: String,
    /// Maximum acceptable loss, in quote currency.
    pub stop_loss_budget: Decimal,
    /// Last notional value reconciled against. Zero forces a reconcile on
    /// the next tick.
    pub tracked_value: Decimal,
    pub take_profit_pct: Option<Decimal>,
}

impl TrackingState {
    /// Starts tracking under the given settings. Tracked value starts at
    /// zero so the first poll always reconciles.
    pub fn activate(&mut self, settings: &RiskSettings) {
        self.active = true;
        self.symbol = settings.symbol.clone();
        self.stop_loss_budget = settings.stop_loss_budget;
        self.tracked_value = Decimal::ZERO;
        self.take_profit_pct = settings.take_profit_pct;
    }

    /// Returns to the inactive default state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
