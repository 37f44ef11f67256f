//! The reconciliation engine: a two-state machine that keeps exchange-side
//! protective orders consistent with one live position.
//!
//! While inactive, the engine waits for operator risk settings and a live
//! position. While active, each tick compares the position's notional value
//! against the last reconciled value; on a change it replaces the stop-loss
//! (and, when enabled, the take-profit) using cancel-then-place. The cancel
//! step runs again on every reconciling tick, so a crash between cancel and
//! place leaves the position unprotected for at most one poll interval.
//!
//! The take-profit is a plain limit order on the closing side, not an
//! exchange-native conditional order: the venue's conditional take-profit
//! products close the whole position at mark price, which is not the
//! semantics wanted here.
//!
//! Every error escaping a tick resets tracking to the inactive default and
//! pauses for the recovery delay; nothing terminates the process once the
//! loop is running.

use crate::config::EngineConfig;
use crate::precision::adjust_price;
use crate::tracking::TrackingState;
use crate::traits::{ExchangeApi, SettingsProvider};
use crate::types::{OrderKind, Position, Side, StopLossIntent, TakeProfitIntent};
use anyhow::Result;
use rust_decimal::Decimal;

/// Computes the stop-loss trigger price for `position` given a loss budget
/// in quote currency.
///
/// The budget is translated into a percentage of the entry notional, then
/// into a price distance from entry: below entry for longs, above for
/// shorts. Returns `None` when the computed trigger is not positive (budget
/// at or beyond the position's notional value) or the notional is unusable.
#[must_use]
pub fn stop_trigger_price(position: &Position, stop_loss_budget: Decimal) -> Option<Decimal> {
    let percentage = (stop_loss_budget * Decimal::ONE_HUNDRED).checked_div(position.entry_value)?;
    let delta = position.avg_open_price * percentage / Decimal::ONE_HUNDRED;
    let trigger = match position.side {
        Side::Buy => position.avg_open_price - delta,
        Side::Sell => position.avg_open_price + delta,
    };
    (trigger > Decimal::ZERO).then_some(trigger)
}

/// Computes the take-profit target price for `position`: `take_profit_pct`
/// percent above entry for longs, below for shorts.
#[must_use]
pub fn take_profit_price(position: &Position, take_profit_pct: Decimal) -> Decimal {
    let delta = position.avg_open_price * take_profit_pct / Decimal::ONE_HUNDRED;
    match position.side {
        Side::Buy => position.avg_open_price + delta,
        Side::Sell => position.avg_open_price - delta,
    }
}

/// The sentinel loop: generic over the exchange client and the operator
/// input source so both can be substituted in tests.
pub struct Sentinel<A, S>
where
    A: ExchangeApi,
    S: SettingsProvider,
{
    api: A,
    settings: S,
    state: TrackingState,
    config: EngineConfig,
}

impl<A, S> Sentinel<A, S>
where
    A: ExchangeApi,
    S: SettingsProvider,
{
    #[must_use]
    pub fn new(api: A, settings: S, config: EngineConfig) -> Self {
        Self {
            api,
            settings,
            state: TrackingState::default(),
            config,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &TrackingState {
        &self.state
    }

    /// Runs the poll loop until the process is terminated.
    ///
    /// A tick error is logged, resets tracking, and is followed by the
    /// recovery delay; the fixed poll pause runs after every tick regardless
    /// of branch taken, to respect exchange call-rate limits.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            if let Err(err) = self.tick().await {
                self.handle_tick_error(&err);
                tokio::time::sleep(self.config.recovery_delay()).await;
            }
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    /// One pass of the state machine.
    pub async fn tick(&mut self) -> Result<()> {
        if self.state.active {
            self.reconcile().await
        } else {
            self.try_activate().await
        }
    }

    fn handle_tick_error(&mut self, err: &anyhow::Error) {
        tracing::error!(error = %err, "tick failed; resetting to inactive");
        self.state.reset();
    }

    /// INACTIVE: obtain operator settings and start tracking if a live
    /// position exists for the requested symbol.
    async fn try_activate(&mut self) -> Result<()> {
        let Some(settings) = self.settings.next_settings().await? else {
            return Ok(());
        };

        match self.api.open_position(&settings.symbol).await? {
            Some(position) if position.is_open() => {
                tracing::info!(
                    symbol = %settings.symbol,
                    budget = %settings.stop_loss_budget,
                    "open position found; tracking started"
                );
                self.state.activate(&settings);
            }
            _ => {
                tracing::info!(
                    symbol = %settings.symbol,
                    "no open position; open one before starting tracking"
                );
            }
        }
        Ok(())
    }

    /// ACTIVE: compare the live position against tracked state and replace
    /// protective orders when its notional value changed.
    async fn reconcile(&mut self) -> Result<()> {
        let symbol = self.state.symbol.clone();

        let position = self.api.open_position(&symbol).await?;
        let Some(position) = position.filter(Position::is_open) else {
            // Closed by any cause: sweep whatever protective orders remain
            // so nothing orphaned keeps working the book.
            tracing::info!(%symbol, "position closed; cancelling remaining orders");
            self.api.cancel_all_orders(&symbol).await?;
            self.state.reset();
            return Ok(());
        };

        if position.entry_value == self.state.tracked_value {
            // Unchanged since the last reconcile: no exchange calls this tick.
            return Ok(());
        }

        tracing::info!(
            %symbol,
            entry_value = %position.entry_value,
            tracked_value = %self.state.tracked_value,
            "position value changed; replacing protective orders"
        );

        self.replace_stop_loss(&position).await?;
        if let Some(take_profit_pct) = self.state.take_profit_pct {
            self.replace_take_profit(&position, take_profit_pct).await?;
        }

        self.state.tracked_value = position.entry_value;
        Ok(())
    }

    /// Cancels pending conditional orders and places a fresh position-linked
    /// stop. Skipped entirely, with a warning, when the computed trigger is
    /// not positive.
    async fn replace_stop_loss(&self, position: &Position) -> Result<()> {
        let Some(trigger) = stop_trigger_price(position, self.state.stop_loss_budget) else {
            tracing::warn!(
                symbol = %position.symbol,
                budget = %self.state.stop_loss_budget,
                entry_value = %position.entry_value,
                "computed stop price is not positive; stop-loss not placed"
            );
            return Ok(());
        };

        let pending = self.api.pending_tpsl_orders(&position.symbol).await?;
        if !pending.is_empty() {
            let ids: Vec<String> = pending.into_iter().map(|order| order.id).collect();
            tracing::info!(
                symbol = %position.symbol,
                count = ids.len(),
                "cancelling stale conditional orders"
            );
            self.api.cancel_orders(&position.symbol, &ids).await?;
        }

        let adjusted = adjust_price(&self.api, &position.symbol, trigger).await;
        let intent = StopLossIntent {
            symbol: position.symbol.clone(),
            position_id: position.position_id.clone(),
            trigger_price: adjusted.price(),
        };
        tracing::info!(
            symbol = %intent.symbol,
            trigger = %intent.trigger_price,
            "placing stop-loss"
        );
        self.api.place_position_stop(&intent).await
    }

    /// Cancels resting limit orders on the closing side (prior take-profit
    /// placements) and places a fresh limit close at the target price.
    async fn replace_take_profit(&self, position: &Position, take_profit_pct: Decimal) -> Result<()> {
        let close_side = position.side.opposite();

        let open_orders = self.api.pending_orders(&position.symbol).await?;
        let stale_ids: Vec<String> = open_orders
            .into_iter()
            .filter(|order| order.kind == Some(OrderKind::Limit) && order.side == Some(close_side))
            .map(|order| order.order_id)
            .collect();
        if !stale_ids.is_empty() {
            tracing::info!(
                symbol = %position.symbol,
                count = stale_ids.len(),
                "cancelling prior take-profit limit orders"
            );
            self.api.cancel_orders(&position.symbol, &stale_ids).await?;
        }

        let target = take_profit_price(position, take_profit_pct);
        let adjusted = adjust_price(&self.api, &position.symbol, target).await;
        let intent = TakeProfitIntent {
            symbol: position.symbol.clone(),
            position_id: position.position_id.clone(),
            side: close_side,
            quantity: position.quantity,
            limit_price: adjusted.price(),
        };
        tracing::info!(
            symbol = %intent.symbol,
            price = %intent.limit_price,
            "placing take-profit limit order"
        );
        self.api.place_limit_close(&intent).await
    }
}
