//! Wire types for the Bitunix futures API.
//!
//! Prices and quantities travel as strings on the wire; they are parsed
//! into `Decimal` at this boundary. Raw response rows convert into the
//! domain types from `sentinel-core`; request bodies serialize with
//! `skip_serializing_if` so the signed JSON only carries supplied fields.

use crate::error::{BitunixError, Result};
use rust_decimal::Decimal;
use sentinel_core::{OpenOrder, OrderAck, OrderKind, Position, Side, TpslOrder};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Wire Enums
// =============================================================================

/// Whether an order opens or closes a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Open,
    Close,
}

/// Order time-in-force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    Gtc,
    Fok,
    Ioc,
    PostOnly,
}

/// Price source for conditional-order triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopType {
    MarkPrice,
    LastPrice,
}

// =============================================================================
// Domain-Adjacent Types
// =============================================================================

/// Instrument metadata relevant to price adjustment.
#[derive(Debug, Clone)]
pub struct TradingPair {
    pub symbol: String,
    /// Declared quote precision (decimal digits), when published.
    pub quote_precision: Option<u32>,
}

// =============================================================================
// Raw Responses
// =============================================================================

fn parse_decimal(value: &str, field: &'static str) -> Result<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| BitunixError::Serialization(format!("invalid decimal in `{field}`: {e}")))
}

/// Raw position row from the pending-positions lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPosition {
    pub symbol: String,
    pub side: Side,
    pub qty: String,
    pub avg_open_price: Option<String>,
    pub entry_value: Option<String>,
    pub position_id: String,
}

impl RawPosition {
    /// Converts to a domain position. A zero quantity means the position is
    /// closed and yields `None`. A non-zero quantity with missing entry
    /// fields is a protocol fault, never a guessed default.
    pub(crate) fn into_position(self) -> Result<Option<Position>> {
        let quantity = parse_decimal(&self.qty, "qty")?;
        if quantity.is_zero() {
            return Ok(None);
        }

        let avg_open_price = self
            .avg_open_price
            .as_deref()
            .ok_or_else(|| BitunixError::missing_field("avgOpenPrice", "position"))?;
        let entry_value = self
            .entry_value
            .as_deref()
            .ok_or_else(|| BitunixError::missing_field("entryValue", "position"))?;

        Ok(Some(Position {
            symbol: self.symbol,
            side: self.side,
            quantity,
            avg_open_price: parse_decimal(avg_open_price, "avgOpenPrice")?,
            entry_value: parse_decimal(entry_value, "entryValue")?,
            position_id: self.position_id,
        }))
    }
}

/// Raw trading-pair row from the instrument metadata lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTradingPair {
    pub symbol: String,
    pub quote_precision: Option<u32>,
}

impl From<RawTradingPair> for TradingPair {
    fn from(raw: RawTradingPair) -> Self {
        Self {
            symbol: raw.symbol,
            quote_precision: raw.quote_precision,
        }
    }
}

/// Raw resting order from the open-orders lookup. Type and side come back as
/// free-form strings; unrecognized values survive as `None` rather than
/// failing the whole response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawOpenOrder {
    pub order_id: String,
    pub order_type: Option<String>,
    pub side: Option<String>,
}

impl From<RawOpenOrder> for OpenOrder {
    fn from(raw: RawOpenOrder) -> Self {
        let kind = match raw.order_type.as_deref() {
            Some("LIMIT") => Some(OrderKind::Limit),
            Some("MARKET") => Some(OrderKind::Market),
            _ => None,
        };
        let side = match raw.side.as_deref() {
            Some("BUY") => Some(Side::Buy),
            Some("SELL") => Some(Side::Sell),
            _ => None,
        };
        Self {
            order_id: raw.order_id,
            kind,
            side,
        }
    }
}

/// Envelope payload of the open-orders lookup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PendingOrdersData {
    #[serde(default)]
    pub order_list: Vec<RawOpenOrder>,
}

/// Raw pending conditional order.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawTpslOrder {
    pub id: String,
}

impl From<RawTpslOrder> for TpslOrder {
    fn from(raw: RawTpslOrder) -> Self {
        Self { id: raw.id }
    }
}

/// Raw order acknowledgement.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawOrderAck {
    pub order_id: String,
    pub client_id: Option<String>,
}

impl From<RawOrderAck> for OrderAck {
    fn from(raw: RawOrderAck) -> Self {
        Self {
            order_id: raw.order_id,
            client_id: raw.client_id,
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

fn decimal_string(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Body of `POST /api/v1/futures/trade/place_order`.
///
/// Carries the venue's full option surface; only supplied fields appear in
/// the signed JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderKind,
    pub qty: String,
    pub trade_side: TradeSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<Effect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_stop_type: Option<StopType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_order_type: Option<OrderKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_order_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_stop_type: Option<StopType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_order_type: Option<OrderKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_order_price: Option<String>,
}

impl PlaceOrderRequest {
    fn base(symbol: &str, side: Side, order_type: OrderKind, qty: Decimal, trade_side: TradeSide) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            side,
            order_type,
            qty: decimal_string(qty),
            trade_side,
            price: None,
            position_id: None,
            effect: None,
            reduce_only: None,
            client_id: None,
            tp_price: None,
            tp_stop_type: None,
            tp_order_type: None,
            tp_order_price: None,
            sl_price: None,
            sl_stop_type: None,
            sl_order_type: None,
            sl_order_price: None,
        }
    }

    /// A market order.
    #[must_use]
    pub fn market(symbol: &str, side: Side, qty: Decimal, trade_side: TradeSide) -> Self {
        Self::base(symbol, side, OrderKind::Market, qty, trade_side)
    }

    /// A GTC limit order at `price`.
    #[must_use]
    pub fn limit(symbol: &str, side: Side, qty: Decimal, price: Decimal, trade_side: TradeSide) -> Self {
        let mut request = Self::base(symbol, side, OrderKind::Limit, qty, trade_side);
        request.price = Some(decimal_string(price));
        request.effect = Some(Effect::Gtc);
        request
    }

    /// Links the order to a position (required when closing).
    #[must_use]
    pub fn with_position_id(mut self, position_id: impl Into<String>) -> Self {
        self.position_id = Some(position_id.into());
        self
    }

    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    #[must_use]
    pub fn reduce_only(mut self) -> Self {
        self.reduce_only = Some(true);
        self
    }

    /// Embeds a take-profit trigger in the order itself.
    #[must_use]
    pub fn with_embedded_take_profit(mut self, trigger: Decimal, stop_type: StopType) -> Self {
        self.tp_price = Some(decimal_string(trigger));
        self.tp_stop_type = Some(stop_type);
        self
    }

    /// Embeds a stop-loss trigger in the order itself.
    #[must_use]
    pub fn with_embedded_stop_loss(mut self, trigger: Decimal, stop_type: StopType) -> Self {
        self.sl_price = Some(decimal_string(trigger));
        self.sl_stop_type = Some(stop_type);
        self
    }
}

/// Body of `POST /api/v1/futures/tpsl/position/place_order`: a TP and/or SL
/// linked to a whole position. When triggered the position is closed at
/// mark price.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionTpslRequest {
    pub symbol: String,
    pub position_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_price: Option<String>,
}

impl PositionTpslRequest {
    /// A stop-loss-only request.
    #[must_use]
    pub fn stop_loss(symbol: &str, position_id: impl Into<String>, trigger: Decimal) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            position_id: position_id.into(),
            sl_price: Some(decimal_string(trigger)),
            tp_price: None,
        }
    }

    #[must_use]
    pub fn with_take_profit(mut self, trigger: Decimal) -> Self {
        self.tp_price = Some(decimal_string(trigger));
        self
    }
}

/// Body of `POST /api/v1/futures/trade/cancel_orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrdersRequest {
    pub symbol: String,
    pub order_list: Vec<CancelOrderId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderId {
    pub order_id: String,
}

impl CancelOrdersRequest {
    #[must_use]
    pub fn new(symbol: &str, order_ids: &[String]) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            order_list: order_ids
                .iter()
                .map(|id| CancelOrderId {
                    order_id: id.clone(),
                })
                .collect(),
        }
    }
}

/// Body of `POST /api/v1/futures/trade/cancel_all_orders`. With no symbol
/// the exchange cancels across all symbols.
#[derive(Debug, Clone, Serialize)]
pub struct CancelAllRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================
