//! Bitunix futures exchange integration for the position sentinel.
//!
//! This crate provides:
//! - Double-SHA256 request signing for the Bitunix OpenAPI
//! - An authenticated REST client over the `{code, msg, data}` envelope
//! - Typed account, market, and trade endpoints
//! - A typed error taxonomy with a known business-code table
//!
//! # Example
//!
//! ```ignore
//! use secrecy::SecretString;
//! use sentinel_bitunix::{BitunixClient, BitunixClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BitunixClient::new(
//!         "api-key",
//!         SecretString::from("secret-key"),
//!         BitunixClientConfig::default(),
//!     )?;
//!
//!     if let Some(position) = client.get_open_position("BTCUSDT").await? {
//!         println!("{} {:?} {}", position.symbol, position.side, position.quantity);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! Every authenticated call carries four headers: `api-key`, `sign`,
//! `nonce`, and `timestamp`. The signature is a double SHA-256:
//! `sha256(sha256(nonce + timestamp + api_key + query + body) + secret)`,
//! where `query` is the sorted bare concatenation of parameter keys and
//! values and `body` is the exact JSON text transmitted. See [`auth`].
//!
//! # API Endpoints
//!
//! - `GET /api/v1/futures/position/get_pending_positions` - Open position
//! - `GET /api/v1/futures/market/trading_pairs` - Instrument metadata
//! - `GET /api/v1/futures/trade/get_pending_orders` - Resting orders
//! - `GET /api/v1/futures/tpsl/get_pending_orders` - Pending TP/SL orders
//! - `POST /api/v1/futures/trade/cancel_orders` - Cancel orders by id
//! - `POST /api/v1/futures/trade/cancel_all_orders` - Cancel all for symbol
//! - `POST /api/v1/futures/trade/place_order` - Place order
//! - `POST /api/v1/futures/tpsl/position/place_order` - Position TP/SL

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::{canonical_query, nonce, sign, timestamp_ms, BitunixSigner, SignedHeaders};
pub use client::{BitunixClient, BitunixClientConfig, BITUNIX_PROD_URL};
pub use error::{known_error_description, BitunixError, Result};
pub use types::{
    CancelAllRequest, CancelOrderId, CancelOrdersRequest, Effect, PlaceOrderRequest,
    PositionTpslRequest, StopType, TradeSide, TradingPair,
};
